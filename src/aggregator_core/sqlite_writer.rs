//! SQLite writer for aggregation reports
//!
//! Each report becomes one `leaderboard_snapshots` row plus child rows keyed by
//! `snapshot_id`, written in a single transaction. Async writes run the
//! rusqlite work on tokio's blocking pool.

use super::engine::AggregationReport;
use super::writer_backend::{ReportWriterBackend, ReportWriterError};
use crate::sqlite_pragma::apply_optimized_pragmas;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS leaderboard_snapshots (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        generated_at INTEGER NOT NULL,
        total_records INTEGER NOT NULL,
        skipped_records INTEGER NOT NULL,
        trend_excluded_records INTEGER NOT NULL,
        author_count INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS author_rankings (
        snapshot_id INTEGER NOT NULL REFERENCES leaderboard_snapshots(id),
        rank INTEGER NOT NULL,
        author_handle TEXT NOT NULL,
        post_count INTEGER NOT NULL,
        mean_score REAL NOT NULL,
        best_score REAL NOT NULL,
        worst_score REAL NOT NULL,
        total_engagement INTEGER NOT NULL,
        PRIMARY KEY (snapshot_id, rank)
    );
    CREATE TABLE IF NOT EXISTS rising_stars (
        snapshot_id INTEGER NOT NULL REFERENCES leaderboard_snapshots(id),
        rank INTEGER NOT NULL,
        author_handle TEXT NOT NULL,
        improvement_delta REAL NOT NULL,
        current_mean REAL NOT NULL,
        earlier_mean REAL NOT NULL,
        total_posts INTEGER NOT NULL,
        PRIMARY KEY (snapshot_id, rank)
    );
    CREATE TABLE IF NOT EXISTS consistency_rankings (
        snapshot_id INTEGER NOT NULL REFERENCES leaderboard_snapshots(id),
        rank INTEGER NOT NULL,
        author_handle TEXT NOT NULL,
        consistency_score REAL NOT NULL,
        mean_score REAL NOT NULL,
        post_count INTEGER NOT NULL,
        PRIMARY KEY (snapshot_id, rank)
    );
    CREATE TABLE IF NOT EXISTS author_achievements (
        snapshot_id INTEGER NOT NULL REFERENCES leaderboard_snapshots(id),
        author_handle TEXT NOT NULL,
        achievement TEXT NOT NULL,
        PRIMARY KEY (snapshot_id, author_handle, achievement)
    );
    CREATE TABLE IF NOT EXISTS community_insights (
        snapshot_id INTEGER PRIMARY KEY REFERENCES leaderboard_snapshots(id),
        total_posts INTEGER NOT NULL,
        mean_score REAL NOT NULL,
        mean_length REAL NOT NULL,
        high_quality_percent REAL NOT NULL,
        short_posts INTEGER NOT NULL,
        short_mean_score REAL NOT NULL,
        medium_posts INTEGER NOT NULL,
        medium_mean_score REAL NOT NULL,
        long_posts INTEGER NOT NULL,
        long_mean_score REAL NOT NULL,
        tier_low INTEGER NOT NULL,
        tier_medium INTEGER NOT NULL,
        tier_high INTEGER NOT NULL,
        engagement TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_snapshots_generated_at ON leaderboard_snapshots(generated_at DESC);
    CREATE INDEX IF NOT EXISTS idx_rankings_author ON author_rankings(author_handle, snapshot_id);
";

/// SQLite backend for report snapshots
pub struct SqliteReportWriter {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteReportWriter {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, ReportWriterError> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        apply_optimized_pragmas(&conn)?;
        conn.execute_batch(SCHEMA)?;

        log::info!("✅ SQLite report writer initialized: {}", db_path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert the report and return the new snapshot id (blocking)
    pub fn insert_report(&mut self, report: &AggregationReport, generated_at: i64) -> Result<i64, ReportWriterError> {
        let mut conn = lock_connection(&self.conn)?;
        insert_snapshot(&mut conn, report, generated_at)
    }
}

fn lock_connection(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, ReportWriterError> {
    conn.lock()
        .map_err(|_| ReportWriterError::Database("connection lock poisoned".to_string()))
}

/// Clamp unsigned counters into SQLite's signed INTEGER range
fn sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn insert_snapshot(
    conn: &mut Connection,
    report: &AggregationReport,
    generated_at: i64,
) -> Result<i64, ReportWriterError> {
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO leaderboard_snapshots
            (generated_at, total_records, skipped_records, trend_excluded_records, author_count)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            generated_at,
            report.total_records as i64,
            report.skipped.len() as i64,
            report.trend_excluded.len() as i64,
            report.rankings.len() as i64,
        ],
    )?;
    let snapshot_id = tx.last_insert_rowid();

    {
        let mut stmt = tx.prepare(
            "INSERT INTO author_rankings
                (snapshot_id, rank, author_handle, post_count, mean_score, best_score, worst_score, total_engagement)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for (i, s) in report.rankings.iter().enumerate() {
            stmt.execute(params![
                snapshot_id,
                (i + 1) as i64,
                s.author_handle,
                s.post_count as i64,
                s.mean_score,
                s.best_score,
                s.worst_score,
                sql_count(s.total_engagement),
            ])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO rising_stars
                (snapshot_id, rank, author_handle, improvement_delta, current_mean, earlier_mean, total_posts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (i, t) in report.rising_stars.iter().enumerate() {
            stmt.execute(params![
                snapshot_id,
                (i + 1) as i64,
                t.author_handle,
                t.improvement_delta,
                t.current_mean,
                t.earlier_mean,
                t.total_posts as i64,
            ])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO consistency_rankings
                (snapshot_id, rank, author_handle, consistency_score, mean_score, post_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (i, c) in report.consistency.iter().enumerate() {
            stmt.execute(params![
                snapshot_id,
                (i + 1) as i64,
                c.author_handle,
                c.consistency_score,
                c.mean_score,
                c.post_count as i64,
            ])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO author_achievements (snapshot_id, author_handle, achievement)
             VALUES (?1, ?2, ?3)",
        )?;
        for author in &report.achievements {
            for achievement in &author.achievements {
                stmt.execute(params![snapshot_id, author.author_handle, achievement.as_str()])?;
            }
        }
    }

    let insights = &report.insights;
    let buckets = &insights.length_vs_quality;
    tx.execute(
        "INSERT INTO community_insights
            (snapshot_id, total_posts, mean_score, mean_length, high_quality_percent,
             short_posts, short_mean_score, medium_posts, medium_mean_score, long_posts, long_mean_score,
             tier_low, tier_medium, tier_high, engagement)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            snapshot_id,
            insights.total_posts as i64,
            insights.mean_score,
            insights.mean_length,
            insights.high_quality_percent,
            buckets.short.post_count as i64,
            buckets.short.mean_score,
            buckets.medium.post_count as i64,
            buckets.medium.mean_score,
            buckets.long.post_count as i64,
            buckets.long.mean_score,
            insights.quality_tiers.low as i64,
            insights.quality_tiers.medium as i64,
            insights.quality_tiers.high as i64,
            serde_json::to_string(&insights.engagement)?,
        ],
    )?;

    tx.commit()?;

    log::debug!(
        "✅ Report snapshot {} written ({} authors, {} rising stars)",
        snapshot_id,
        report.rankings.len(),
        report.rising_stars.len()
    );

    Ok(snapshot_id)
}

#[async_trait]
impl ReportWriterBackend for SqliteReportWriter {
    async fn write_report(
        &mut self,
        report: &AggregationReport,
        generated_at: i64,
    ) -> Result<(), ReportWriterError> {
        let conn = Arc::clone(&self.conn);
        let report = report.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = lock_connection(&conn)?;
            insert_snapshot(&mut conn, &report, generated_at)
        })
        .await
        .map_err(|e| ReportWriterError::Database(format!("report write task failed: {}", e)))??;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ReportWriterError> {
        // Every snapshot commits its own transaction
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}
