//! SQLite post reader over the ingestion backend's `tweets` table
//!
//! Loads a full snapshot per call; the engine is pure, so every pass starts
//! from the complete table rather than an incremental cursor.

use super::normalizer::{Engagement, ScoredPost};
use crate::sqlite_pragma::apply_optimized_pragmas;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};
use std::path::Path;

#[derive(Debug)]
pub enum ReaderError {
    Database(rusqlite::Error),
    MissingTable(String),
}

impl From<rusqlite::Error> for ReaderError {
    fn from(err: rusqlite::Error) -> Self {
        ReaderError::Database(err)
    }
}

impl std::fmt::Display for ReaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReaderError::Database(e) => write!(f, "Database error: {}", e),
            ReaderError::MissingTable(t) => write!(f, "Missing table: {}", t),
        }
    }
}

impl std::error::Error for ReaderError {}

pub struct SqlitePostReader {
    conn: Connection,
}

impl SqlitePostReader {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, ReaderError> {
        let conn = Connection::open(db_path.as_ref())?;

        apply_optimized_pragmas(&conn)?;

        // Read-only from here on (must be after PRAGMAs)
        conn.execute_batch("PRAGMA query_only = ON")?;

        let has_table: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'tweets'",
            [],
            |row| row.get(0),
        )?;
        if has_table == 0 {
            return Err(ReaderError::MissingTable("tweets".to_string()));
        }

        log::info!("📥 SQLite post reader opened: {}", db_path.as_ref().display());

        Ok(Self { conn })
    }

    /// Every stored post, in insertion order
    pub fn read_all(&self) -> Result<Vec<ScoredPost>, ReaderError> {
        let mut stmt = self.conn.prepare(
            "SELECT CAST(id AS TEXT), CAST(username AS TEXT), CAST(text AS TEXT), score,
                    CAST(created_at AS TEXT), CAST(engagement AS TEXT)
             FROM tweets
             ORDER BY rowid ASC",
        )?;

        let rows = stmt.query_map([], row_to_post)?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row?);
        }

        log::debug!("📥 Loaded {} posts from SQLite", posts.len());
        Ok(posts)
    }

    pub fn count(&self) -> Result<usize, ReaderError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tweets", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }
}

fn row_to_post(row: &Row<'_>) -> rusqlite::Result<ScoredPost> {
    let id: Option<String> = row.get(0)?;
    let engagement_json: Option<String> = row.get(5)?;
    let id = id.unwrap_or_default();

    Ok(ScoredPost {
        engagement: parse_engagement(&id, engagement_json.as_deref()),
        author_handle: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        text: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        score: score_from_column(row.get_ref(3)?),
        created_at: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        id,
    })
}

/// NULL and non-numeric scores become NaN so the engine reports them as skipped
fn score_from_column(value: ValueRef<'_>) -> f64 {
    match value {
        ValueRef::Real(v) => v,
        ValueRef::Integer(v) => v as f64,
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(f64::NAN),
        ValueRef::Null | ValueRef::Blob(_) => f64::NAN,
    }
}

fn parse_engagement(id: &str, raw: Option<&str>) -> Engagement {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Engagement::default(),
    };

    match serde_json::from_str::<Option<Engagement>>(raw) {
        Ok(engagement) => engagement.unwrap_or_default(),
        Err(e) => {
            log::warn!("⚠️  Unreadable engagement for post {}: {}", id, e);
            Engagement::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;
    use tempfile::tempdir;

    fn setup_test_db() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("tweets.db");

        let conn = Connection::open(&db_path).unwrap();
        conn.execute(
            "CREATE TABLE tweets (
                id TEXT PRIMARY KEY,
                username TEXT,
                text TEXT,
                score REAL,
                url TEXT,
                created_at TEXT,
                engagement TEXT,
                inserted_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )
        .unwrap();

        (dir, db_path)
    }

    fn insert_post(
        conn: &Connection,
        id: &str,
        username: &str,
        score: Option<f64>,
        created_at: &str,
        engagement: Option<&str>,
    ) {
        conn.execute(
            "INSERT INTO tweets (id, username, text, score, url, created_at, engagement)
             VALUES (?1, ?2, 'gm', ?3, '', ?4, ?5)",
            params![id, username, score, created_at, engagement],
        )
        .unwrap();
    }

    #[test]
    fn test_read_all_in_insertion_order() {
        let (_dir, db_path) = setup_test_db();
        let conn = Connection::open(&db_path).unwrap();
        insert_post(&conn, "2", "bob", Some(1.2), "2025-01-02T00:00:00Z", Some(r#"{"likes":4,"retweets":1}"#));
        insert_post(&conn, "1", "alice", Some(1.7), "2025-01-01T00:00:00Z", None);
        drop(conn);

        let reader = SqlitePostReader::new(&db_path).unwrap();
        let posts = reader.read_all().unwrap();

        assert_eq!(reader.count().unwrap(), 2);
        assert_eq!(posts[0].id, "2");
        assert_eq!(posts[0].author_handle, "bob");
        assert_eq!(posts[0].engagement.likes, 4);
        assert_eq!(posts[0].engagement.reposts, 1);
        assert_eq!(posts[1].score, 1.7);
        assert_eq!(posts[1].engagement, Engagement::default());
    }

    #[test]
    fn test_null_score_and_bad_engagement() {
        let (_dir, db_path) = setup_test_db();
        let conn = Connection::open(&db_path).unwrap();
        insert_post(&conn, "1", "alice", None, "2025-01-01T00:00:00Z", Some("{not json"));
        drop(conn);

        let posts = SqlitePostReader::new(&db_path).unwrap().read_all().unwrap();

        assert!(posts[0].score.is_nan());
        assert_eq!(posts[0].engagement, Engagement::default());
    }

    #[test]
    fn test_untyped_columns_read_as_text() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("tweets.db");
        let conn = Connection::open(&db_path).unwrap();
        // No declared types, so integers keep their storage class
        conn.execute(
            "CREATE TABLE tweets (id, username, text, score, created_at, engagement)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO tweets (id, username, text, score, created_at, engagement)
             VALUES (9, 42, 7, 1.25, 1700000000, 5)",
            [],
        )
        .unwrap();
        drop(conn);

        let posts = SqlitePostReader::new(&db_path).unwrap().read_all().unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "9");
        assert_eq!(posts[0].author_handle, "42");
        assert_eq!(posts[0].text, "7");
        assert_eq!(posts[0].score, 1.25);
        assert_eq!(posts[0].created_at, "1700000000");
        assert_eq!(posts[0].engagement, Engagement::default());
    }

    #[test]
    fn test_missing_table() {
        let dir = tempdir().unwrap();
        let result = SqlitePostReader::new(dir.path().join("empty.db"));

        assert!(matches!(result, Err(ReaderError::MissingTable(_))));
    }

    #[test]
    fn test_read_only_mode() {
        let (_dir, db_path) = setup_test_db();

        let reader = SqlitePostReader::new(&db_path).unwrap();
        let result = reader.conn.execute(
            "INSERT INTO tweets (id, username, score) VALUES ('x', 'y', 1.0)",
            [],
        );

        assert!(result.is_err());
    }
}
