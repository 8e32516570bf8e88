//! Radar Report Binary - Leaderboard Aggregation Runner
//!
//! Loads the scored post snapshot, runs every aggregation view and persists
//! the resulting report.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin radar_report -- --source sqlite --backend jsonl
//! cargo run --release --bin radar_report -- --source jsonl --once
//! ```
//!
//! ## Environment Variables
//!
//! - RADAR_DB_PATH - SQLite store with the scored `tweets` table (default: data/tweets.db)
//! - POSTS_JSONL_PATH - JSONL snapshot used with --source jsonl (default: data/posts.jsonl)
//! - REPORT_OUTPUT_PATH - Report directory (JSONL) or database file (SQLite)
//! - REPORT_INTERVAL_SECS - Seconds between passes (default: 300)
//! - RADAR_HIGH_QUALITY_THRESHOLD, RADAR_MEDIUM_QUALITY_THRESHOLD,
//!   RADAR_SHORT_LENGTH_LIMIT, RADAR_LONG_LENGTH_LIMIT,
//!   RADAR_MIN_POSTS_TREND, RADAR_MIN_POSTS_CONSISTENCY - aggregation thresholds
//! - RUST_LOG - Logging level (optional, default: info)

use chrono::Utc;
use nation_radar::aggregator_core::{
    read_posts_jsonl, AggregationEngine, ReportWriter, ScoredPost, SqlitePostReader,
};
use nation_radar::config::{AggregationConfig, RuntimeConfig, SourceType};
use std::env;
use std::sync::Arc;
use tokio::time::{interval, Duration};

async fn load_snapshot(config: &RuntimeConfig) -> Result<Vec<ScoredPost>, Box<dyn std::error::Error>> {
    match config.source {
        SourceType::Jsonl => {
            let snapshot = read_posts_jsonl(&config.posts_jsonl_path).await?;
            Ok(snapshot.posts)
        }
        SourceType::Sqlite => {
            let db_path = config.db_path.clone();
            let posts = tokio::task::spawn_blocking(move || {
                SqlitePostReader::new(&db_path).and_then(|reader| reader.read_all())
            })
            .await??;
            Ok(posts)
        }
    }
}

async fn run_pass(
    config: &RuntimeConfig,
    engine: &Arc<AggregationEngine>,
    writer: &mut ReportWriter,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("⏱️  Computing leaderboard report...");

    let posts = load_snapshot(config).await?;
    let engine = Arc::clone(engine);
    let report = tokio::task::spawn_blocking(move || engine.aggregate(&posts)).await?;

    writer.write_report(&report, Utc::now().timestamp()).await?;
    writer.flush().await?;

    if let Some(leader) = report.rankings.first() {
        log::info!(
            "🏆 Leader: {} (mean {:.3} over {} posts)",
            leader.author_handle,
            leader.mean_score,
            leader.post_count
        );
    }
    if let Some(star) = report.rising_stars.first() {
        log::info!(
            "🚀 Top rising star: {} ({:+.3})",
            star.author_handle,
            star.improvement_delta
        );
    }

    log::info!(
        "✅ Report written: {} authors, {} rising stars, {} consistency-ranked, {} skipped of {} records",
        report.rankings.len(),
        report.rising_stars.len(),
        report.consistency.len(),
        report.skipped.len(),
        report.total_records
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let config = RuntimeConfig::from_env_and_args(&args)?;
    let aggregation = AggregationConfig::from_env();

    log::info!("🚀 Starting Nation Radar report runner");
    match config.source {
        SourceType::Sqlite => log::info!("   Source: SQLite {}", config.db_path.display()),
        SourceType::Jsonl => log::info!("   Source: JSONL {}", config.posts_jsonl_path.display()),
    }
    log::info!("   Output: {}", config.output_path.display());
    log::info!("   High quality threshold: {}", aggregation.high_quality_threshold);
    log::info!(
        "   Length buckets: short < {}, long > {}",
        aggregation.short_length_limit,
        aggregation.long_length_limit
    );

    let engine = Arc::new(AggregationEngine::new(aggregation));
    let mut writer = ReportWriter::new(config.backend.clone(), config.output_path.clone())?;

    log::info!("📊 Backend: {}", writer.backend_type());

    if config.run_once {
        return run_pass(&config, &engine, &mut writer).await;
    }

    log::info!("   Report interval: {}s", config.interval_secs);
    let mut ticker = interval(Duration::from_secs(config.interval_secs));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_pass(&config, &engine, &mut writer).await {
                    log::error!("❌ Report pass failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("🛑 Shutdown requested, flushing writer");
                writer.flush().await?;
                return Ok(());
            }
        }
    }
}
