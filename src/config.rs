//! Aggregation and runtime configuration from environment variables

use crate::aggregator_core::achievements::AchievementRules;
use crate::aggregator_core::writer::BackendType;
use std::env;
use std::path::PathBuf;

/// Tunable thresholds for one aggregation pass.
///
/// Every field is overridable so tests can run with synthetic thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationConfig {
    /// Posts scoring at or above this count as high quality (default 1.5)
    pub high_quality_threshold: f64,

    /// Lower bound of the medium quality tier (default 1.0)
    pub medium_quality_threshold: f64,

    /// Posts shorter than this many characters are "short" (default 80)
    pub short_length_limit: usize,

    /// Posts longer than this many characters are "long" (default 200)
    pub long_length_limit: usize,

    /// Minimum posts before an author is trend-classified (default 2)
    pub min_posts_for_trend: usize,

    /// Minimum posts before an author gets a consistency score (default 2)
    pub min_posts_for_consistency: usize,

    /// Pioneer and streak thresholds here are replaced by the high and
    /// medium quality thresholds when the engine is built
    pub achievements: AchievementRules,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            high_quality_threshold: 1.5,
            medium_quality_threshold: 1.0,
            short_length_limit: 80,
            long_length_limit: 200,
            min_posts_for_trend: 2,
            min_posts_for_consistency: 2,
            achievements: AchievementRules::default(),
        }
    }
}

impl AggregationConfig {
    /// Load thresholds from environment variables, falling back to defaults
    ///
    /// Environment variables:
    /// - `RADAR_HIGH_QUALITY_THRESHOLD` (default: 1.5)
    /// - `RADAR_MEDIUM_QUALITY_THRESHOLD` (default: 1.0)
    /// - `RADAR_SHORT_LENGTH_LIMIT` (default: 80)
    /// - `RADAR_LONG_LENGTH_LIMIT` (default: 200)
    /// - `RADAR_MIN_POSTS_TREND` (default: 2)
    /// - `RADAR_MIN_POSTS_CONSISTENCY` (default: 2)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let high_quality_threshold = env::var("RADAR_HIGH_QUALITY_THRESHOLD")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(defaults.high_quality_threshold);

        let medium_quality_threshold = env::var("RADAR_MEDIUM_QUALITY_THRESHOLD")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(defaults.medium_quality_threshold);

        Self {
            high_quality_threshold,
            medium_quality_threshold,

            short_length_limit: env::var("RADAR_SHORT_LENGTH_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.short_length_limit),

            long_length_limit: env::var("RADAR_LONG_LENGTH_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.long_length_limit),

            min_posts_for_trend: env::var("RADAR_MIN_POSTS_TREND")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_posts_for_trend),

            min_posts_for_consistency: env::var("RADAR_MIN_POSTS_CONSISTENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_posts_for_consistency),

            achievements: defaults.achievements,
        }
    }

    /// Trend needs two non-empty halves, so anything below 2 is raised to 2
    pub fn effective_min_posts_for_trend(&self) -> usize {
        self.min_posts_for_trend.max(2)
    }

    /// Dispersion of a single score is undefined, so the floor is 2
    pub fn effective_min_posts_for_consistency(&self) -> usize {
        self.min_posts_for_consistency.max(2)
    }
}

/// Where the post snapshot is loaded from
#[derive(Debug, Clone, PartialEq)]
pub enum SourceType {
    Jsonl,
    Sqlite,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for the `radar_report` binary
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub source: SourceType,
    pub backend: BackendType,

    /// SQLite store holding the scored `tweets` table
    pub db_path: PathBuf,

    /// JSONL snapshot of scored posts (one post per line)
    pub posts_jsonl_path: PathBuf,

    /// Report destination: a directory for JSONL, a database file for SQLite
    pub output_path: PathBuf,

    /// Seconds between aggregation passes when not running with `--once`
    pub interval_secs: u64,

    pub run_once: bool,
}

impl RuntimeConfig {
    /// Environment variables:
    /// - `RADAR_DB_PATH` (default: data/tweets.db)
    /// - `POSTS_JSONL_PATH` (default: data/posts.jsonl)
    /// - `REPORT_OUTPUT_PATH` (default: reports for JSONL, data/reports.db for SQLite)
    /// - `REPORT_INTERVAL_SECS` (default: 300, must be > 0)
    pub fn from_env_and_args(args: &[String]) -> Result<Self, ConfigError> {
        let source = parse_source_from_args(args);
        let backend = parse_backend_from_args(args);
        let run_once = args.iter().any(|a| a == "--once");

        let default_output = match backend {
            BackendType::Jsonl => "reports",
            BackendType::Sqlite => "data/reports.db",
        };

        let interval_secs = match env::var("REPORT_INTERVAL_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(format!("REPORT_INTERVAL_SECS must be an integer, got '{}'", raw))
            })?,
            Err(_) => 300,
        };

        if interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "REPORT_INTERVAL_SECS must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            source,
            backend,
            db_path: env::var("RADAR_DB_PATH")
                .unwrap_or_else(|_| "data/tweets.db".to_string())
                .into(),
            posts_jsonl_path: env::var("POSTS_JSONL_PATH")
                .unwrap_or_else(|_| "data/posts.jsonl".to_string())
                .into(),
            output_path: env::var("REPORT_OUTPUT_PATH")
                .unwrap_or_else(|_| default_output.to_string())
                .into(),
            interval_secs,
            run_once,
        })
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let idx = args.iter().position(|x| x == flag)?;
    args.get(idx + 1).map(|s| s.as_str())
}

pub fn parse_source_from_args(args: &[String]) -> SourceType {
    match flag_value(args, "--source") {
        Some("jsonl") => SourceType::Jsonl,
        _ => SourceType::Sqlite,
    }
}

pub fn parse_backend_from_args(args: &[String]) -> BackendType {
    match flag_value(args, "--backend") {
        Some("sqlite") => BackendType::Sqlite,
        _ => BackendType::Jsonl,
    }
}
