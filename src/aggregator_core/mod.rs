//! Aggregator Core - Community Post Aggregation Engine
//!
//! Turns a snapshot of pre-scored social posts into leaderboard views:
//! author rankings, rising stars, consistency rankings, community insights
//! and achievement tags.
//!
//! # Architecture
//!
//! ```text
//! SQLite `tweets` table → SqlitePostReader ┐
//! JSONL snapshot        → read_posts_jsonl ┴→ Vec<ScoredPost>
//!     ↓
//! AggregationEngine (normalize → group by author → views)
//!     ↓
//! AggregationReport
//!     ↓
//! ReportWriter → JSONL or SQLite backend
//! ```

pub mod achievements;
pub mod consistency;
pub mod engine;
pub mod insights;
pub mod jsonl_reader;
pub mod jsonl_writer;
pub mod normalizer;
pub mod profile;
pub mod ranker;
pub mod sqlite_reader;
pub mod sqlite_writer;
pub mod stats;
pub mod trend;
pub mod writer;
pub mod writer_backend;

pub use achievements::{Achievement, AchievementDetector, AchievementRules, AuthorAchievements};
pub use consistency::{ConsistencyScorer, ConsistencySummary};
pub use engine::{AggregationEngine, AggregationReport};
pub use insights::{CommunityInsights, InsightsAggregator, LengthBucket, QualityTier};
pub use jsonl_reader::{read_posts_jsonl, JsonlSnapshot};
pub use jsonl_writer::JsonlReportWriter;
pub use normalizer::{Engagement, RecordError, ScoredPost, SkippedRecord};
pub use profile::AuthorProfile;
pub use ranker::{AuthorSummary, RankAggregator};
pub use sqlite_reader::{ReaderError, SqlitePostReader};
pub use sqlite_writer::SqliteReportWriter;
pub use trend::{TrendClassifier, TrendDirection, TrendSummary};
pub use writer::{BackendType, ReportWriter};
pub use writer_backend::{ReportWriterBackend, ReportWriterError};
