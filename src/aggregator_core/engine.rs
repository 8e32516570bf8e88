//! Aggregation engine: one pure pass from a post snapshot to every derived view
//!
//! ```text
//! &[ScoredPost] → normalize (skip + report bad records)
//!     ↓
//! AuthorGroups ─┬─ RankAggregator      → rankings
//!               ├─ TrendClassifier     → rising_stars
//!               ├─ ConsistencyScorer   → consistency
//!               └─ AchievementDetector → achievements
//! full corpus ──── InsightsAggregator  → insights
//! ```
//!
//! The engine keeps no state between calls; concurrent calls on separate
//! snapshots need no coordination.

use super::achievements::{AchievementDetector, AchievementRules, AuthorAchievements};
use super::consistency::{ConsistencyScorer, ConsistencySummary};
use super::insights::{CommunityInsights, InsightsAggregator};
use super::normalizer::{normalize, ScoredPost, SkippedRecord};
use super::profile::AuthorProfile;
use super::ranker::{AuthorGroups, AuthorSummary, RankAggregator};
use super::trend::{TrendClassifier, TrendSummary};
use crate::config::AggregationConfig;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationReport {
    /// Records in the input snapshot, valid or not
    pub total_records: usize,
    pub rankings: Vec<AuthorSummary>,
    pub rising_stars: Vec<TrendSummary>,
    pub consistency: Vec<ConsistencySummary>,
    pub insights: CommunityInsights,
    pub achievements: Vec<AuthorAchievements>,
    /// Records left out of every view
    pub skipped: Vec<SkippedRecord>,
    /// Records that kept their author out of the rising-stars view only
    pub trend_excluded: Vec<SkippedRecord>,
}

impl AggregationReport {
    pub fn aggregated_records(&self) -> usize {
        self.total_records - self.skipped.len()
    }
}

pub struct AggregationEngine {
    ranker: RankAggregator,
    trends: TrendClassifier,
    consistency: ConsistencyScorer,
    insights: InsightsAggregator,
    achievements: AchievementDetector,
}

impl AggregationEngine {
    /// Quality Pioneer and Hot Streak follow the config's high and medium
    /// quality thresholds, so every view agrees on what "high quality" means.
    pub fn new(config: AggregationConfig) -> Self {
        let rules = AchievementRules {
            pioneer_threshold: config.high_quality_threshold,
            streak_threshold: config.medium_quality_threshold,
            ..config.achievements.clone()
        };

        Self {
            ranker: RankAggregator::new(),
            trends: TrendClassifier::new(config.effective_min_posts_for_trend()),
            consistency: ConsistencyScorer::new(config.effective_min_posts_for_consistency()),
            insights: InsightsAggregator::new(
                config.high_quality_threshold,
                config.medium_quality_threshold,
                config.short_length_limit,
                config.long_length_limit,
            ),
            achievements: AchievementDetector::new(rules),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(AggregationConfig::default())
    }

    /// Run every view over the snapshot. Never fails; bad records are
    /// skipped and listed in the report.
    pub fn aggregate(&self, posts: &[ScoredPost]) -> AggregationReport {
        let corpus = normalize(posts);
        let groups = AuthorGroups::from_corpus(&corpus);

        let summaries = self.ranker.summarize(&groups);
        let rankings = self.ranker.rank(&summaries);
        let rising_stars = self.trends.rising_stars(&groups);
        let consistency = self.consistency.rank(&groups);
        let achievements = self.achievements.detect_all(&groups);
        let insights = self.insights.aggregate(&corpus.posts);

        if !corpus.skipped.is_empty() {
            log::warn!(
                "⚠️  Skipped {} of {} records during aggregation",
                corpus.skipped.len(),
                corpus.total_records
            );
        }

        log::debug!(
            "📊 Aggregated {} posts from {} authors ({} rising, {} consistency-ranked)",
            corpus.posts.len(),
            groups.len(),
            rising_stars.len(),
            consistency.len()
        );

        AggregationReport {
            total_records: corpus.total_records,
            rankings,
            rising_stars,
            consistency,
            insights,
            achievements,
            skipped: corpus.skipped,
            trend_excluded: corpus.unorderable,
        }
    }

    /// Drill-down for one author; `None` when they have no valid posts
    pub fn author_profile(&self, posts: &[ScoredPost], author_handle: &str) -> Option<AuthorProfile> {
        let corpus = normalize(posts);
        let groups = AuthorGroups::from_corpus(&corpus);
        let author_posts = groups.get(author_handle)?;

        let summary = AuthorSummary::from_posts(author_handle, author_posts)?;
        let trend = self.trends.classify_author(author_handle, author_posts);
        let consistency = self.consistency.score_author(author_handle, author_posts);
        let achievements = self.achievements.detect(author_posts);

        Some(AuthorProfile::build(
            summary,
            trend.as_ref(),
            consistency.as_ref(),
            achievements,
        ))
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
