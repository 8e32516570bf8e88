//! Single-author drill-down combining every per-author view

use super::achievements::Achievement;
use super::consistency::ConsistencySummary;
use super::ranker::AuthorSummary;
use super::trend::{TrendDirection, TrendSummary};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorProfile {
    pub author_handle: String,
    pub total_posts: usize,
    pub mean_score: f64,
    pub best_score: f64,
    pub worst_score: f64,
    pub total_engagement: u64,
    /// `None` when the author is excluded from trend classification
    pub direction: Option<TrendDirection>,
    pub improvement_delta: Option<f64>,
    /// `None` below the consistency post minimum
    pub consistency_score: Option<f64>,
    pub achievements: Vec<Achievement>,
}

impl AuthorProfile {
    pub fn build(
        summary: AuthorSummary,
        trend: Option<&TrendSummary>,
        consistency: Option<&ConsistencySummary>,
        achievements: Vec<Achievement>,
    ) -> Self {
        Self {
            author_handle: summary.author_handle,
            total_posts: summary.post_count,
            mean_score: summary.mean_score,
            best_score: summary.best_score,
            worst_score: summary.worst_score,
            total_engagement: summary.total_engagement,
            direction: trend.map(|t| TrendDirection::from_delta(t.improvement_delta)),
            improvement_delta: trend.map(|t| t.improvement_delta),
            consistency_score: consistency.map(|c| c.consistency_score),
            achievements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_trend_or_consistency() {
        let summary = AuthorSummary {
            author_handle: "solo".to_string(),
            post_count: 1,
            mean_score: 1.6,
            best_score: 1.6,
            worst_score: 1.6,
            total_engagement: 7,
        };

        let profile = AuthorProfile::build(summary, None, None, vec![Achievement::QualityPioneer]);

        assert_eq!(profile.author_handle, "solo");
        assert_eq!(profile.total_posts, 1);
        assert!(profile.direction.is_none());
        assert!(profile.improvement_delta.is_none());
        assert!(profile.consistency_score.is_none());
        assert_eq!(profile.achievements, vec![Achievement::QualityPioneer]);
    }

    #[test]
    fn test_build_declining_author() {
        let summary = AuthorSummary {
            author_handle: "fading".to_string(),
            post_count: 2,
            mean_score: 1.0,
            best_score: 1.5,
            worst_score: 0.5,
            total_engagement: 0,
        };
        let trend = TrendSummary {
            author_handle: "fading".to_string(),
            improvement_delta: -1.0,
            current_mean: 0.5,
            earlier_mean: 1.5,
            total_posts: 2,
        };

        let profile = AuthorProfile::build(summary, Some(&trend), None, Vec::new());

        assert_eq!(profile.direction, Some(TrendDirection::Declining));
        assert_eq!(profile.improvement_delta, Some(-1.0));
    }
}
