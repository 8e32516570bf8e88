//! Achievement tags with configurable thresholds
//!
//! # Achievements
//! - **QUALITY_PIONEER**: best score at or above the pioneer threshold
//! - **HOT_STREAK**: the latest N posts all reach the streak threshold
//! - **CONSISTENCY_CHAMPION**: enough posts with a tight score spread
//! - **DIAMOND_CONTRIBUTOR**: sustained elite mean over many posts
//! - **IMPROVEMENT_MASTER**: recent window mean well above the opening window
//!
//! Streak and improvement read posts in time order, so they are only
//! awarded when every timestamp of the author is orderable.

use super::normalizer::NormalizedPost;
use super::ranker::AuthorGroups;
use super::stats::{bounded_mean, population_std_dev};
use super::trend::time_ordered;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Achievement {
    QualityPioneer,
    HotStreak,
    ConsistencyChampion,
    DiamondContributor,
    ImprovementMaster,
}

impl Achievement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Achievement::QualityPioneer => "QUALITY_PIONEER",
            Achievement::HotStreak => "HOT_STREAK",
            Achievement::ConsistencyChampion => "CONSISTENCY_CHAMPION",
            Achievement::DiamondContributor => "DIAMOND_CONTRIBUTOR",
            Achievement::ImprovementMaster => "IMPROVEMENT_MASTER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Achievement::QualityPioneer => "Quality Pioneer",
            Achievement::HotStreak => "Hot Streak",
            Achievement::ConsistencyChampion => "Consistency Champion",
            Achievement::DiamondContributor => "Diamond Contributor",
            Achievement::ImprovementMaster => "Improvement Master",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AchievementRules {
    pub pioneer_threshold: f64,
    pub streak_length: usize,
    pub streak_threshold: f64,
    pub champion_min_posts: usize,
    pub champion_max_std_dev: f64,
    pub diamond_min_posts: usize,
    pub diamond_min_mean: f64,
    pub improvement_min_posts: usize,
    pub improvement_window: usize,
    pub improvement_min_delta: f64,
}

impl Default for AchievementRules {
    fn default() -> Self {
        Self {
            pioneer_threshold: 1.5,
            streak_length: 5,
            streak_threshold: 1.0,
            champion_min_posts: 10,
            champion_max_std_dev: 0.2,
            diamond_min_posts: 20,
            diamond_min_mean: 1.8,
            improvement_min_posts: 10,
            improvement_window: 5,
            improvement_min_delta: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorAchievements {
    pub author_handle: String,
    pub achievements: Vec<Achievement>,
}

pub struct AchievementDetector {
    rules: AchievementRules,
}

impl AchievementDetector {
    pub fn new(rules: AchievementRules) -> Self {
        Self { rules }
    }

    pub fn with_defaults() -> Self {
        Self::new(AchievementRules::default())
    }

    /// Detect every achievement an author has earned, in declaration order
    pub fn detect(&self, posts: &[NormalizedPost<'_>]) -> Vec<Achievement> {
        let mut earned = Vec::new();
        if posts.is_empty() {
            return earned;
        }

        let scores: Vec<f64> = posts.iter().map(|p| p.score()).collect();
        let ordered_scores: Option<Vec<f64>> =
            time_ordered(posts).map(|ordered| ordered.iter().map(|p| p.score()).collect());
        let rules = &self.rules;

        if scores.iter().any(|s| *s >= rules.pioneer_threshold) {
            earned.push(Achievement::QualityPioneer);
        }

        if let Some(ordered) = &ordered_scores {
            if rules.streak_length > 0
                && ordered.len() >= rules.streak_length
                && ordered[ordered.len() - rules.streak_length..]
                    .iter()
                    .all(|s| *s >= rules.streak_threshold)
            {
                earned.push(Achievement::HotStreak);
            }
        }

        if scores.len() >= rules.champion_min_posts
            && population_std_dev(&scores) < rules.champion_max_std_dev
        {
            earned.push(Achievement::ConsistencyChampion);
        }

        if scores.len() >= rules.diamond_min_posts && bounded_mean(&scores) >= rules.diamond_min_mean {
            earned.push(Achievement::DiamondContributor);
        }

        if let Some(ordered) = &ordered_scores {
            let window = rules.improvement_window;
            if window > 0 && ordered.len() >= rules.improvement_min_posts.max(window) {
                let opening = bounded_mean(&ordered[..window]);
                let recent = bounded_mean(&ordered[ordered.len() - window..]);
                if recent - opening >= rules.improvement_min_delta {
                    earned.push(Achievement::ImprovementMaster);
                }
            }
        }

        earned
    }

    /// Authors with at least one achievement, in handle order
    pub fn detect_all(&self, groups: &AuthorGroups<'_>) -> Vec<AuthorAchievements> {
        groups
            .iter()
            .filter_map(|(handle, posts)| {
                let achievements = self.detect(posts);
                if achievements.is_empty() {
                    None
                } else {
                    Some(AuthorAchievements {
                        author_handle: handle.to_string(),
                        achievements,
                    })
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator_core::normalizer::{normalize, Engagement, ScoredPost};

    fn series(author: &str, scores: &[f64]) -> Vec<ScoredPost> {
        scores
            .iter()
            .enumerate()
            .map(|(i, score)| ScoredPost {
                id: format!("{}_{}", author, i),
                author_handle: author.to_string(),
                text: "test".to_string(),
                score: *score,
                created_at: (1_700_000_000 + i as i64 * 60).to_string(),
                engagement: Engagement::default(),
            })
            .collect()
    }

    fn detect(posts: &[ScoredPost]) -> Vec<Achievement> {
        let corpus = normalize(posts);
        AchievementDetector::with_defaults().detect(&corpus.posts)
    }

    #[test]
    fn test_quality_pioneer() {
        assert_eq!(detect(&series("a", &[0.2, 1.6])), vec![Achievement::QualityPioneer]);
        assert!(detect(&series("a", &[0.2, 1.4])).is_empty());
    }

    #[test]
    fn test_hot_streak_uses_latest_posts() {
        let earned = detect(&series("a", &[0.1, 1.0, 1.2, 1.1, 1.3, 1.0]));
        assert!(earned.contains(&Achievement::HotStreak));

        let broken = detect(&series("a", &[1.0, 1.2, 1.1, 1.3, 0.4]));
        assert!(!broken.contains(&Achievement::HotStreak));
    }

    #[test]
    fn test_hot_streak_requires_orderable_timestamps() {
        let mut posts = series("a", &[1.0, 1.2, 1.1, 1.3, 1.0]);
        posts[2].created_at = "whenever".to_string();

        assert!(!detect(&posts).contains(&Achievement::HotStreak));
    }

    #[test]
    fn test_consistency_champion_and_diamond() {
        let steady = detect(&series("a", &[1.9; 20]));
        assert_eq!(
            steady,
            vec![
                Achievement::QualityPioneer,
                Achievement::HotStreak,
                Achievement::ConsistencyChampion,
                Achievement::DiamondContributor,
            ]
        );

        let too_few = detect(&series("a", &[1.9; 9]));
        assert!(!too_few.contains(&Achievement::ConsistencyChampion));
        assert!(!too_few.contains(&Achievement::DiamondContributor));
    }

    #[test]
    fn test_improvement_master() {
        let scores = [0.2, 0.3, 0.2, 0.3, 0.2, 0.9, 1.0, 0.9, 1.0, 0.9];
        assert!(detect(&series("a", &scores)).contains(&Achievement::ImprovementMaster));

        let flat = [0.5; 10];
        assert!(!detect(&series("a", &flat)).contains(&Achievement::ImprovementMaster));
    }

    #[test]
    fn test_detect_all_skips_authors_without_achievements() {
        let mut posts = series("pioneer", &[1.7]);
        posts.extend(series("quiet", &[0.3]));
        let corpus = normalize(&posts);
        let groups = AuthorGroups::from_corpus(&corpus);

        let all = AchievementDetector::with_defaults().detect_all(&groups);

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].author_handle, "pioneer");
        assert_eq!(Achievement::QualityPioneer.as_str(), "QUALITY_PIONEER");
        assert_eq!(Achievement::QualityPioneer.label(), "Quality Pioneer");
    }
}
