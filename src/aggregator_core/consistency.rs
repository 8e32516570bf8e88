//! Consistency scoring (inverse dispersion of an author's scores)

use super::normalizer::NormalizedPost;
use super::ranker::AuthorGroups;
use super::stats::{bounded_mean, population_std_dev};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencySummary {
    pub author_handle: String,
    /// 1 / (1 + stddev), in [0, 1]; higher is more stable
    pub consistency_score: f64,
    pub mean_score: f64,
    pub post_count: usize,
}

pub struct ConsistencyScorer {
    min_posts: usize,
}

impl ConsistencyScorer {
    /// `min_posts` below 2 is raised to 2; one score has no dispersion
    pub fn new(min_posts: usize) -> Self {
        Self {
            min_posts: min_posts.max(2),
        }
    }

    /// Compute consistency score (0.0-1.0) from a score collection
    ///
    /// Zero dispersion scores exactly 1.0; the score approaches 0.0 as the
    /// standard deviation grows without bound.
    pub fn compute_consistency_score(&self, scores: &[f64]) -> f64 {
        let std_dev = population_std_dev(scores);
        (1.0 / (1.0 + std_dev)).clamp(0.0, 1.0)
    }

    pub fn score_author(
        &self,
        author_handle: &str,
        posts: &[NormalizedPost<'_>],
    ) -> Option<ConsistencySummary> {
        if posts.len() < self.min_posts {
            return None;
        }

        let scores: Vec<f64> = posts.iter().map(|p| p.score()).collect();

        Some(ConsistencySummary {
            author_handle: author_handle.to_string(),
            consistency_score: self.compute_consistency_score(&scores),
            mean_score: bounded_mean(&scores),
            post_count: scores.len(),
        })
    }

    /// Eligible authors, ordered by consistency desc, mean desc, handle asc
    pub fn rank(&self, groups: &AuthorGroups<'_>) -> Vec<ConsistencySummary> {
        let mut ranked: Vec<ConsistencySummary> = groups
            .iter()
            .filter_map(|(handle, posts)| self.score_author(handle, posts))
            .collect();

        ranked.sort_by(|a, b| {
            b.consistency_score
                .total_cmp(&a.consistency_score)
                .then_with(|| b.mean_score.total_cmp(&a.mean_score))
                .then_with(|| a.author_handle.cmp(&b.author_handle))
        });

        ranked
    }
}

impl Default for ConsistencyScorer {
    fn default() -> Self {
        Self::new(2)
    }
}
