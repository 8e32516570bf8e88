//! Rising-star detection via an earlier/later midpoint split
//!
//! # Algorithm
//!
//! ```text
//! author posts (sorted by created_at, ties keep snapshot order)
//!     ↓
//! split at floor(n/2): earlier = [0, mid), later = [mid, n)
//!     ↓
//! improvement_delta = mean(later) - mean(earlier)
//! ```
//!
//! Parameter-free and indifferent to posting cadence; it trades temporal
//! precision for simplicity.

use super::normalizer::NormalizedPost;
use super::ranker::AuthorGroups;
use super::stats::bounded_mean;
use serde::Serialize;

/// Deltas within this band classify as `Stable`
const STABLE_BAND: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub author_handle: String,
    /// later mean - earlier mean; positive means improving
    pub improvement_delta: f64,
    /// Mean over the later half
    pub current_mean: f64,
    pub earlier_mean: f64,
    pub total_posts: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl TrendDirection {
    pub fn from_delta(delta: f64) -> Self {
        if delta > STABLE_BAND {
            TrendDirection::Improving
        } else if delta < -STABLE_BAND {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    }
}

pub struct TrendClassifier {
    min_posts: usize,
}

impl TrendClassifier {
    /// `min_posts` below 2 is raised to 2 so both halves are non-empty
    pub fn new(min_posts: usize) -> Self {
        Self {
            min_posts: min_posts.max(2),
        }
    }

    /// Classify one author, or `None` when the author is excluded
    ///
    /// Exclusion happens for too few posts or any unorderable timestamp;
    /// excluded authors never get a synthetic zero delta.
    pub fn classify_author(
        &self,
        author_handle: &str,
        posts: &[NormalizedPost<'_>],
    ) -> Option<TrendSummary> {
        if posts.len() < self.min_posts {
            return None;
        }

        let ordered = time_ordered(posts)?;
        let scores: Vec<f64> = ordered.iter().map(|p| p.score()).collect();
        let (earlier, later) = split_midpoint(&scores)?;

        let earlier_mean = bounded_mean(earlier);
        let current_mean = bounded_mean(later);

        Some(TrendSummary {
            author_handle: author_handle.to_string(),
            improvement_delta: current_mean - earlier_mean,
            current_mean,
            earlier_mean,
            total_posts: scores.len(),
        })
    }

    /// All classifiable authors, ordered by delta desc, current mean desc, handle asc
    pub fn rising_stars(&self, groups: &AuthorGroups<'_>) -> Vec<TrendSummary> {
        let mut trends: Vec<TrendSummary> = groups
            .iter()
            .filter_map(|(handle, posts)| self.classify_author(handle, posts))
            .collect();

        trends.sort_by(|a, b| {
            b.improvement_delta
                .total_cmp(&a.improvement_delta)
                .then_with(|| b.current_mean.total_cmp(&a.current_mean))
                .then_with(|| a.author_handle.cmp(&b.author_handle))
        });

        log::debug!("📈 Classified {} of {} authors for trends", trends.len(), groups.len());
        trends
    }
}

/// Sort posts ascending by timestamp; `None` if any timestamp is unorderable
pub fn time_ordered<'a>(posts: &[NormalizedPost<'a>]) -> Option<Vec<NormalizedPost<'a>>> {
    if posts.iter().any(|p| p.created_at.is_none()) {
        return None;
    }

    let mut ordered = posts.to_vec();
    ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.index.cmp(&b.index)));
    Some(ordered)
}

/// Split at `floor(n/2)`; `None` when either half would be empty
pub fn split_midpoint(scores: &[f64]) -> Option<(&[f64], &[f64])> {
    let mid = scores.len() / 2;
    if mid == 0 {
        return None;
    }
    Some(scores.split_at(mid))
}
