//! Per-author grouping and the overall leaderboard

use super::normalizer::{NormalizedCorpus, NormalizedPost};
use super::stats::{bounded_mean, min_max};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Validated posts grouped by author handle (case-sensitive)
///
/// Built once per pass and shared read-only by every per-author view.
/// Within a group, posts keep their snapshot order.
#[derive(Debug, Clone, Default)]
pub struct AuthorGroups<'a> {
    groups: BTreeMap<&'a str, Vec<NormalizedPost<'a>>>,
}

impl<'a> AuthorGroups<'a> {
    pub fn from_corpus(corpus: &NormalizedCorpus<'a>) -> Self {
        let mut groups: BTreeMap<&'a str, Vec<NormalizedPost<'a>>> = BTreeMap::new();

        for post in &corpus.posts {
            groups.entry(post.author()).or_default().push(*post);
        }

        Self { groups }
    }

    pub fn get(&self, author_handle: &str) -> Option<&[NormalizedPost<'a>]> {
        self.groups.get(author_handle).map(|posts| posts.as_slice())
    }

    /// Iterate authors in ascending handle order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[NormalizedPost<'a>])> + '_ {
        self.groups.iter().map(|(handle, posts)| (*handle, posts.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorSummary {
    pub author_handle: String,
    pub post_count: usize,
    pub mean_score: f64,
    pub best_score: f64,
    pub worst_score: f64,
    /// Likes + reposts + replies across the author's posts
    pub total_engagement: u64,
}

impl AuthorSummary {
    /// Summarize one author's posts; `None` for an empty slice
    pub fn from_posts(author_handle: &str, posts: &[NormalizedPost<'_>]) -> Option<Self> {
        if posts.is_empty() {
            return None;
        }

        let scores: Vec<f64> = posts.iter().map(|p| p.score()).collect();
        let (worst_score, best_score) = min_max(&scores);

        Some(Self {
            author_handle: author_handle.to_string(),
            post_count: posts.len(),
            mean_score: bounded_mean(&scores),
            best_score,
            worst_score,
            total_engagement: posts
                .iter()
                .map(|p| p.post.engagement.interactions())
                .fold(0u64, u64::saturating_add),
        })
    }
}

pub struct RankAggregator;

impl RankAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Map every author to their summary
    pub fn summarize(&self, groups: &AuthorGroups<'_>) -> BTreeMap<String, AuthorSummary> {
        groups
            .iter()
            .filter_map(|(handle, posts)| {
                AuthorSummary::from_posts(handle, posts).map(|s| (handle.to_string(), s))
            })
            .collect()
    }

    /// Leaderboard order: mean desc, post count desc, handle asc
    pub fn rank(&self, summaries: &BTreeMap<String, AuthorSummary>) -> Vec<AuthorSummary> {
        let mut ranked: Vec<AuthorSummary> = summaries.values().cloned().collect();
        ranked.sort_by(ranking_order);
        ranked
    }
}

impl Default for RankAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn ranking_order(a: &AuthorSummary, b: &AuthorSummary) -> Ordering {
    b.mean_score
        .total_cmp(&a.mean_score)
        .then_with(|| b.post_count.cmp(&a.post_count))
        .then_with(|| a.author_handle.cmp(&b.author_handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator_core::normalizer::{normalize, Engagement, ScoredPost};

    fn create_test_post(id: usize, author: &str, score: f64) -> ScoredPost {
        ScoredPost {
            id: format!("post_{}", id),
            author_handle: author.to_string(),
            text: "test".to_string(),
            score,
            created_at: format!("{}", 1_700_000_000 + id as i64),
            engagement: Engagement {
                likes: 2,
                reposts: 1,
                replies: 1,
                views: 100,
                ..Engagement::default()
            },
        }
    }

    #[test]
    fn test_summary_statistics() {
        let posts = vec![
            create_test_post(1, "alice", 1.0),
            create_test_post(2, "alice", 2.0),
            create_test_post(3, "alice", 0.0),
        ];
        let corpus = normalize(&posts);
        let groups = AuthorGroups::from_corpus(&corpus);

        let summaries = RankAggregator::new().summarize(&groups);
        let alice = &summaries["alice"];

        assert_eq!(alice.post_count, 3);
        assert_eq!(alice.mean_score, 1.0);
        assert_eq!(alice.best_score, 2.0);
        assert_eq!(alice.worst_score, 0.0);
        assert_eq!(alice.total_engagement, 12);
    }

    #[test]
    fn test_ranking_tie_breaks() {
        let posts = vec![
            create_test_post(1, "carol", 1.5),
            create_test_post(2, "bob", 1.5),
            create_test_post(3, "dave", 1.5),
            create_test_post(4, "dave", 1.5),
            create_test_post(5, "erin", 1.9),
        ];
        let corpus = normalize(&posts);
        let groups = AuthorGroups::from_corpus(&corpus);
        let aggregator = RankAggregator::new();

        let ranked = aggregator.rank(&aggregator.summarize(&groups));
        let order: Vec<&str> = ranked.iter().map(|s| s.author_handle.as_str()).collect();

        // erin has the best mean, dave wins the tie on post count, bob/carol by handle
        assert_eq!(order, vec!["erin", "dave", "bob", "carol"]);
    }

    #[test]
    fn test_handles_are_case_sensitive() {
        let posts = vec![create_test_post(1, "Alice", 1.0), create_test_post(2, "alice", 1.0)];
        let corpus = normalize(&posts);
        let groups = AuthorGroups::from_corpus(&corpus);

        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let corpus = normalize(&[]);
        let groups = AuthorGroups::from_corpus(&corpus);
        let aggregator = RankAggregator::new();

        assert!(groups.is_empty());
        assert!(aggregator.rank(&aggregator.summarize(&groups)).is_empty());
    }
}
