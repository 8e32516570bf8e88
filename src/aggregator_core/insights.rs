//! Community health aggregates over the whole corpus
//!
//! Single pass with running accumulators; no per-author grouping involved.

use super::normalizer::{Engagement, NormalizedPost};
use super::stats::ratio_or_zero;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthBucket {
    Short,
    Medium,
    Long,
}

impl LengthBucket {
    /// short: `len < short_limit`, long: `len > long_limit`, medium otherwise
    pub fn classify(length: usize, short_limit: usize, long_limit: usize) -> Self {
        if length < short_limit {
            LengthBucket::Short
        } else if length > long_limit {
            LengthBucket::Long
        } else {
            LengthBucket::Medium
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    pub fn classify(score: f64, medium_threshold: f64, high_threshold: f64) -> Self {
        if score >= high_threshold {
            QualityTier::High
        } else if score >= medium_threshold {
            QualityTier::Medium
        } else {
            QualityTier::Low
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BucketStats {
    pub post_count: usize,
    /// 0.0 when the bucket is empty
    pub mean_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LengthQuality {
    pub short: BucketStats,
    pub medium: BucketStats,
    pub long: BucketStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TierHistogram {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommunityInsights {
    pub total_posts: usize,
    pub mean_score: f64,
    /// Mean character count of post text
    pub mean_length: f64,
    /// 0-100; share of posts scoring at or above the high-quality threshold
    pub high_quality_percent: f64,
    pub length_vs_quality: LengthQuality,
    pub quality_tiers: TierHistogram,
    pub engagement: Engagement,
}

#[derive(Default)]
struct BucketAccumulator {
    count: usize,
    score_sum: f64,
}

impl BucketAccumulator {
    fn add(&mut self, score: f64) {
        self.count += 1;
        self.score_sum += score;
    }

    fn finish(&self) -> BucketStats {
        BucketStats {
            post_count: self.count,
            mean_score: ratio_or_zero(self.score_sum, self.count),
        }
    }
}

pub struct InsightsAggregator {
    high_quality_threshold: f64,
    medium_quality_threshold: f64,
    short_length_limit: usize,
    long_length_limit: usize,
}

impl InsightsAggregator {
    pub fn new(
        high_quality_threshold: f64,
        medium_quality_threshold: f64,
        short_length_limit: usize,
        long_length_limit: usize,
    ) -> Self {
        Self {
            high_quality_threshold,
            medium_quality_threshold,
            short_length_limit,
            long_length_limit,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(1.5, 1.0, 80, 200)
    }

    /// Aggregate the corpus in one traversal; empty input yields all zeros
    pub fn aggregate(&self, posts: &[NormalizedPost<'_>]) -> CommunityInsights {
        let mut score_sum = 0.0;
        let mut length_sum = 0usize;
        let mut high_quality = 0usize;
        let mut short = BucketAccumulator::default();
        let mut medium = BucketAccumulator::default();
        let mut long = BucketAccumulator::default();
        let mut tiers = TierHistogram::default();
        let mut engagement = Engagement::default();

        for post in posts {
            let score = post.score();
            score_sum += score;
            length_sum += post.length;

            if score >= self.high_quality_threshold {
                high_quality += 1;
            }

            match LengthBucket::classify(post.length, self.short_length_limit, self.long_length_limit) {
                LengthBucket::Short => short.add(score),
                LengthBucket::Medium => medium.add(score),
                LengthBucket::Long => long.add(score),
            }

            match QualityTier::classify(score, self.medium_quality_threshold, self.high_quality_threshold) {
                QualityTier::Low => tiers.low += 1,
                QualityTier::Medium => tiers.medium += 1,
                QualityTier::High => tiers.high += 1,
            }

            engagement.accumulate(&post.post.engagement);
        }

        let total = posts.len();

        CommunityInsights {
            total_posts: total,
            mean_score: ratio_or_zero(score_sum, total),
            mean_length: ratio_or_zero(length_sum as f64, total),
            high_quality_percent: 100.0 * ratio_or_zero(high_quality as f64, total),
            length_vs_quality: LengthQuality {
                short: short.finish(),
                medium: medium.finish(),
                long: long.finish(),
            },
            quality_tiers: tiers,
            engagement,
        }
    }
}
