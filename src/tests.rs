#[cfg(test)]
mod tests {
    use crate::aggregator_core::{AggregationEngine, Engagement, ScoredPost};

    /// Deterministic pseudo-random corpus (LCG) with a few invalid records mixed in
    fn synthetic_corpus(size: usize) -> Vec<ScoredPost> {
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = move || {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            state >> 33
        };

        (0..size)
            .map(|i| {
                let author = format!("author_{}", next() % 12);
                let score = match i % 37 {
                    0 => f64::NAN,
                    _ => (next() % 2000) as f64 / 1000.0,
                };
                let created_at = match i % 53 {
                    0 => "unknown".to_string(),
                    _ => (1_700_000_000 + (next() % 86_400) as i64).to_string(),
                };
                ScoredPost {
                    id: i.to_string(),
                    author_handle: if i % 41 == 0 { String::new() } else { author },
                    text: "x".repeat((next() % 300) as usize),
                    score,
                    created_at,
                    engagement: Engagement {
                        likes: next() % 50,
                        ..Engagement::default()
                    },
                }
            })
            .collect()
    }

    /// Every input record is either counted in exactly one author or skipped
    #[test]
    fn test_record_conservation() {
        let posts = synthetic_corpus(500);
        let report = AggregationEngine::with_defaults().aggregate(&posts);

        let counted: usize = report.rankings.iter().map(|s| s.post_count).sum();
        assert_eq!(counted + report.skipped.len(), posts.len());
        assert_eq!(report.insights.total_posts, counted);
        assert_eq!(report.aggregated_records(), counted);
        assert!(!report.skipped.is_empty());
    }

    #[test]
    fn test_best_is_exact_max_and_bounds_mean() {
        let posts = synthetic_corpus(500);
        let report = AggregationEngine::with_defaults().aggregate(&posts);

        for summary in &report.rankings {
            let max = posts
                .iter()
                .filter(|p| p.author_handle == summary.author_handle && p.score.is_finite())
                .map(|p| p.score)
                .fold(f64::NEG_INFINITY, f64::max);

            assert_eq!(summary.best_score.to_bits(), max.to_bits());
            assert!(summary.best_score >= summary.mean_score);
            assert!(summary.worst_score <= summary.mean_score);
        }
    }

    #[test]
    fn test_repeat_runs_are_bit_identical() {
        let posts = synthetic_corpus(300);
        let engine = AggregationEngine::with_defaults();

        let first = engine.aggregate(&posts);
        let second = engine.aggregate(&posts);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_view_invariants() {
        let posts = synthetic_corpus(400);
        let report = AggregationEngine::with_defaults().aggregate(&posts);

        for pair in report.rankings.windows(2) {
            assert!(pair[0].mean_score >= pair[1].mean_score);
        }
        for star in &report.rising_stars {
            assert!(star.total_posts >= 2);
        }
        for pair in report.rising_stars.windows(2) {
            assert!(pair[0].improvement_delta >= pair[1].improvement_delta);
        }
        for entry in &report.consistency {
            assert!(entry.consistency_score > 0.0 && entry.consistency_score <= 1.0);
            assert!(entry.post_count >= 2);
        }

        let tiers = &report.insights.quality_tiers;
        assert_eq!(tiers.low + tiers.medium + tiers.high, report.insights.total_posts);
        let buckets = &report.insights.length_vs_quality;
        assert_eq!(
            buckets.short.post_count + buckets.medium.post_count + buckets.long.post_count,
            report.insights.total_posts
        );
        assert!((0.0..=100.0).contains(&report.insights.high_quality_percent));
    }

    #[test]
    fn test_trend_exclusion_is_per_author() {
        let posts = synthetic_corpus(400);
        let report = AggregationEngine::with_defaults().aggregate(&posts);

        assert!(!report.trend_excluded.is_empty());
        for excluded in &report.trend_excluded {
            assert!(report
                .rising_stars
                .iter()
                .all(|s| s.author_handle != excluded.author_handle));
        }
    }
}
