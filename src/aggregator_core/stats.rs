//! Small numeric helpers shared by the per-author views

/// Arithmetic mean, clamped into `[min, max]` of the input
///
/// Floating point summation can land a hair outside the observed range
/// (three 0.1s average to 0.10000000000000002); the clamp keeps
/// `min <= mean <= max` exact. Empty input yields 0.0.
pub fn bounded_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let (min, max) = min_max(values);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    mean.clamp(min, max)
}

/// Population standard deviation
///
/// Returns exactly 0.0 when every value is identical, and 0.0 for fewer
/// than two values.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 || values.iter().all(|v| *v == values[0]) {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Ratio that reports 0.0 instead of NaN for an empty denominator
pub fn ratio_or_zero(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

pub fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(*v), hi.max(*v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_mean_stays_inside_range() {
        let values = [0.1, 0.1, 0.1];
        let mean = bounded_mean(&values);

        assert_eq!(mean, 0.1);
        assert_eq!(bounded_mean(&[]), 0.0);
        assert_eq!(bounded_mean(&[1.0, 2.0]), 1.5);
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(population_std_dev(&[1.0, 1.0, 1.0]), 0.0);
        assert_eq!(population_std_dev(&[0.1, 0.1, 0.1]), 0.0);
        assert_eq!(population_std_dev(&[0.0, 2.0]), 1.0);
        assert_eq!(population_std_dev(&[1.3]), 0.0);
    }

    #[test]
    fn test_ratio_or_zero() {
        assert_eq!(ratio_or_zero(5.0, 0), 0.0);
        assert_eq!(ratio_or_zero(5.0, 2), 2.5);
    }
}
