//! Shared sample statistics for the feature transforms (C7).

/// Unbiased sample mean, standard deviation (n-1), skewness, and excess
/// kurtosis of `data`.
///
/// Returns `(0.0, 0.0, 0.0, 0.0)` for fewer than two samples.
pub fn compute_stats(data: &[f64]) -> (f64, f64, f64, f64) {
    let n = data.len();
    if n < 2 {
        return (0.0, 0.0, 0.0, 0.0);
    }

    let mean = data.iter().sum::<f64>() / n as f64;

    let mut sum_sq = 0.0;
    let mut sum_cube = 0.0;
    let mut sum_quad = 0.0;
    for &x in data {
        let d = x - mean;
        let d2 = d * d;
        sum_sq += d2;
        sum_cube += d2 * d;
        sum_quad += d2 * d2;
    }

    let std = (sum_sq / (n - 1) as f64).sqrt();
    let (skew, kurt) = if std != 0.0 {
        let skew = sum_cube / (n - 1) as f64 / std.powi(3);
        let kurt = sum_quad / (n - 1) as f64 / std.powi(4) - 3.0;
        (skew, kurt)
    } else {
        (0.0, 0.0)
    };

    (mean, std, skew, kurt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_sequence_has_zero_spread() {
        let (mean, std, skew, kurt) = compute_stats(&[3.0; 10]);
        assert_eq!(mean, 3.0);
        assert_eq!(std, 0.0);
        assert_eq!(skew, 0.0);
        assert_eq!(kurt, 0.0);
    }

    #[test]
    fn test_single_sample_returns_zeros() {
        assert_eq!(compute_stats(&[1.0]), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_symmetric_sequence_has_zero_skew() {
        let (_, _, skew, _) = compute_stats(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert!(skew.abs() < 1e-9);
    }
}
