//! NaN-skipping moment helpers over `f64` slices.

/// Arithmetic mean of the non-NaN values. Returns NaN if there are none.
pub fn nan_mean(data: &[f64]) -> f64 {
    let (sum, n) = data
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Sum of the non-NaN values. Returns 0.0 if there are none.
pub fn nan_sum(data: &[f64]) -> f64 {
    data.iter().filter(|v| !v.is_nan()).sum()
}

/// Population variance (N denominator) of the non-NaN values.
/// Returns NaN if there are none.
pub fn nan_var(data: &[f64]) -> f64 {
    let mean = nan_mean(data);
    if mean.is_nan() {
        return f64::NAN;
    }
    let (ss, n) = data
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), &v| (s + (v - mean) * (v - mean), n + 1));
    ss / n as f64
}

/// Population standard deviation (N denominator) of the non-NaN values.
/// Returns NaN if there are none.
pub fn nan_std(data: &[f64]) -> f64 {
    nan_var(data).sqrt()
}

/// Weighted mean `Σ(w·v) / Σw`. Returns NaN if the weights sum to zero.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return f64::NAN;
    }
    values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / total
}

/// Weighted quadratic mean `√(Σ(w·v²) / Σw)`, used to pool standard
/// deviations. Returns NaN if the weights sum to zero.
pub fn weighted_rms(values: &[f64], weights: &[f64]) -> f64 {
    let squared: Vec<f64> = values.iter().map(|v| v * v).collect();
    weighted_mean(&squared, weights).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nan_mean() {
        let data = [2.0, 4.0, f64::NAN, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(nan_mean(&data), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_mean_all_nan() {
        assert!(nan_mean(&[f64::NAN, f64::NAN]).is_nan());
        assert!(nan_mean(&[]).is_nan());
    }

    #[test]
    fn test_nan_sum() {
        assert_relative_eq!(nan_sum(&[1.0, f64::NAN, 2.5]), 3.5);
        assert_eq!(nan_sum(&[f64::NAN]), 0.0);
    }

    #[test]
    fn test_nan_std_population() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0, f64::NAN];
        // population sd of the classic example is exactly 2
        assert_relative_eq!(nan_std(&data), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_var_single() {
        assert_eq!(nan_var(&[5.0]), 0.0);
    }

    #[test]
    fn test_weighted_mean() {
        assert_relative_eq!(weighted_mean(&[1.0, 4.0], &[3.0, 1.0]), 1.75);
        assert!(weighted_mean(&[1.0], &[0.0]).is_nan());
    }

    #[test]
    fn test_weighted_rms() {
        // sqrt((3*1 + 1*16) / 4)
        assert_relative_eq!(weighted_rms(&[1.0, 4.0], &[3.0, 1.0]), (19.0f64 / 4.0).sqrt());
    }
}
