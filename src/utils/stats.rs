//! Statistical utility functions.

use statrs::distribution::{ContinuousCDF, Normal};

/// Consistency constant turning the MAD into a normal standard deviation.
pub const MAD_NORMAL_CONSTANT: f64 = 0.6744897501960817;

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the median of a slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n.is_multiple_of(2) {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Normalized median absolute deviation about `center`.
///
/// Scaled so that it estimates the standard deviation of normal data.
pub fn mad(values: &[f64], center: f64) -> f64 {
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations) / MAD_NORMAL_CONSTANT
}

/// Two-sided p-value of a standard normal test statistic.
pub fn two_sided_p_value(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    // Normal::new(0, 1) cannot fail.
    match Normal::new(0.0, 1.0) {
        Ok(normal) => 2.0 * normal.sf(z.abs()),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn median_calculates_correctly() {
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5, epsilon = 1e-10);
        assert_relative_eq!(median(&[5.0, 1.0, 3.0, 2.0, 4.0]), 3.0, epsilon = 1e-10);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn mad_ignores_single_outlier() {
        let values = [1.0, -1.0, 1.0, -1.0, 1000.0];
        assert_relative_eq!(mad(&values, 0.0), 1.0 / MAD_NORMAL_CONSTANT, epsilon = 1e-12);
    }

    #[test]
    fn p_value_known_quantiles() {
        assert_relative_eq!(two_sided_p_value(0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(two_sided_p_value(1.959964), 0.05, epsilon = 1e-5);
        assert_relative_eq!(two_sided_p_value(-1.959964), 0.05, epsilon = 1e-5);
    }
}
