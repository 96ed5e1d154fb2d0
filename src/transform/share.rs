//! Share-weighted aggregation of panel data into model inputs.
//!
//! A panel is an `n × m` matrix: `n` time periods (rows) by `m` units such as
//! stores or products (columns). The weight panel (typically volume) gives
//! each unit's share of a period's total, and every predictor panel is
//! collapsed into one share-weighted value per period.

use crate::error::{AnalyticsError, Result};

/// Direction in which shares are normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShareAxis {
    /// Each unit's share of its row total.
    #[default]
    Row,
    /// Each period's share of its column total.
    Column,
}

/// Output of [`share_weighted`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShareWeighted {
    /// Row totals of the weight panel (the aggregated response).
    pub totals: Vec<f64>,
    /// One share-weighted series per predictor panel.
    pub predictors: Vec<Vec<f64>>,
}

fn value_or_zero(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

/// Collapse predictor panels into share-weighted series.
///
/// NaN weights and NaN predictor cells contribute zero. Rows or columns whose
/// weights sum to zero produce zero shares. A single NaN weight therefore
/// leaves the other shares of its row intact instead of turning the whole
/// row total, and every share divided by it, into NaN.
///
/// # Example
/// ```
/// use market_analytics::transform::{share_weighted, ShareAxis};
///
/// let volume = vec![vec![1.0, 3.0], vec![2.0, 2.0]];
/// let price = vec![vec![10.0, 20.0], vec![4.0, 6.0]];
///
/// let out = share_weighted(&volume, &[price], ShareAxis::Row).unwrap();
/// assert_eq!(out.totals, vec![4.0, 4.0]);
/// assert_eq!(out.predictors[0], vec![17.5, 5.0]);
/// ```
pub fn share_weighted(
    weights: &[Vec<f64>],
    predictors: &[Vec<Vec<f64>>],
    axis: ShareAxis,
) -> Result<ShareWeighted> {
    let n = weights.len();
    let m = weights.first().ok_or(AnalyticsError::EmptyData)?.len();

    for row in weights {
        if row.len() != m {
            return Err(AnalyticsError::DimensionMismatch {
                expected: m,
                got: row.len(),
            });
        }
    }
    for panel in predictors {
        if panel.len() != n {
            return Err(AnalyticsError::DimensionMismatch {
                expected: n,
                got: panel.len(),
            });
        }
        if let Some(row) = panel.iter().find(|row| row.len() != m) {
            return Err(AnalyticsError::DimensionMismatch {
                expected: m,
                got: row.len(),
            });
        }
    }

    let totals: Vec<f64> = weights
        .iter()
        .map(|row| row.iter().copied().map(value_or_zero).sum())
        .collect();

    let divisors: Vec<f64> = match axis {
        ShareAxis::Row => totals.clone(),
        ShareAxis::Column => (0..m)
            .map(|j| weights.iter().map(|row| value_or_zero(row[j])).sum())
            .collect(),
    };

    let shares: Vec<Vec<f64>> = weights
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, &w)| {
                    let d = match axis {
                        ShareAxis::Row => divisors[i],
                        ShareAxis::Column => divisors[j],
                    };
                    if d == 0.0 {
                        0.0
                    } else {
                        value_or_zero(w) / d
                    }
                })
                .collect()
        })
        .collect();

    let predictors = predictors
        .iter()
        .map(|panel| {
            panel
                .iter()
                .zip(&shares)
                .map(|(row, share)| {
                    row.iter()
                        .zip(share)
                        .map(|(&x, &s)| value_or_zero(x * s))
                        .sum()
                })
                .collect()
        })
        .collect();

    Ok(ShareWeighted { totals, predictors })
}
