//! Accuracy metrics for evaluating model predictions.

use crate::error::{AnalyticsError, Result};

/// Root mean squared error between actual and predicted values.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(AnalyticsError::EmptyData);
    }

    if actual.len() != predicted.len() {
        return Err(AnalyticsError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;

    Ok(mse.sqrt())
}
