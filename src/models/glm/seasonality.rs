//! Fourier seasonality terms and design-matrix construction.

use crate::error::{AnalyticsError, Result};
use std::f64::consts::PI;

/// One seasonal cycle: its period and number of Fourier harmonics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalTerm {
    /// Period length in time-index units (e.g. 12 for monthly, 7 for daily-weekly).
    pub period: f64,
    /// Number of sine/cosine pairs.
    pub harmonics: usize,
}

/// Seasonality configuration for the GLM design matrix.
///
/// Columns are laid out as
/// `[intercept, trend?, sin(2πkt/P₁), cos(2πkt/P₁) for k = 1..K₁, ...]`,
/// one block of sine/cosine pairs per seasonal term, in the order the terms
/// were added.
///
/// # Example
/// ```
/// use market_analytics::models::glm::SeasonalitySpec;
///
/// let spec = SeasonalitySpec::new(12.0, 2).with_trend(true);
/// assert_eq!(spec.num_columns(), 1 + 1 + 4);
///
/// let weekly_and_yearly = SeasonalitySpec::new(7.0, 2).with_period(365.25, 3);
/// assert_eq!(weekly_and_yearly.num_columns(), 1 + 4 + 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalitySpec {
    terms: Vec<SeasonalTerm>,
    trend: bool,
}

impl SeasonalitySpec {
    /// Single seasonal period with `harmonics` Fourier pairs and no trend.
    pub fn new(period: f64, harmonics: usize) -> Self {
        Self {
            terms: vec![SeasonalTerm { period, harmonics }],
            trend: false,
        }
    }

    /// Add another seasonal period.
    pub fn with_period(mut self, period: f64, harmonics: usize) -> Self {
        self.terms.push(SeasonalTerm { period, harmonics });
        self
    }

    /// Include or drop the linear trend column.
    pub fn with_trend(mut self, trend: bool) -> Self {
        self.trend = trend;
        self
    }

    pub fn terms(&self) -> &[SeasonalTerm] {
        &self.terms
    }

    pub fn has_trend(&self) -> bool {
        self.trend
    }

    /// Total number of Fourier harmonics across all terms.
    pub fn total_harmonics(&self) -> usize {
        self.terms.iter().map(|t| t.harmonics).sum()
    }

    /// Number of design-matrix columns produced by this spec.
    pub fn num_columns(&self) -> usize {
        1 + usize::from(self.trend) + 2 * self.total_harmonics()
    }

    /// Check periods are positive and finite.
    pub fn validate(&self) -> Result<()> {
        for term in &self.terms {
            if !(term.period.is_finite() && term.period > 0.0) {
                return Err(AnalyticsError::InvalidParameter(format!(
                    "seasonal period must be positive, got {}",
                    term.period
                )));
            }
        }
        Ok(())
    }

    /// Human-readable column labels in design order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.num_columns());
        names.push("intercept".to_string());
        if self.trend {
            names.push("trend".to_string());
        }
        for term in &self.terms {
            for k in 1..=term.harmonics {
                names.push(format!("sin({}, P={})", k, term.period));
                names.push(format!("cos({}, P={})", k, term.period));
            }
        }
        names
    }
}

/// Seasonality spec bound to a trend origin.
///
/// The trend column is `t - origin`, so the intercept is the level at the
/// origin rather than at time zero. Fourier columns always use the raw `t`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DesignBasis {
    pub(crate) spec: SeasonalitySpec,
    pub(crate) origin: f64,
}

impl DesignBasis {
    pub(crate) fn new(spec: SeasonalitySpec, origin: f64) -> Self {
        Self { spec, origin }
    }

    /// Seasonal part of one design row.
    pub(crate) fn row(&self, t: f64) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.spec.num_columns());
        row.push(1.0);
        if self.spec.trend {
            row.push(t - self.origin);
        }
        for term in &self.spec.terms {
            for k in 1..=term.harmonics {
                let angle = 2.0 * PI * k as f64 * t / term.period;
                row.push(angle.sin());
                row.push(angle.cos());
            }
        }
        row
    }

    /// Full design matrix, with exogenous regressor columns appended.
    pub(crate) fn matrix(&self, timestamps: &[f64], regressors: &[Vec<f64>]) -> Vec<Vec<f64>> {
        timestamps
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                let mut row = self.row(t);
                row.extend(regressors.iter().map(|r| r[i]));
                row
            })
            .collect()
    }
}

/// Build the seasonal design matrix for `timestamps` with the trend measured from zero.
///
/// # Example
/// ```
/// use market_analytics::models::glm::{design_matrix, SeasonalitySpec};
///
/// let x = design_matrix(&SeasonalitySpec::new(4.0, 1), &[0.0, 1.0]).unwrap();
/// assert_eq!(x[0], vec![1.0, 0.0, 1.0]);
/// assert!((x[1][1] - 1.0).abs() < 1e-12); // sin(pi/2)
/// ```
pub fn design_matrix(spec: &SeasonalitySpec, timestamps: &[f64]) -> Result<Vec<Vec<f64>>> {
    spec.validate()?;
    Ok(DesignBasis::new(spec.clone(), 0.0).matrix(timestamps, &[]))
}
