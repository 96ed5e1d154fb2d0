//! Seasonal GLM fitter and fitted model.

use super::irls::{irls, ConvergencePolicy, IrlsConfig};
use super::objective::ObjectiveKind;
use super::seasonality::{DesignBasis, SeasonalitySpec};
use crate::core::{time_index, TimeSeries};
use crate::error::{AnalyticsError, Result};
use crate::utils::metrics::rmse;
use crate::utils::stats::two_sided_p_value;
use chrono::{DateTime, Duration, Utc};
use tracing::warn;

/// Robust GLM with intercept, optional trend and Fourier seasonality.
///
/// # Example
/// ```
/// use market_analytics::core::TimeSeries;
/// use market_analytics::models::glm::{ObjectiveKind, SeasonalGlm, SeasonalitySpec};
///
/// let values: Vec<f64> = (0..48)
///     .map(|t| 100.0 + 10.0 * (2.0 * std::f64::consts::PI * t as f64 / 12.0).sin())
///     .collect();
/// let series = TimeSeries::from_values(values).unwrap();
///
/// let model = SeasonalGlm::new(SeasonalitySpec::new(12.0, 2))
///     .objective(ObjectiveKind::biweight())
///     .fit(&series)
///     .unwrap();
///
/// let next = model.predict(&[48.0, 51.0]).unwrap();
/// assert!((next[0] - 100.0).abs() < 1e-6);
/// assert!((next[1] - 110.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalGlm {
    spec: SeasonalitySpec,
    objective: ObjectiveKind,
    config: IrlsConfig,
}

impl SeasonalGlm {
    /// Fitter with the default biweight objective and IRLS settings.
    pub fn new(spec: SeasonalitySpec) -> Self {
        Self {
            spec,
            objective: ObjectiveKind::default(),
            config: IrlsConfig::default(),
        }
    }

    /// Set the robust objective.
    pub fn objective(mut self, objective: ObjectiveKind) -> Self {
        self.objective = objective;
        self
    }

    /// Set the IRLS configuration.
    pub fn config(mut self, config: IrlsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn spec(&self) -> &SeasonalitySpec {
        &self.spec
    }

    /// Fit the model to `series`.
    pub fn fit(&self, series: &TimeSeries) -> Result<FittedModel> {
        self.fit_with_regressors(series, &[])
    }

    /// Fit with additional exogenous regressor columns.
    ///
    /// Each regressor must have one value per observation; its coefficient is
    /// placed after the seasonal coefficients, in the order given.
    pub fn fit_with_regressors(
        &self,
        series: &TimeSeries,
        regressors: &[Vec<f64>],
    ) -> Result<FittedModel> {
        self.spec.validate()?;
        self.objective.validate()?;
        self.config.validate()?;

        let n = series.len();
        if n == 0 {
            return Err(AnalyticsError::EmptyData);
        }
        check_regressors(regressors, n)?;

        let columns = self.spec.num_columns() + regressors.len();
        if n < columns {
            return Err(AnalyticsError::InsufficientData {
                needed: columns,
                got: n,
            });
        }

        let basis = DesignBasis::new(self.spec.clone(), series.timestamps()[0]);
        let x = basis.matrix(series.timestamps(), regressors);
        let fit = irls(&x, series.values(), self.objective, &self.config)?;

        let model = FittedModel {
            basis,
            objective: self.objective,
            num_regressors: regressors.len(),
            coefficients: fit.coefficients,
            standard_errors: fit.standard_errors,
            weights: fit.weights,
            fitted: fit.fitted,
            residuals: fit.residuals,
            scale: fit.scale,
            iterations: fit.iterations,
            converged: fit.converged,
        };

        if model.converged {
            return Ok(model);
        }

        warn!(
            iterations = model.iterations,
            objective = self.objective.name(),
            "IRLS reached max_iter without meeting tolerance"
        );
        match self.config.policy {
            ConvergencePolicy::ReturnLastIterate => Ok(model),
            ConvergencePolicy::Error => Err(AnalyticsError::NotConverged {
                iterations: model.iterations,
                last: Box::new(model),
            }),
        }
    }
}

/// Fit a seasonal GLM with default IRLS settings.
pub fn fit(
    series: &TimeSeries,
    spec: &SeasonalitySpec,
    objective: ObjectiveKind,
) -> Result<FittedModel> {
    SeasonalGlm::new(spec.clone()).objective(objective).fit(series)
}

fn check_regressors(regressors: &[Vec<f64>], n: usize) -> Result<()> {
    for (i, r) in regressors.iter().enumerate() {
        if r.len() != n {
            return Err(AnalyticsError::DimensionMismatch {
                expected: n,
                got: r.len(),
            });
        }
        if r.iter().any(|v| !v.is_finite()) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "regressor {} has non-finite values",
                i
            )));
        }
    }
    Ok(())
}

/// Coefficients and diagnostics of a fitted seasonal GLM.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    basis: DesignBasis,
    objective: ObjectiveKind,
    num_regressors: usize,
    coefficients: Vec<f64>,
    standard_errors: Vec<f64>,
    weights: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    scale: f64,
    iterations: usize,
    converged: bool,
}

impl FittedModel {
    /// Coefficients in design-column order.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Level at the trend origin (the first training timestamp).
    pub fn intercept(&self) -> f64 {
        self.coefficients[0]
    }

    /// Slope per time unit, if the model has a trend column.
    pub fn trend(&self) -> Option<f64> {
        self.basis.spec.has_trend().then(|| self.coefficients[1])
    }

    /// Time index the trend column is measured from.
    pub fn trend_origin(&self) -> f64 {
        self.basis.origin
    }

    /// Sine/cosine coefficients, interleaved per harmonic.
    pub fn seasonal_coefficients(&self) -> &[f64] {
        let start = 1 + usize::from(self.basis.spec.has_trend());
        let end = self.basis.spec.num_columns();
        &self.coefficients[start..end]
    }

    /// Exogenous regressor coefficients.
    pub fn regressor_coefficients(&self) -> &[f64] {
        &self.coefficients[self.basis.spec.num_columns()..]
    }

    /// Labels of the design columns.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = self.basis.spec.column_names();
        names.extend((0..self.num_regressors).map(|i| format!("x{}", i)));
        names
    }

    pub fn spec(&self) -> &SeasonalitySpec {
        &self.basis.spec
    }

    pub fn objective(&self) -> ObjectiveKind {
        self.objective
    }

    /// Robust (Huber H1) standard errors of the coefficients.
    pub fn standard_errors(&self) -> &[f64] {
        &self.standard_errors
    }

    /// Coefficient z-statistics.
    pub fn z_values(&self) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.standard_errors)
            .map(|(b, se)| b / se)
            .collect()
    }

    /// Two-sided p-values under a normal reference distribution.
    pub fn p_values(&self) -> Vec<f64> {
        self.z_values().into_iter().map(two_sided_p_value).collect()
    }

    /// Wald chi-square statistic of each coefficient (`z²`).
    pub fn chi_square(&self) -> Vec<f64> {
        self.z_values().into_iter().map(|z| z * z).collect()
    }

    /// Final IRLS weights of the training observations.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Fitted values on the training timestamps.
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    /// Training residuals (`response - fitted`).
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Robust residual scale (normalized MAD).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Predict the response at new timestamps.
    ///
    /// Fails when the model was fitted with exogenous regressors; use
    /// [`FittedModel::predict_with_regressors`] instead.
    pub fn predict(&self, timestamps: &[f64]) -> Result<Vec<f64>> {
        self.predict_with_regressors(timestamps, &[])
    }

    /// Predict with future values of the exogenous regressors.
    pub fn predict_with_regressors(
        &self,
        timestamps: &[f64],
        regressors: &[Vec<f64>],
    ) -> Result<Vec<f64>> {
        if regressors.len() != self.num_regressors {
            return Err(AnalyticsError::DimensionMismatch {
                expected: self.num_regressors,
                got: regressors.len(),
            });
        }
        if timestamps.iter().any(|t| !t.is_finite()) {
            return Err(AnalyticsError::InvalidTimestamps(
                "prediction timestamps must be finite".into(),
            ));
        }
        check_regressors(regressors, timestamps.len())?;

        Ok(self
            .basis
            .matrix(timestamps, regressors)
            .iter()
            .map(|row| row.iter().zip(&self.coefficients).map(|(x, b)| x * b).sum())
            .collect())
    }

    /// Predict at calendar timestamps measured in `unit`s since the epoch.
    pub fn predict_datetimes(
        &self,
        timestamps: &[DateTime<Utc>],
        unit: Duration,
    ) -> Result<Vec<f64>> {
        let index = timestamps
            .iter()
            .map(|ts| time_index(ts, unit))
            .collect::<Result<Vec<_>>>()?;
        self.predict(&index)
    }

    /// RMSE of predictions at `timestamps` against observed `actual` values.
    pub fn evaluate(&self, timestamps: &[f64], actual: &[f64]) -> Result<f64> {
        let predicted = self.predict(timestamps)?;
        rmse(actual, &predicted)
    }
}
