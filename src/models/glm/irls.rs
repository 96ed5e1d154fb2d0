//! Iteratively reweighted least squares for robust linear models.

use super::objective::ObjectiveKind;
use crate::error::{AnalyticsError, Result};
use crate::utils::stats::{mad, mean};
use crate::utils::wls::{mat_vec, weighted_least_squares};
use tracing::debug;

/// What to do when IRLS exhausts its iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvergencePolicy {
    /// Return [`AnalyticsError::NotConverged`] carrying the last iterate.
    #[default]
    Error,
    /// Return the last iterate as a model with `converged() == false`.
    ReturnLastIterate,
}

/// IRLS configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct IrlsConfig {
    /// Maximum number of reweighting iterations.
    pub max_iter: usize,
    /// Relative tolerance on the largest coefficient change.
    pub tolerance: f64,
    /// Behaviour when `max_iter` is reached without meeting `tolerance`.
    pub policy: ConvergencePolicy,
}

impl Default for IrlsConfig {
    fn default() -> Self {
        Self {
            max_iter: 50,
            tolerance: 1e-8,
            policy: ConvergencePolicy::Error,
        }
    }
}

impl IrlsConfig {
    /// Set maximum iterations.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the non-convergence policy.
    pub fn policy(mut self, policy: ConvergencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "max_iter must be at least 1".into(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Raw outcome of an IRLS run.
#[derive(Debug, Clone)]
pub(crate) struct IrlsFit {
    pub(crate) coefficients: Vec<f64>,
    pub(crate) standard_errors: Vec<f64>,
    pub(crate) weights: Vec<f64>,
    pub(crate) fitted: Vec<f64>,
    pub(crate) residuals: Vec<f64>,
    pub(crate) scale: f64,
    pub(crate) iterations: usize,
    pub(crate) converged: bool,
}

fn residuals_of(x: &[Vec<f64>], y: &[f64], beta: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let fitted = mat_vec(x, beta);
    let residuals = y.iter().zip(&fitted).map(|(a, f)| a - f).collect();
    (fitted, residuals)
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |m, v| m.max(v.abs()))
}

/// Columns whose largest entry is below this fraction of the largest design
/// entry (at least 1) are treated as identically zero.
const ZERO_COLUMN_TOLERANCE: f64 = 1e-9;

/// Indices of design columns that are not numerically zero.
///
/// A harmonic at half the period sampled on the period's integer grid, such
/// as `sin(πt)` for monthly data with six harmonics, evaluates to rounding
/// noise at every observation.
fn informative_columns(x: &[Vec<f64>]) -> Vec<usize> {
    let p = x.first().map_or(0, Vec::len);
    let column_max: Vec<f64> = (0..p)
        .map(|j| x.iter().fold(0.0, |m: f64, row| m.max(row[j].abs())))
        .collect();
    let threshold = ZERO_COLUMN_TOLERANCE * max_abs(&column_max).max(1.0);
    (0..p).filter(|&j| column_max[j] > threshold).collect()
}

/// Run IRLS on design matrix `x` and response `y`.
///
/// Starts from the unweighted least-squares solution, then alternates between
/// re-estimating the residual scale (normalized MAD about zero), recomputing
/// weights under `objective`, and solving the weighted normal equations.
///
/// All-zero design columns are left out of the solve. Their coefficient is
/// reported as 0 and their standard error as NaN.
pub(crate) fn irls(
    x: &[Vec<f64>],
    y: &[f64],
    objective: ObjectiveKind,
    config: &IrlsConfig,
) -> Result<IrlsFit> {
    let p = x.first().map_or(0, Vec::len);
    let active = informative_columns(x);
    if active.len() == p {
        return irls_full_rank(x, y, objective, config);
    }

    debug!(dropped = p - active.len(), "fitting without all-zero design columns");
    let reduced: Vec<Vec<f64>> = x
        .iter()
        .map(|row| active.iter().map(|&j| row[j]).collect())
        .collect();
    let mut fit = irls_full_rank(&reduced, y, objective, config)?;

    let mut coefficients = vec![0.0; p];
    let mut standard_errors = vec![f64::NAN; p];
    for (k, &j) in active.iter().enumerate() {
        coefficients[j] = fit.coefficients[k];
        standard_errors[j] = fit.standard_errors[k];
    }
    fit.coefficients = coefficients;
    fit.standard_errors = standard_errors;
    Ok(fit)
}

fn irls_full_rank(
    x: &[Vec<f64>],
    y: &[f64],
    objective: ObjectiveKind,
    config: &IrlsConfig,
) -> Result<IrlsFit> {
    let n = y.len();
    let mut weights = vec![1.0; n];
    let initial = weighted_least_squares(x, y, &weights)?;
    // Unit weights, so this factors X'X for the sandwich estimate.
    let xtx_inverse = initial.factor.inverse();
    let mut beta = initial.coefficients;

    // Scale below this is an exact fit of at least half the observations.
    let exact_scale = 1e-12 * max_abs(y).max(1.0);

    let mut converged = false;
    let mut iterations = 0;

    while iterations < config.max_iter {
        iterations += 1;

        let (_, residuals) = residuals_of(x, y, &beta);
        let scale = mad(&residuals, 0.0);
        if scale <= exact_scale {
            debug!(iterations, scale, "IRLS stopped on exact fit");
            converged = true;
            break;
        }

        for (w, r) in weights.iter_mut().zip(&residuals) {
            *w = objective.weight(r / scale);
        }

        let next = weighted_least_squares(x, y, &weights)?.coefficients;
        let delta = next
            .iter()
            .zip(&beta)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        beta = next;

        debug!(
            iterations,
            delta,
            scale,
            objective = objective.name(),
            "IRLS iteration"
        );

        if delta <= config.tolerance * (max_abs(&beta) + config.tolerance) {
            converged = true;
            break;
        }
    }

    let (fitted, residuals) = residuals_of(x, y, &beta);
    let scale = mad(&residuals, 0.0);
    let standard_errors = robust_standard_errors(&xtx_inverse, &residuals, scale, objective);

    Ok(IrlsFit {
        coefficients: beta,
        standard_errors,
        weights,
        fitted,
        residuals,
        scale,
        iterations,
        converged,
    })
}

/// Huber's H1 sandwich estimate of the coefficient standard errors.
///
/// `cov = k² · [Σψ(u)²/(n-p)] / [mean ψ'(u)]² · s² · (X'X)⁻¹`, with the
/// small-sample correction `k = 1 + (p/n) · var ψ'(u) / [mean ψ'(u)]²`.
/// Returns NaN entries when the estimate is undefined (exact fit, `n == p`,
/// or all observations rejected).
fn robust_standard_errors(
    xtx_inverse: &[Vec<f64>],
    residuals: &[f64],
    scale: f64,
    objective: ObjectiveKind,
) -> Vec<f64> {
    let n = residuals.len();
    let p = xtx_inverse.len();
    let undefined = vec![f64::NAN; p];

    if n <= p || scale.is_nan() || scale <= 0.0 {
        return undefined;
    }

    let u: Vec<f64> = residuals.iter().map(|r| r / scale).collect();
    let dpsi: Vec<f64> = u.iter().map(|&v| objective.psi_deriv(v)).collect();
    let m = mean(&dpsi);
    if m.is_nan() || m <= 0.0 {
        return undefined;
    }
    let var_dpsi = dpsi.iter().map(|d| (d - m).powi(2)).sum::<f64>() / n as f64;
    let k = 1.0 + (p as f64 / n as f64) * var_dpsi / (m * m);
    let sum_psi2: f64 = u.iter().map(|&v| objective.psi(v).powi(2)).sum();
    let factor = k * k * (sum_psi2 / (n - p) as f64) * scale * scale / (m * m);

    (0..p).map(|j| (factor * xtx_inverse[j][j]).sqrt()).collect()
}
