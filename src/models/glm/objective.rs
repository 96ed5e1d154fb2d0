//! Robust objective functions (M-estimator norms) for IRLS.
//!
//! Every objective is evaluated on scaled residuals `u = r / s`, where `s` is
//! the robust residual scale.

use crate::error::{AnalyticsError, Result};

/// Default Huber tuning constant (95% efficiency under normal errors).
pub const DEFAULT_HUBER_C: f64 = 1.345;

/// Default Tukey biweight tuning constant (95% efficiency under normal errors).
pub const DEFAULT_BIWEIGHT_C: f64 = 4.685;

/// Objective minimized by the seasonal GLM fitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectiveKind {
    /// Ordinary least squares: `ρ(u) = u²/2`.
    LeastSquares,
    /// Huber loss: quadratic for `|u| ≤ c`, linear beyond.
    Huber { c: f64 },
    /// Tukey biweight (bisquare): redescending, residuals beyond `c` get zero weight.
    Biweight { c: f64 },
}

impl Default for ObjectiveKind {
    fn default() -> Self {
        ObjectiveKind::biweight()
    }
}

impl ObjectiveKind {
    /// Huber loss with the default tuning constant.
    pub fn huber() -> Self {
        ObjectiveKind::Huber { c: DEFAULT_HUBER_C }
    }

    /// Tukey biweight with the default tuning constant.
    pub fn biweight() -> Self {
        ObjectiveKind::Biweight {
            c: DEFAULT_BIWEIGHT_C,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ObjectiveKind::LeastSquares => "least_squares",
            ObjectiveKind::Huber { .. } => "huber",
            ObjectiveKind::Biweight { .. } => "biweight",
        }
    }

    /// Check the tuning constant.
    pub fn validate(&self) -> Result<()> {
        match *self {
            ObjectiveKind::LeastSquares => Ok(()),
            ObjectiveKind::Huber { c } | ObjectiveKind::Biweight { c } => {
                if c.is_finite() && c > 0.0 {
                    Ok(())
                } else {
                    Err(AnalyticsError::InvalidParameter(format!(
                        "{} tuning constant must be positive, got {}",
                        self.name(),
                        c
                    )))
                }
            }
        }
    }

    /// Loss `ρ(u)`.
    pub fn loss(&self, u: f64) -> f64 {
        match *self {
            ObjectiveKind::LeastSquares => 0.5 * u * u,
            ObjectiveKind::Huber { c } => {
                if u.abs() <= c {
                    0.5 * u * u
                } else {
                    c * u.abs() - 0.5 * c * c
                }
            }
            ObjectiveKind::Biweight { c } => {
                let cap = c * c / 6.0;
                if u.abs() <= c {
                    let v = 1.0 - (u / c).powi(2);
                    cap * (1.0 - v * v * v)
                } else {
                    cap
                }
            }
        }
    }

    /// Influence function `ψ(u) = ρ'(u)`.
    pub fn psi(&self, u: f64) -> f64 {
        match *self {
            ObjectiveKind::LeastSquares => u,
            ObjectiveKind::Huber { c } => u.clamp(-c, c),
            ObjectiveKind::Biweight { c } => {
                if u.abs() <= c {
                    let v = 1.0 - (u / c).powi(2);
                    u * v * v
                } else {
                    0.0
                }
            }
        }
    }

    /// Derivative of the influence function `ψ'(u)`.
    pub fn psi_deriv(&self, u: f64) -> f64 {
        match *self {
            ObjectiveKind::LeastSquares => 1.0,
            ObjectiveKind::Huber { c } => {
                if u.abs() <= c {
                    1.0
                } else {
                    0.0
                }
            }
            ObjectiveKind::Biweight { c } => {
                if u.abs() <= c {
                    let q = (u / c).powi(2);
                    (1.0 - q) * (1.0 - 5.0 * q)
                } else {
                    0.0
                }
            }
        }
    }

    /// IRLS weight `w(u) = ψ(u) / u`.
    pub fn weight(&self, u: f64) -> f64 {
        match *self {
            ObjectiveKind::LeastSquares => 1.0,
            ObjectiveKind::Huber { c } => {
                if u.abs() <= c {
                    1.0
                } else {
                    c / u.abs()
                }
            }
            ObjectiveKind::Biweight { c } => {
                if u.abs() <= c {
                    let v = 1.0 - (u / c).powi(2);
                    v * v
                } else {
                    0.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [ObjectiveKind; 3] = [
        ObjectiveKind::LeastSquares,
        ObjectiveKind::Huber { c: DEFAULT_HUBER_C },
        ObjectiveKind::Biweight {
            c: DEFAULT_BIWEIGHT_C,
        },
    ];

    #[test]
    fn default_is_biweight() {
        assert_eq!(
            ObjectiveKind::default(),
            ObjectiveKind::Biweight { c: 4.685 }
        );
    }

    #[test]
    fn loss_is_zero_and_weight_one_at_origin() {
        for obj in ALL {
            assert_relative_eq!(obj.loss(0.0), 0.0);
            assert_relative_eq!(obj.weight(0.0), 1.0);
            assert_relative_eq!(obj.psi_deriv(0.0), 1.0);
        }
    }

    #[test]
    fn weight_matches_psi_over_u() {
        for obj in ALL {
            for &u in &[-6.0, -2.0, -0.5, 0.3, 1.0, 3.0, 5.0] {
                assert_relative_eq!(obj.weight(u) * u, obj.psi(u), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn psi_is_numerical_derivative_of_loss() {
        let h = 1e-6;
        for obj in ALL {
            for &u in &[-3.0, -1.0, 0.4, 1.2, 2.5] {
                let numeric = (obj.loss(u + h) - obj.loss(u - h)) / (2.0 * h);
                assert_relative_eq!(numeric, obj.psi(u), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn biweight_rejects_beyond_cutoff() {
        let obj = ObjectiveKind::biweight();
        assert_eq!(obj.weight(4.7), 0.0);
        assert_eq!(obj.psi(-10.0), 0.0);
        assert_relative_eq!(obj.loss(100.0), 4.685 * 4.685 / 6.0);
        // continuous at the cutoff
        assert_relative_eq!(obj.loss(4.685), obj.loss(4.686), epsilon = 1e-9);
    }

    #[test]
    fn huber_is_linear_in_the_tails() {
        let obj = ObjectiveKind::huber();
        assert_relative_eq!(obj.psi(10.0), DEFAULT_HUBER_C);
        assert_relative_eq!(obj.weight(-2.69), DEFAULT_HUBER_C / 2.69, epsilon = 1e-12);
    }

    #[test]
    fn validate_tuning_constant() {
        assert!(ObjectiveKind::Biweight { c: 0.0 }.validate().is_err());
        assert!(ObjectiveKind::Huber { c: f64::NAN }.validate().is_err());
        assert!(ObjectiveKind::LeastSquares.validate().is_ok());
    }
}
