//! Robust seasonal generalized linear model.
//!
//! The design matrix holds an intercept, an optional linear trend and
//! sine/cosine pairs at harmonics of one or more seasonal periods. Coefficients
//! are estimated by iteratively reweighted least squares under a robust
//! objective, Tukey's biweight by default.
//!
//! # Example
//!
//! ```
//! use market_analytics::core::TimeSeries;
//! use market_analytics::models::glm::{fit, ObjectiveKind, SeasonalitySpec};
//!
//! let values: Vec<f64> = (0..36)
//!     .map(|t| 5.0 + (2.0 * std::f64::consts::PI * t as f64 / 12.0).cos())
//!     .collect();
//! let series = TimeSeries::from_values(values).unwrap();
//!
//! let model = fit(&series, &SeasonalitySpec::new(12.0, 1), ObjectiveKind::default()).unwrap();
//! assert!(model.converged());
//! assert!((model.intercept() - 5.0).abs() < 1e-6);
//! ```

mod irls;
mod model;
mod objective;
mod seasonality;

pub use irls::{ConvergencePolicy, IrlsConfig};
pub use model::{fit, FittedModel, SeasonalGlm};
pub use objective::{ObjectiveKind, DEFAULT_BIWEIGHT_C, DEFAULT_HUBER_C};
pub use seasonality::{design_matrix, SeasonalTerm, SeasonalitySpec};
