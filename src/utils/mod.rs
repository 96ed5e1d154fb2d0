//! Numeric utilities shared by the models.

pub mod metrics;
pub mod stats;
pub mod wls;

pub use metrics::rmse;
pub use stats::{mad, median, two_sided_p_value};
pub use wls::{weighted_least_squares, Cholesky, WeightedSolution};
