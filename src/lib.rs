//! # market-analytics
//!
//! Cluster quality metrics and robust seasonal regression.
//!
//! Two independent components:
//! - [`clustering`]: within-cluster sum of squares (WSS) and related metrics
//!   for a fixed clustering of observation vectors.
//! - [`models::glm`]: a generalized linear model with Fourier seasonality
//!   terms, fitted by iteratively reweighted least squares under a robust
//!   objective (Tukey biweight by default).

#![allow(clippy::needless_range_loop)]

pub mod clustering;
pub mod core;
pub mod error;
pub mod models;
pub mod transform;
pub mod utils;

pub use error::{AnalyticsError, ErrorKind, Result};

pub mod prelude {
    pub use crate::clustering::{within_cluster_sum_of_squares, ClusterMetric, ClusterReport};
    pub use crate::core::{ClusterAssignment, ClusterCenters, PointSet, TimeSeries};
    pub use crate::error::{AnalyticsError, ErrorKind, Result};
    pub use crate::models::glm::{
        fit, ConvergencePolicy, FittedModel, IrlsConfig, ObjectiveKind, SeasonalGlm,
        SeasonalitySpec,
    };
}
