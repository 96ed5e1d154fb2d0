//! Core data structures: point sets for clustering and time series for fitting.

mod points;
mod time_series;

pub use points::{ClusterAssignment, ClusterCenters, PointSet};
pub(crate) use points::mean_of;
pub use time_series::{time_index, TimeSeries};
