//! Cluster quality metrics.
//!
//! Provides within-, between- and total sum of squares, per-cluster cohesion,
//! center separation and the silhouette coefficient for a fixed clustering.
//!
//! # Example
//!
//! ```
//! use market_analytics::clustering::{ClusterMetric, ClusterReport};
//! use market_analytics::core::{ClusterAssignment, PointSet};
//!
//! let points = PointSet::new(vec![
//!     vec![1.0, 2.0],
//!     vec![1.2, 1.8],
//!     vec![8.0, 9.0],
//!     vec![8.2, 9.1],
//! ]).unwrap();
//! let assignment = ClusterAssignment::new(vec![0, 0, 1, 1]);
//!
//! let report = ClusterReport::evaluate(&points, &assignment, None).unwrap();
//! assert!((report.wss + report.bss - report.tss).abs() < 1e-9);
//!
//! let silhouette = ClusterMetric::Silhouette.compute(&points, &assignment, None).unwrap();
//! assert!(silhouette > 0.9);
//! ```

pub mod distance;
pub mod metrics;
pub mod silhouette;

pub use distance::{euclidean_distance, squared_euclidean};
pub use metrics::{
    between_cluster_sum_of_squares, compute_centers, separation, total_sum_of_squares,
    within_cluster_sum_of_squares, wss_by_cluster, ClusterMetric, ClusterReport,
};
pub use silhouette::{silhouette_samples, silhouette_score};
