//! Silhouette coefficient.

use super::distance::euclidean_distance;
use crate::core::{ClusterAssignment, PointSet};
use crate::error::{AnalyticsError, Result};
use std::fmt::Debug;

/// Silhouette coefficient of every point.
///
/// For point `i` with mean intra-cluster distance `a` and smallest mean
/// distance to another cluster `b`, the coefficient is `(b - a) / max(a, b)`.
/// Points in singleton clusters score 0.
pub fn silhouette_samples<L>(points: &PointSet, assignment: &ClusterAssignment<L>) -> Result<Vec<f64>>
where
    L: Ord + Clone + Debug,
{
    assignment.validate_against(points)?;

    let members = assignment.members();
    if members.len() < 2 {
        return Err(AnalyticsError::InvalidParameter(
            "silhouette needs at least two clusters".into(),
        ));
    }

    let n = points.len();
    let mut scores = Vec::with_capacity(n);

    for (i, (p, own)) in points.iter().zip(assignment.labels()).enumerate() {
        let own_members = &members[own];
        if own_members.len() == 1 {
            scores.push(0.0);
            continue;
        }

        let mean_dist = |idx: &[usize]| -> f64 {
            let (sum, count) = idx
                .iter()
                .filter(|&&j| j != i)
                .filter_map(|&j| points.get(j))
                .fold((0.0, 0usize), |(s, c), q| (s + euclidean_distance(p, q), c + 1));
            sum / count as f64
        };

        let a = mean_dist(own_members);
        let b = members
            .iter()
            .filter(|(label, _)| *label != own)
            .map(|(_, idx)| mean_dist(idx))
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        scores.push(if denom > 0.0 { (b - a) / denom } else { 0.0 });
    }

    Ok(scores)
}

/// Mean silhouette coefficient over all points, in `[-1, 1]`.
pub fn silhouette_score<L>(points: &PointSet, assignment: &ClusterAssignment<L>) -> Result<f64>
where
    L: Ord + Clone + Debug,
{
    let samples = silhouette_samples(points, assignment)?;
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}
