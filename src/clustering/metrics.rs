//! Sum-of-squares cluster quality metrics.
//!
//! All metrics take a [`PointSet`], a [`ClusterAssignment`] and optionally the
//! cluster centers. When centers are omitted they are derived as the mean of
//! each cluster's points.

use super::distance::squared_euclidean;
use super::silhouette::silhouette_score;
use crate::core::{mean_of, ClusterAssignment, ClusterCenters, PointSet};
use crate::error::{AnalyticsError, Result};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Compute each cluster's center as the mean of its assigned points.
pub fn compute_centers<L>(
    points: &PointSet,
    assignment: &ClusterAssignment<L>,
) -> Result<ClusterCenters<L>>
where
    L: Ord + Clone + Debug,
{
    assignment.validate_against(points)?;

    Ok(assignment
        .members()
        .into_iter()
        .map(|(label, idx)| {
            let center = mean_of(idx.iter().filter_map(|&i| points.get(i)), points.dim());
            (label, center)
        })
        .collect())
}

/// Validate supplied centers, or derive them when absent.
fn resolve_centers<'a, L>(
    points: &PointSet,
    assignment: &ClusterAssignment<L>,
    centers: Option<&'a ClusterCenters<L>>,
) -> Result<Cow<'a, ClusterCenters<L>>>
where
    L: Ord + Clone + Debug,
{
    assignment.validate_against(points)?;

    let Some(centers) = centers else {
        return compute_centers(points, assignment).map(Cow::Owned);
    };

    for label in assignment.distinct_labels() {
        let center = centers
            .get(&label)
            .ok_or_else(|| AnalyticsError::UnknownLabel(format!("{:?}", label)))?;
        if center.len() != points.dim() {
            return Err(AnalyticsError::DimensionMismatch {
                expected: points.dim(),
                got: center.len(),
            });
        }
    }

    Ok(Cow::Borrowed(centers))
}

/// Within-cluster sum of squares (WSS).
///
/// Sum over all points of the squared Euclidean distance to the center of
/// the point's cluster.
///
/// # Example
/// ```
/// use market_analytics::clustering::within_cluster_sum_of_squares;
/// use market_analytics::core::{ClusterAssignment, PointSet};
///
/// let points = PointSet::new(vec![
///     vec![0.0, 0.0],
///     vec![0.0, 2.0],
///     vec![10.0, 10.0],
///     vec![10.0, 12.0],
/// ]).unwrap();
/// let assignment = ClusterAssignment::new(vec!['A', 'A', 'B', 'B']);
///
/// let wss = within_cluster_sum_of_squares(&points, &assignment, None).unwrap();
/// assert_eq!(wss, 4.0);
/// ```
pub fn within_cluster_sum_of_squares<L>(
    points: &PointSet,
    assignment: &ClusterAssignment<L>,
    centers: Option<&ClusterCenters<L>>,
) -> Result<f64>
where
    L: Ord + Clone + Debug,
{
    Ok(wss_by_cluster(points, assignment, centers)?.values().sum())
}

/// Within-cluster sum of squares broken down per cluster (cohesion).
pub fn wss_by_cluster<L>(
    points: &PointSet,
    assignment: &ClusterAssignment<L>,
    centers: Option<&ClusterCenters<L>>,
) -> Result<BTreeMap<L, f64>>
where
    L: Ord + Clone + Debug,
{
    let centers = resolve_centers(points, assignment, centers)?;

    let mut cohesion: BTreeMap<L, f64> = BTreeMap::new();
    for (point, label) in points.iter().zip(assignment.labels()) {
        let center = &centers[label];
        *cohesion.entry(label.clone()).or_insert(0.0) += squared_euclidean(point, center);
    }
    Ok(cohesion)
}

/// Total sum of squares (TSS) about the grand mean.
pub fn total_sum_of_squares(points: &PointSet) -> f64 {
    let grand = points.mean();
    points.iter().map(|p| squared_euclidean(p, &grand)).sum()
}

/// Between-cluster sum of squares (BSS).
///
/// Computed as `Σ n_c · ‖center_c − grand mean‖²`. When the centers are the
/// cluster means this equals `TSS − WSS`.
pub fn between_cluster_sum_of_squares<L>(
    points: &PointSet,
    assignment: &ClusterAssignment<L>,
    centers: Option<&ClusterCenters<L>>,
) -> Result<f64>
where
    L: Ord + Clone + Debug,
{
    let centers = resolve_centers(points, assignment, centers)?;
    let grand = points.mean();

    Ok(assignment
        .members()
        .iter()
        .map(|(label, idx)| idx.len() as f64 * squared_euclidean(&centers[label], &grand))
        .sum())
}

/// Smallest Euclidean distance between the centers of two distinct clusters.
pub fn separation<L>(
    points: &PointSet,
    assignment: &ClusterAssignment<L>,
    centers: Option<&ClusterCenters<L>>,
) -> Result<f64>
where
    L: Ord + Clone + Debug,
{
    let centers = resolve_centers(points, assignment, centers)?;
    let used: Vec<&Vec<f64>> = assignment
        .distinct_labels()
        .iter()
        .map(|l| &centers[l])
        .collect();

    if used.len() < 2 {
        return Err(AnalyticsError::InvalidParameter(
            "separation needs at least two clusters".into(),
        ));
    }

    let mut min_dist = f64::INFINITY;
    for i in 0..used.len() {
        for j in (i + 1)..used.len() {
            min_dist = min_dist.min(squared_euclidean(used[i], used[j]));
        }
    }
    Ok(min_dist.sqrt())
}

/// Cluster quality metrics sharing the `(points, assignment, centers)` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterMetric {
    /// Within-cluster sum of squares.
    #[default]
    Wss,
    /// Between-cluster sum of squares.
    Bss,
    /// Total sum of squares (ignores the assignment).
    Tss,
    /// Minimum distance between cluster centers.
    Separation,
    /// Mean silhouette coefficient (ignores centers).
    Silhouette,
}

impl ClusterMetric {
    /// Evaluate this metric.
    pub fn compute<L>(
        &self,
        points: &PointSet,
        assignment: &ClusterAssignment<L>,
        centers: Option<&ClusterCenters<L>>,
    ) -> Result<f64>
    where
        L: Ord + Clone + Debug,
    {
        match self {
            ClusterMetric::Wss => within_cluster_sum_of_squares(points, assignment, centers),
            ClusterMetric::Bss => between_cluster_sum_of_squares(points, assignment, centers),
            ClusterMetric::Tss => {
                assignment.validate_against(points)?;
                Ok(total_sum_of_squares(points))
            }
            ClusterMetric::Separation => separation(points, assignment, centers),
            ClusterMetric::Silhouette => silhouette_score(points, assignment),
        }
    }

    /// Whether lower values indicate better clustering.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, ClusterMetric::Wss)
    }
}

/// WSS, BSS and TSS of one clustering, with the centers they were measured against.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterReport<L> {
    /// Centers used for WSS and BSS.
    pub centers: ClusterCenters<L>,
    /// Within-cluster sum of squares.
    pub wss: f64,
    /// Between-cluster sum of squares.
    pub bss: f64,
    /// Total sum of squares.
    pub tss: f64,
    /// Per-cluster WSS.
    pub cohesion: BTreeMap<L, f64>,
}

impl<L: Ord + Clone + Debug> ClusterReport<L> {
    /// Compute all sum-of-squares metrics in one pass over the inputs.
    pub fn evaluate(
        points: &PointSet,
        assignment: &ClusterAssignment<L>,
        centers: Option<&ClusterCenters<L>>,
    ) -> Result<Self> {
        let centers = resolve_centers(points, assignment, centers)?.into_owned();
        let cohesion = wss_by_cluster(points, assignment, Some(&centers))?;
        let bss = between_cluster_sum_of_squares(points, assignment, Some(&centers))?;

        Ok(Self {
            wss: cohesion.values().sum(),
            bss,
            tss: total_sum_of_squares(points),
            cohesion,
            centers,
        })
    }

    /// Share of total variance explained by the clustering (`BSS / TSS`).
    pub fn explained_ratio(&self) -> f64 {
        if self.tss == 0.0 {
            return 1.0;
        }
        self.bss / self.tss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_clusters() -> (PointSet, ClusterAssignment<char>) {
        let points = PointSet::new(vec![
            vec![0.0, 0.0],
            vec![0.0, 2.0],
            vec![10.0, 10.0],
            vec![10.0, 12.0],
        ])
        .unwrap();
        (points, ClusterAssignment::new(vec!['A', 'A', 'B', 'B']))
    }

    // ==================== centers ====================

    #[test]
    fn centers_are_cluster_means() {
        let (points, assignment) = two_clusters();
        let centers = compute_centers(&points, &assignment).unwrap();
        assert_eq!(centers[&'A'], vec![0.0, 1.0]);
        assert_eq!(centers[&'B'], vec![10.0, 11.0]);
    }

    // ==================== wss ====================

    #[test]
    fn wss_worked_example() {
        let (points, assignment) = two_clusters();
        let wss = within_cluster_sum_of_squares(&points, &assignment, None).unwrap();
        assert_relative_eq!(wss, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn wss_with_supplied_centers() {
        let (points, assignment) = two_clusters();
        let mut centers = ClusterCenters::new();
        centers.insert('A', vec![0.0, 0.0]);
        centers.insert('B', vec![10.0, 10.0]);
        // A: 0 + 4, B: 0 + 4
        let wss = within_cluster_sum_of_squares(&points, &assignment, Some(&centers)).unwrap();
        assert_relative_eq!(wss, 8.0, epsilon = 1e-12);
    }

    #[test]
    fn wss_unknown_label_is_rejected() {
        let (points, assignment) = two_clusters();
        let mut centers = ClusterCenters::new();
        centers.insert('A', vec![0.0, 1.0]);
        let err = within_cluster_sum_of_squares(&points, &assignment, Some(&centers)).unwrap_err();
        assert!(matches!(err, AnalyticsError::UnknownLabel(_)));
    }

    #[test]
    fn wss_center_dimension_mismatch() {
        let (points, assignment) = two_clusters();
        let mut centers = ClusterCenters::new();
        centers.insert('A', vec![0.0, 1.0]);
        centers.insert('B', vec![10.0]);
        let err = within_cluster_sum_of_squares(&points, &assignment, Some(&centers)).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::DimensionMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn wss_assignment_longer_than_points() {
        let (points, _) = two_clusters();
        let assignment = ClusterAssignment::new(vec![0, 0, 1, 1, 1]);
        let err = within_cluster_sum_of_squares(&points, &assignment, None).unwrap_err();
        assert_eq!(err, AnalyticsError::IndexOutOfBounds { index: 4, size: 4 });
    }

    #[test]
    fn wss_zero_when_points_on_centers() {
        let points = PointSet::new(vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![5.0, -2.0]]).unwrap();
        let assignment = ClusterAssignment::new(vec![0, 0, 1]);
        let wss = within_cluster_sum_of_squares(&points, &assignment, None).unwrap();
        assert_eq!(wss, 0.0);
    }

    #[test]
    fn wss_by_cluster_splits_total() {
        let (points, assignment) = two_clusters();
        let cohesion = wss_by_cluster(&points, &assignment, None).unwrap();
        assert_relative_eq!(cohesion[&'A'], 2.0, epsilon = 1e-12);
        assert_relative_eq!(cohesion[&'B'], 2.0, epsilon = 1e-12);
    }

    // ==================== tss / bss ====================

    #[test]
    fn tss_bss_wss_decomposition() {
        let (points, assignment) = two_clusters();
        let report = ClusterReport::evaluate(&points, &assignment, None).unwrap();
        // grand mean (5, 6): each point contributes 25 + 25 or 25 + 16/36
        assert_relative_eq!(report.tss, 25.0 + 36.0 + 25.0 + 16.0 + 25.0 + 16.0 + 25.0 + 36.0);
        assert_relative_eq!(report.wss + report.bss, report.tss, epsilon = 1e-9);
        assert!(report.explained_ratio() > 0.9);
    }

    #[test]
    fn single_cluster_wss_equals_tss() {
        let points = PointSet::new(vec![vec![1.0, 2.0], vec![3.0, 5.0], vec![-1.0, 0.5]]).unwrap();
        let assignment = ClusterAssignment::new(vec!["only"; 3]);
        let wss = within_cluster_sum_of_squares(&points, &assignment, None).unwrap();
        assert_relative_eq!(wss, total_sum_of_squares(&points), epsilon = 1e-12);
        let bss = between_cluster_sum_of_squares(&points, &assignment, None).unwrap();
        assert_relative_eq!(bss, 0.0, epsilon = 1e-12);
    }

    // ==================== separation ====================

    #[test]
    fn separation_between_centers() {
        let (points, assignment) = two_clusters();
        let sep = separation(&points, &assignment, None).unwrap();
        assert_relative_eq!(sep, (100.0f64 + 100.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn separation_needs_two_clusters() {
        let points = PointSet::new(vec![vec![1.0], vec![2.0]]).unwrap();
        let assignment = ClusterAssignment::new(vec![0, 0]);
        assert!(separation(&points, &assignment, None).is_err());
    }

    // ==================== ClusterMetric ====================

    #[test]
    fn metric_enum_dispatches() {
        let (points, assignment) = two_clusters();
        assert_relative_eq!(
            ClusterMetric::Wss.compute(&points, &assignment, None).unwrap(),
            4.0,
            epsilon = 1e-12
        );
        let tss = ClusterMetric::Tss.compute(&points, &assignment, None).unwrap();
        let bss = ClusterMetric::Bss.compute(&points, &assignment, None).unwrap();
        assert_relative_eq!(tss - bss, 4.0, epsilon = 1e-9);
        let s = ClusterMetric::Silhouette
            .compute(&points, &assignment, None)
            .unwrap();
        assert!(s > 0.8);
        assert_eq!(ClusterMetric::default(), ClusterMetric::Wss);
        assert!(ClusterMetric::Wss.lower_is_better());
        assert!(!ClusterMetric::Silhouette.lower_is_better());
    }
}
