//! Point sets and cluster assignments.

use crate::error::{AnalyticsError, Result};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Cluster centers keyed by label.
pub type ClusterCenters<L> = BTreeMap<L, Vec<f64>>;

/// A non-empty set of equal-dimension observation vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    points: Vec<Vec<f64>>,
    dim: usize,
}

impl PointSet {
    /// Create a point set, checking that it is non-empty, rectangular and finite.
    pub fn new(points: Vec<Vec<f64>>) -> Result<Self> {
        let dim = points.first().ok_or(AnalyticsError::EmptyData)?.len();
        if dim == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "points must have at least one dimension".into(),
            ));
        }
        for (i, p) in points.iter().enumerate() {
            if p.len() != dim {
                return Err(AnalyticsError::DimensionMismatch {
                    expected: dim,
                    got: p.len(),
                });
            }
            if p.iter().any(|x| !x.is_finite()) {
                return Err(AnalyticsError::InvalidParameter(format!(
                    "point {} has a non-finite coordinate",
                    i
                )));
            }
        }
        Ok(Self { points, dim })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimension of every point.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, index: usize) -> Option<&[f64]> {
        self.points.get(index).map(|p| p.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.points.iter().map(|p| p.as_slice())
    }

    /// Coordinate-wise mean of all points.
    pub fn mean(&self) -> Vec<f64> {
        mean_of(self.iter(), self.dim)
    }
}

/// Mapping from point index to an opaque cluster label.
///
/// Labels only need a total order so results are deterministic; they are not
/// required to be contiguous integers.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment<L> {
    labels: Vec<L>,
}

impl<L: Ord + Clone + Debug> ClusterAssignment<L> {
    /// Dense assignment: `labels[i]` is the cluster of point `i`.
    pub fn new(labels: Vec<L>) -> Self {
        Self { labels }
    }

    /// Build from `(index, label)` pairs covering `0..n` exactly once.
    pub fn from_pairs<I>(pairs: I, n: usize) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, L)>,
    {
        let mut slots: Vec<Option<L>> = vec![None; n];
        for (index, label) in pairs {
            let slot = slots
                .get_mut(index)
                .ok_or(AnalyticsError::IndexOutOfBounds { index, size: n })?;
            if slot.is_some() {
                return Err(AnalyticsError::InvalidParameter(format!(
                    "point {} is assigned more than once",
                    index
                )));
            }
            *slot = Some(label);
        }
        let labels = slots
            .into_iter()
            .enumerate()
            .map(|(i, l)| {
                l.ok_or_else(|| {
                    AnalyticsError::InvalidParameter(format!("point {} has no cluster", i))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&L> {
        self.labels.get(index)
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Distinct labels in sorted order.
    pub fn distinct_labels(&self) -> Vec<L> {
        let mut labels = self.labels.clone();
        labels.sort();
        labels.dedup();
        labels
    }

    /// Point indices per label.
    pub fn members(&self) -> BTreeMap<L, Vec<usize>> {
        let mut members: BTreeMap<L, Vec<usize>> = BTreeMap::new();
        for (i, label) in self.labels.iter().enumerate() {
            members.entry(label.clone()).or_default().push(i);
        }
        members
    }

    /// Ensure the assignment covers exactly the points of `points`.
    pub fn validate_against(&self, points: &PointSet) -> Result<()> {
        match self.labels.len().cmp(&points.len()) {
            std::cmp::Ordering::Equal => Ok(()),
            std::cmp::Ordering::Greater => Err(AnalyticsError::IndexOutOfBounds {
                index: points.len(),
                size: points.len(),
            }),
            std::cmp::Ordering::Less => Err(AnalyticsError::DimensionMismatch {
                expected: points.len(),
                got: self.labels.len(),
            }),
        }
    }
}

/// Coordinate-wise mean of `dim`-dimensional vectors.
pub(crate) fn mean_of<'a, I>(vectors: I, dim: usize) -> Vec<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut sum = vec![0.0; dim];
    let mut count = 0usize;
    for v in vectors {
        for (s, x) in sum.iter_mut().zip(v) {
            *s += x;
        }
        count += 1;
    }
    if count > 0 {
        for s in &mut sum {
            *s /= count as f64;
        }
    }
    sum
}
