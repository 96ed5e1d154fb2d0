//! Weighted least squares via the normal equations.
//!
//! Used by the IRLS loop of the seasonal GLM fitter. The design matrix is
//! stored row-major: `x[obs][col]`.

use crate::error::{AnalyticsError, Result};

/// Relative pivot threshold below which the Cholesky factorization is
/// treated as singular.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Weighted least-squares coefficients together with the factor of `X'WX`.
#[derive(Debug, Clone)]
pub struct WeightedSolution {
    pub coefficients: Vec<f64>,
    pub factor: Cholesky,
}

/// Solve `min Σ w_i (y_i - x_i·β)²` for `β`.
///
/// # Arguments
/// * `x` - Design matrix rows (length n, each of length p)
/// * `y` - Response values (length n)
/// * `weights` - Non-negative observation weights (length n)
pub fn weighted_least_squares(
    x: &[Vec<f64>],
    y: &[f64],
    weights: &[f64],
) -> Result<WeightedSolution> {
    let (xtwx, xtwy) = weighted_normal_equations(x, y, weights)?;
    let factor = Cholesky::factor(&xtwx).ok_or(AnalyticsError::SingularSystem)?;
    Ok(WeightedSolution {
        coefficients: factor.solve(&xtwy),
        factor,
    })
}

/// Build `X'WX` and `X'Wy`.
pub fn weighted_normal_equations(
    x: &[Vec<f64>],
    y: &[f64],
    weights: &[f64],
) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
    let n = y.len();
    if n == 0 {
        return Err(AnalyticsError::EmptyData);
    }
    if x.len() != n {
        return Err(AnalyticsError::DimensionMismatch {
            expected: n,
            got: x.len(),
        });
    }
    if weights.len() != n {
        return Err(AnalyticsError::DimensionMismatch {
            expected: n,
            got: weights.len(),
        });
    }

    let p = x[0].len();
    let mut xtwx = vec![vec![0.0; p]; p];
    let mut xtwy = vec![0.0; p];

    for obs in 0..n {
        let row = &x[obs];
        if row.len() != p {
            return Err(AnalyticsError::DimensionMismatch {
                expected: p,
                got: row.len(),
            });
        }
        let w = weights[obs];
        if w == 0.0 {
            continue;
        }
        for i in 0..p {
            let wxi = w * row[i];
            xtwy[i] += wxi * y[obs];
            for j in 0..=i {
                xtwx[i][j] += wxi * row[j];
            }
        }
    }

    // Mirror the lower triangle
    for i in 0..p {
        for j in (i + 1)..p {
            xtwx[i][j] = xtwx[j][i];
        }
    }

    Ok((xtwx, xtwy))
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(u, v)| u * v).sum()
}

/// Lower-triangular factor `L` of a symmetric positive definite matrix,
/// `A = L L'`.
///
/// Row `i` of `L` is stored up to and including its diagonal entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Cholesky {
    lower: Vec<Vec<f64>>,
}

impl Cholesky {
    /// Factor `a`, or `None` when it is not numerically positive definite.
    pub fn factor(a: &[Vec<f64>]) -> Option<Self> {
        let n = a.len();
        if n == 0 || a.iter().any(|row| row.len() != n) {
            return None;
        }
        let largest_diag = (0..n).map(|i| a[i][i].abs()).fold(0.0, f64::max);
        let threshold = PIVOT_TOLERANCE * largest_diag.max(f64::MIN_POSITIVE);

        let mut lower: Vec<Vec<f64>> = Vec::with_capacity(n);
        for i in 0..n {
            let mut row: Vec<f64> = Vec::with_capacity(i + 1);
            for j in 0..i {
                let off = (a[i][j] - dot(&row, &lower[j][..j])) / lower[j][j];
                row.push(off);
            }
            let pivot = a[i][i] - dot(&row, &row);
            if pivot <= threshold {
                return None;
            }
            row.push(pivot.sqrt());
            lower.push(row);
        }
        Some(Self { lower })
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// Solve `A x = b`. `b` must have length [`Cholesky::dim`].
    pub fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = self.dim();

        // L z = b
        let mut x: Vec<f64> = Vec::with_capacity(n);
        for (i, row) in self.lower.iter().enumerate() {
            let z = (b[i] - dot(&row[..i], &x)) / row[i];
            x.push(z);
        }

        // L' x = z, overwriting z from the bottom up
        for i in (0..n).rev() {
            let tail: f64 = ((i + 1)..n).map(|k| self.lower[k][i] * x[k]).sum();
            x[i] = (x[i] - tail) / self.lower[i][i];
        }
        x
    }

    /// `A⁻¹`, one solve per unit vector.
    pub fn inverse(&self) -> Vec<Vec<f64>> {
        let n = self.dim();
        let mut inv = vec![vec![0.0; n]; n];
        for col in 0..n {
            let mut unit = vec![0.0; n];
            unit[col] = 1.0;
            for (row, v) in self.solve(&unit).into_iter().enumerate() {
                inv[row][col] = v;
            }
        }
        inv
    }
}

/// Matrix-vector product `X β` for a row-major design matrix.
pub fn mat_vec(x: &[Vec<f64>], beta: &[f64]) -> Vec<f64> {
    x.iter()
        .map(|row| row.iter().zip(beta).map(|(a, b)| a * b).sum())
        .collect()
}
