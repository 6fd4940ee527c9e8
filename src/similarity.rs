//! Similarity matrix data holder.
//!
//! Wraps the square, symmetric pairwise-similarity matrix together with the
//! index-aligned entity labels, validating both at construction. Larger
//! entries denote higher similarity (not distance).

use crate::error::{AgruparError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Absolute tolerance used for the symmetry check.
const SYMMETRY_TOL: f32 = 1e-5;

/// A validated pairwise similarity (kernel) matrix with entity labels.
///
/// Immutable after construction. Invariants enforced by [`SimilarityMatrix::new`]:
/// the matrix is square and symmetric within a floating tolerance, there is
/// one label per row, and n >= 1.
///
/// # Examples
///
/// ```
/// use agrupar::primitives::Matrix;
/// use agrupar::similarity::SimilarityMatrix;
///
/// let values = Matrix::from_vec(2, 2, vec![10.0, 3.0, 3.0, 10.0]).expect("2x2 data");
/// let sim = SimilarityMatrix::new(values, vec!["a".to_string(), "b".to_string()]).expect("valid input");
/// assert_eq!(sim.n_entities(), 2);
/// assert!((sim.max_value() - 10.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    values: Matrix<f32>,
    labels: Vec<String>,
}

impl SimilarityMatrix {
    /// Creates a validated similarity matrix.
    ///
    /// # Errors
    ///
    /// Returns [`AgruparError::InvalidInput`] when the matrix is not square,
    /// not symmetric within tolerance, empty, or when the label count does
    /// not match the matrix dimension.
    pub fn new(values: Matrix<f32>, labels: Vec<String>) -> Result<Self> {
        let (rows, cols) = values.shape();
        if rows != cols {
            return Err(AgruparError::invalid_input(
                "square matrix",
                &format!("{rows}x{cols}"),
            ));
        }
        if rows == 0 {
            return Err(AgruparError::invalid_input(
                "at least one entity",
                "0x0 matrix",
            ));
        }
        if labels.len() != rows {
            return Err(AgruparError::invalid_input(
                &format!("{rows} labels"),
                &format!("{} labels", labels.len()),
            ));
        }
        if !values.is_symmetric(SYMMETRY_TOL) {
            return Err(AgruparError::invalid_input(
                "symmetric matrix",
                "asymmetric entries beyond tolerance",
            ));
        }
        Ok(Self { values, labels })
    }

    /// Creates a similarity matrix from a flat row-major data vector.
    ///
    /// # Errors
    ///
    /// Returns [`AgruparError::InvalidInput`] on any shape or symmetry
    /// violation, including a data length that is not `n * n`.
    pub fn from_vec(n: usize, data: Vec<f32>, labels: Vec<String>) -> Result<Self> {
        let values = Matrix::from_vec(n, n, data)
            .map_err(|_| AgruparError::invalid_input(&format!("{} values", n * n), "data vector of different length"))?;
        Self::new(values, labels)
    }

    /// Number of entities n.
    #[must_use]
    pub fn n_entities(&self) -> usize {
        self.values.n_rows()
    }

    /// Entity labels, index-aligned with matrix rows and columns.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The underlying n x n similarity values.
    #[must_use]
    pub fn values(&self) -> &Matrix<f32> {
        &self.values
    }

    /// Similarity between entities i and j.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[must_use]
    pub fn similarity(&self, i: usize, j: usize) -> f32 {
        self.values.get(i, j)
    }

    /// Maximum similarity value in the matrix (diagnostic use).
    #[must_use]
    pub fn max_value(&self) -> f32 {
        self.values
            .as_slice()
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Euclidean distance between the raw matrix rows of entities i and j.
    ///
    /// This is the scoring distance used for within-cluster compactness,
    /// distinct from the kernel distance that drives cluster assignment.
    #[must_use]
    pub fn row_distance(&self, i: usize, j: usize) -> f32 {
        self.values.row_distance(i, j)
    }
}
