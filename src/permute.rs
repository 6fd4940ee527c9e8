//! Symmetry-preserving matrix permutation.
//!
//! The gap statistic builds its null reference from randomized copies of the
//! input matrix. The [`MatrixPermuter`] trait is the boundary for that
//! collaborator; [`SymmetricPermuter`] is the default implementation.

use crate::primitives::Matrix;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Produces randomized copies of a symmetric matrix.
///
/// Implementations must preserve shape and symmetry and place a random
/// permutation of the input's value multiset into symmetric positions.
pub trait MatrixPermuter {
    /// Returns a permuted copy of `values`.
    fn permute(&mut self, values: &Matrix<f32>) -> Matrix<f32>;
}

/// Default permuter: shuffles diagonal values among diagonal positions and
/// strict-upper-triangle values among strict-upper positions, then mirrors
/// the upper triangle. The output is symmetric, has the same shape, and the
/// same sorted value multiset as the input.
///
/// # Examples
///
/// ```
/// use agrupar::permute::{MatrixPermuter, SymmetricPermuter};
/// use agrupar::primitives::Matrix;
///
/// let m = Matrix::from_vec(3, 3, vec![
///     10.0, 5.0, 7.0,
///     5.0, 10.0, 4.0,
///     7.0, 4.0, 10.0,
/// ]).expect("3x3 data");
///
/// let mut permuter = SymmetricPermuter::new().with_random_state(7);
/// let p = permuter.permute(&m);
/// assert_eq!(p.shape(), (3, 3));
/// assert!(p.is_symmetric(1e-6));
/// ```
#[derive(Debug)]
pub struct SymmetricPermuter {
    rng: StdRng,
}

impl Default for SymmetricPermuter {
    fn default() -> Self {
        Self::new()
    }
}

impl SymmetricPermuter {
    /// Creates a permuter with the default seed (runs are deterministic
    /// unless a seed is supplied explicitly).
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::seed_from_u64(42),
        }
    }

    /// Reseeds the permuter for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl MatrixPermuter for SymmetricPermuter {
    /// Returns a shuffled symmetric copy of `values`.
    ///
    /// Successive calls advance the internal RNG, so replicates drawn from
    /// one permuter differ while the whole sequence stays reproducible.
    ///
    /// # Panics
    ///
    /// Panics if `values` is not square.
    fn permute(&mut self, values: &Matrix<f32>) -> Matrix<f32> {
        let (rows, cols) = values.shape();
        assert_eq!(rows, cols, "permute requires a square matrix");
        let n = rows;
        if n == 0 {
            return values.clone();
        }

        let mut diagonal: Vec<f32> = (0..n).map(|i| values.get(i, i)).collect();
        let mut upper: Vec<f32> = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                upper.push(values.get(i, j));
            }
        }

        diagonal.shuffle(&mut self.rng);
        upper.shuffle(&mut self.rng);

        let mut out = Matrix::zeros(n, n);
        for (i, &value) in diagonal.iter().enumerate() {
            out.set(i, i, value);
        }
        let mut next = upper.into_iter();
        for i in 0..n {
            for j in (i + 1)..n {
                let value = next.next().expect("upper pool has one value per pair");
                out.set(i, j, value);
                out.set(j, i, value);
            }
        }
        out
    }
}
