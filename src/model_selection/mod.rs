//! Model selection for similarity-based clustering.
//!
//! Chooses a good cluster count k with the gap statistic (Tibshirani et al.):
//! the observed within-cluster compactness at each k is compared against a
//! Monte Carlo reference built from symmetry-preserving permutations of the
//! input matrix, and the smallest k whose improvement over the next k is not
//! worth one standard error is selected.

use crate::cluster::{Clustering, KernelKMeans};
use crate::error::{AgruparError, Result};
use crate::permute::{MatrixPermuter, SymmetricPermuter};
use crate::similarity::SimilarityMatrix;
use serde::{Deserialize, Serialize};

/// Result of a gap-statistic search, one history entry per evaluated k
/// (k = 1 at index 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapResult {
    /// The selected cluster count (1-based).
    pub chosen_k: usize,
    /// gap(k) = expected null compactness minus observed compactness.
    pub gap: Vec<f32>,
    /// Adjusted standard error s(k) of the null compactness.
    pub s: Vec<f32>,
    /// Observed compactness W(k) on the real matrix.
    pub w_observed: Vec<f32>,
    /// Mean compactness over the permutation replicates.
    pub w_expected: Vec<f32>,
}

impl GapResult {
    /// Number of k values that were evaluated.
    #[must_use]
    pub fn n_evaluated(&self) -> usize {
        self.gap.len()
    }
}

/// Gap-statistic search for a good cluster count.
///
/// For each candidate k the driver clusters the real matrix, clusters B
/// permuted copies of it, and compares the observed compactness against the
/// permutation reference. The sequential one-standard-error rule stops at the
/// smallest adequate k.
///
/// # Examples
///
/// ```
/// use agrupar::model_selection::GapStatistic;
/// use agrupar::similarity::SimilarityMatrix;
///
/// // Two tight blocks of three entities each.
/// let sim = SimilarityMatrix::from_vec(
///     6,
///     vec![
///         10.0, 9.0, 9.0, 1.0, 1.0, 1.0,
///         9.0, 10.0, 9.0, 1.0, 1.0, 1.0,
///         9.0, 9.0, 10.0, 1.0, 1.0, 1.0,
///         1.0, 1.0, 1.0, 10.0, 9.0, 9.0,
///         1.0, 1.0, 1.0, 9.0, 10.0, 9.0,
///         1.0, 1.0, 1.0, 9.0, 9.0, 10.0,
///     ],
///     (1..=6).map(|i| format!("p{i}")).collect(),
/// ).expect("valid similarity matrix");
///
/// let gstat = GapStatistic::new(sim).with_random_state(42);
/// let result = gstat.calculate_good_k(false).expect("parameters are valid");
/// assert_eq!(result.chosen_k, 2);
/// ```
#[derive(Debug, Clone)]
pub struct GapStatistic {
    /// The similarity matrix, owned for the duration of the search.
    matrix: SimilarityMatrix,
    /// Largest k to investigate.
    max_k: usize,
    /// Number of permutation replicates B per k.
    n_permutations: usize,
    /// Iteration cap passed through to each kernel k-means run.
    max_iter: usize,
    /// Base seed; all nested randomness derives from it.
    random_state: Option<u64>,
}

impl GapStatistic {
    /// Creates a gap-statistic search over a validated similarity matrix.
    ///
    /// Shape and label invariants are enforced by [`SimilarityMatrix::new`].
    /// Defaults: `max_k` 10, B 4, `max_iter` 100.
    #[must_use]
    pub fn new(matrix: SimilarityMatrix) -> Self {
        Self {
            matrix,
            max_k: 10,
            n_permutations: 4,
            max_iter: 100,
            random_state: None,
        }
    }

    /// Sets the largest k to investigate.
    #[must_use]
    pub fn with_max_k(mut self, max_k: usize) -> Self {
        self.max_k = max_k;
        self
    }

    /// Sets the number of permutation replicates B per candidate k.
    #[must_use]
    pub fn with_n_permutations(mut self, b: usize) -> Self {
        self.n_permutations = b;
        self
    }

    /// Sets the iteration cap for each nested clustering run.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the base seed for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Runs the search with the default [`SymmetricPermuter`].
    ///
    /// The permuter is created fresh from the derived seed on every call, so
    /// repeated calls on the same instance return identical results.
    ///
    /// # Errors
    ///
    /// Returns [`AgruparError::InvalidArgument`] when `max_k` or the
    /// replicate count is zero.
    pub fn calculate_good_k(&self, do_all_k: bool) -> Result<GapResult> {
        let seed = self.random_state.unwrap_or(42);
        let mut permuter = SymmetricPermuter::new().with_random_state(seed.wrapping_add(1));
        self.calculate_good_k_with(&mut permuter, do_all_k)
    }

    /// Runs the search with an externally supplied permuter.
    ///
    /// For k = 1..=max_k (clamped to n, since more clusters than entities
    /// cannot be formed): cluster the real matrix, cluster B permuted copies,
    /// and record gap(k) = mean(W*) - W_observed. Once two k have been
    /// evaluated, the rule `gap(k-1) - gap(k) + s(k) > 0` accepts k-1 as the
    /// first adequate count. With `do_all_k` false the search returns there;
    /// otherwise it keeps evaluating to max_k for the full curve and returns
    /// the first hit at the end. If the rule never fires, the fallback answer
    /// is max_k itself.
    ///
    /// # Errors
    ///
    /// Returns [`AgruparError::InvalidArgument`] when `max_k` or the
    /// replicate count is zero, and propagates any failure from the nested
    /// clustering runs.
    pub fn calculate_good_k_with(
        &self,
        permuter: &mut dyn MatrixPermuter,
        do_all_k: bool,
    ) -> Result<GapResult> {
        if self.max_k < 1 {
            return Err(AgruparError::invalid_argument("max_k", self.max_k, ">= 1"));
        }
        if self.n_permutations < 1 {
            return Err(AgruparError::invalid_argument(
                "n_permutations",
                self.n_permutations,
                ">= 1",
            ));
        }

        let n = self.matrix.n_entities();
        let max_k = self.max_k.min(n);
        let seed = self.random_state.unwrap_or(42);

        let kkm = KernelKMeans::new(&self.matrix)
            .with_max_iter(self.max_iter)
            .with_random_state(seed);

        let mut result = GapResult {
            chosen_k: max_k,
            gap: Vec::with_capacity(max_k),
            s: Vec::with_capacity(max_k),
            w_observed: Vec::with_capacity(max_k),
            w_expected: Vec::with_capacity(max_k),
        };
        let mut first_adequate: Option<usize> = None;

        for i in 0..max_k {
            let k = i + 1;
            let clustering = kkm.calculate(k)?;
            let w_k_observed = within_dispersion(&self.matrix, &clustering);
            let (w_k_expected, s_k) = self.permuted_dispersion(permuter, k, seed)?;

            result.gap.push(w_k_expected - w_k_observed);
            result.s.push(s_k);
            result.w_observed.push(w_k_observed);
            result.w_expected.push(w_k_expected);

            // Sequential rule: gap(k-1) >= gap(k) - s(k) accepts k-1.
            if i > 0 && result.gap[i - 1] - result.gap[i] + result.s[i] > 0.0 {
                if first_adequate.is_none() {
                    first_adequate = Some(i);
                }
                if !do_all_k {
                    result.chosen_k = i;
                    return Ok(result);
                }
            }
        }

        result.chosen_k = first_adequate.unwrap_or(max_k);
        Ok(result)
    }

    /// Clusters B permuted replicates at k and returns the mean compactness
    /// and the adjusted standard error `s_k = s_dk * sqrt(1 + 1/B)`.
    fn permuted_dispersion(
        &self,
        permuter: &mut dyn MatrixPermuter,
        k: usize,
        seed: u64,
    ) -> Result<(f32, f32)> {
        let b = self.n_permutations;
        let mut w_k_estimate = Vec::with_capacity(b);

        for replicate in 0..b {
            let permuted = SimilarityMatrix::new(
                permuter.permute(self.matrix.values()),
                self.matrix.labels().to_vec(),
            )?;
            // Replicate seeds derive from the base seed, k, and the
            // replicate index so runs never share RNG streams.
            let replicate_seed = seed
                .wrapping_add((k as u64) << 16)
                .wrapping_add(replicate as u64 + 1);
            let clustering = KernelKMeans::new(&permuted)
                .with_max_iter(self.max_iter)
                .with_random_state(replicate_seed)
                .calculate(k)?;
            w_k_estimate.push(within_dispersion(&permuted, &clustering));
        }

        let s_dk = population_std_dev(&w_k_estimate);
        let s_k = s_dk * (1.0 + 1.0 / b as f32).sqrt();
        Ok((mean(&w_k_estimate), s_k))
    }
}

/// Compactness W(k): sum over clusters of the pairwise within-cluster
/// distance mass, each cluster normalized by its size n_r (not by its pair
/// count — the decision rule depends on this exact normalization). Distances
/// are Euclidean between raw matrix rows; a singleton cluster contributes 0.
fn within_dispersion(matrix: &SimilarityMatrix, clustering: &Clustering) -> f32 {
    let mut w_k = 0.0_f32;
    for centroid in &clustering.centroids {
        let members = centroid.members();
        if members.is_empty() {
            continue;
        }
        let mut d_r = 0.0_f32;
        for (a, &i) in members.iter().enumerate() {
            for &j in &members[a + 1..] {
                d_r += matrix.row_distance(i, j);
            }
        }
        w_k += d_r / members.len() as f32;
    }
    w_k
}

fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}

fn population_std_dev(values: &[f32]) -> f32 {
    let m = mean(values);
    let variance = values.iter().map(|&v| (v - m).powi(2)).sum::<f32>() / values.len() as f32;
    variance.sqrt()
}

#[cfg(test)]
#[path = "tests_gap_stat_contract.rs"]
mod tests_gap_stat_contract;
