//! Clustering algorithms.
//!
//! Includes kernel k-means clustering over precomputed similarity matrices.

use crate::error::{AgruparError, Result};
use crate::primitives::Matrix;
use crate::similarity::SimilarityMatrix;
use serde::{Deserialize, Serialize};

/// A cluster produced by kernel k-means.
///
/// Kernel k-means centroids have no coordinates — in similarity space a
/// cluster is defined entirely by its member set, so a centroid is just its
/// index plus the entity indices assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Centroid {
    members: Vec<usize>,
}

impl Centroid {
    /// Entity indices assigned to this cluster.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of member entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if no entity is assigned to this cluster.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of one kernel k-means run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    /// The k clusters, indexed 0..k, each carrying its member set.
    pub centroids: Vec<Centroid>,
    /// Cluster index per entity, index-aligned with the similarity matrix.
    pub assignment: Vec<usize>,
    /// Objective value per executed iteration. Reaching `max_iter` without
    /// convergence is recorded by the trace length, never signaled as an
    /// error.
    pub errors: Vec<f32>,
}

impl Clustering {
    /// Number of clusters k.
    #[must_use]
    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }
}

/// Kernel k-means clustering over a precomputed similarity matrix.
///
/// Partitions n entities into k clusters using only pairwise similarities,
/// via the kernel-trick formulation of the k-means distance. No feature
/// vectors exist; all distances are computed from matrix entries.
///
/// # Algorithm
///
/// 1. Seed k clusters with k-means++ entity picks (farthest-point selection
///    under the pairwise kernel distance) and start each entity in the
///    cluster of its nearest seed
/// 2. Compute the kernel distance of each entity to each cluster:
///    `d(i, r) = K(i,i) - 2/|C_r| * sum_j K(i,j) + 1/|C_r|^2 * sum_{j,l} K(j,l)`
/// 3. Reassign each entity to the nearest cluster (ties to the lowest index)
/// 4. Repeat until no assignment changes or `max_iter` is reached
///
/// Clusters that become empty mid-run are unreachable for that iteration,
/// which keeps the update free of division by zero.
///
/// # Examples
///
/// ```
/// use agrupar::cluster::KernelKMeans;
/// use agrupar::similarity::SimilarityMatrix;
///
/// let sim = SimilarityMatrix::from_vec(
///     3,
///     vec![
///         10.0, 5.0, 1.0,
///         5.0, 10.0, 1.0,
///         1.0, 1.0, 10.0,
///     ],
///     vec!["p1".to_string(), "p2".to_string(), "p3".to_string()],
/// ).expect("valid similarity matrix");
///
/// let kkm = KernelKMeans::new(&sim).with_random_state(42);
/// let clustering = kkm.calculate(2).expect("k is in range");
/// assert_eq!(clustering.assignment.len(), 3);
/// assert!(clustering.assignment.iter().all(|&c| c < 2));
/// assert!(!clustering.errors.is_empty());
/// ```
///
/// # Performance
///
/// - Time complexity: O(n²·i) per run where n=entities, i=iterations
/// - Space complexity: O(n + k)
#[derive(Debug, Clone)]
pub struct KernelKMeans<'a> {
    /// The similarity matrix being clustered (borrowed for the run).
    matrix: &'a SimilarityMatrix,
    /// Maximum iterations per `calculate` call.
    max_iter: usize,
    /// Random seed for the initial partition.
    random_state: Option<u64>,
}

impl<'a> KernelKMeans<'a> {
    /// Creates a kernel k-means engine over a validated similarity matrix.
    ///
    /// Shape, symmetry, and label-count invariants are enforced by
    /// [`SimilarityMatrix::new`], so an engine can only be built over valid
    /// input.
    #[must_use]
    pub fn new(matrix: &'a SimilarityMatrix) -> Self {
        Self {
            matrix,
            max_iter: 100,
            random_state: None,
        }
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the random seed for the initial partition.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Maximum similarity value in the matrix (diagnostic/reporting use).
    #[must_use]
    pub fn max_value(&self) -> f32 {
        self.matrix.max_value()
    }

    /// Number of entities n.
    #[must_use]
    pub fn n_entities(&self) -> usize {
        self.matrix.n_entities()
    }

    /// Partitions the entities into k clusters.
    ///
    /// Returns the k member sets, the per-entity assignment, and the
    /// objective trace (one value per executed iteration).
    ///
    /// # Errors
    ///
    /// Returns [`AgruparError::InvalidArgument`] unless `1 <= k <= n`.
    pub fn calculate(&self, k: usize) -> Result<Clustering> {
        let n = self.matrix.n_entities();
        if k < 1 || k > n {
            return Err(AgruparError::invalid_argument(
                "k",
                k,
                &format!("1 <= k <= {n}"),
            ));
        }

        let values = self.matrix.values();
        let mut assignment = self.initial_assignment(n, k);
        let mut errors = Vec::new();

        for _ in 0..self.max_iter {
            let members = member_sets(&assignment, k);

            // Intra-cluster similarity mass: sum over ordered member pairs,
            // diagonal included.
            let mut within = vec![0.0_f32; k];
            for (r, cluster) in members.iter().enumerate() {
                for &j in cluster {
                    for &l in cluster {
                        within[r] += values.get(j, l);
                    }
                }
            }

            let mut next = vec![0_usize; n];
            let mut objective = 0.0_f32;
            let mut changed = false;

            for i in 0..n {
                let self_sim = values.get(i, i);
                let mut best_cluster = 0;
                let mut best_distance = f32::INFINITY;

                for (r, cluster) in members.iter().enumerate() {
                    if cluster.is_empty() {
                        // Unreachable this iteration; no entity can move in.
                        continue;
                    }
                    let size = cluster.len() as f32;
                    let mut cross = 0.0_f32;
                    for &j in cluster {
                        cross += values.get(i, j);
                    }
                    let distance = self_sim - 2.0 * cross / size + within[r] / (size * size);
                    // Strict comparison over ascending r breaks ties toward
                    // the lowest cluster index.
                    if distance < best_distance {
                        best_distance = distance;
                        best_cluster = r;
                    }
                }

                next[i] = best_cluster;
                objective += best_distance;
                if best_cluster != assignment[i] {
                    changed = true;
                }
            }

            errors.push(objective);
            assignment = next;
            if !changed {
                break;
            }
        }

        let centroids = member_sets(&assignment, k)
            .into_iter()
            .map(|members| Centroid { members })
            .collect();

        Ok(Clustering {
            centroids,
            assignment,
            errors,
        })
    }

    /// Kernel k-means++ seeding. The first seed entity derives from the
    /// configured seed; each further seed is the entity farthest from all
    /// chosen seeds under the pairwise kernel distance, ties to the lowest
    /// index. Every entity starts in the cluster of its nearest seed, so
    /// all clusters begin non-empty and runs are reproducible.
    ///
    /// A balanced random deal is a fixed point of the kernel update on
    /// symmetric block matrices; spreading the seeds apart avoids that trap.
    fn initial_assignment(&self, n: usize, k: usize) -> Vec<usize> {
        let values = self.matrix.values();
        let seed = self.random_state.unwrap_or(42);

        let mut seeds = Vec::with_capacity(k);
        seeds.push((seed as usize) % n);

        let mut min_distances = vec![f32::INFINITY; n];
        while seeds.len() < k {
            let latest = *seeds.last().expect("at least one seed is chosen");
            for (i, min_dist) in min_distances.iter_mut().enumerate() {
                let d = point_distance(values, i, latest);
                if d < *min_dist {
                    *min_dist = d;
                }
            }
            let mut far_idx = 0;
            let mut far_dist = f32::NEG_INFINITY;
            for (i, &d) in min_distances.iter().enumerate() {
                if d > far_dist {
                    far_dist = d;
                    far_idx = i;
                }
            }
            seeds.push(far_idx);
        }

        (0..n)
            .map(|i| {
                let mut best_cluster = 0;
                let mut best_distance = f32::INFINITY;
                for (r, &c) in seeds.iter().enumerate() {
                    let d = point_distance(values, i, c);
                    if d < best_distance {
                        best_distance = d;
                        best_cluster = r;
                    }
                }
                best_cluster
            })
            .collect()
    }
}

/// Squared kernel distance between two individual entities:
/// `K(i,i) - 2 K(i,j) + K(j,j)`.
fn point_distance(values: &Matrix<f32>, i: usize, j: usize) -> f32 {
    values.get(i, i) - 2.0 * values.get(i, j) + values.get(j, j)
}

/// Groups entity indices by their assigned cluster.
fn member_sets(assignment: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (i, &r) in assignment.iter().enumerate() {
        members[r].push(i);
    }
    members
}

#[cfg(test)]
#[path = "tests_kernel_kmeans_contract.rs"]
mod tests_kernel_kmeans_contract;
