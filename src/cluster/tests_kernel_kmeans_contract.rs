// Contract tests for the kernel k-means engine: assignment coverage, edge
// cluster counts, determinism, and argument validation.

use super::*;

fn block_matrix() -> SimilarityMatrix {
    SimilarityMatrix::from_vec(
        6,
        vec![
            10.0, 5.0, 7.0, 1.0, 1.0, 1.0, //
            5.0, 10.0, 4.0, 1.0, 1.0, 1.0, //
            7.0, 4.0, 10.0, 1.0, 1.0, 1.0, //
            1.0, 1.0, 1.0, 10.0, 5.0, 5.0, //
            1.0, 1.0, 1.0, 5.0, 10.0, 5.0, //
            1.0, 1.0, 1.0, 5.0, 5.0, 10.0,
        ],
        (1..=6).map(|i| format!("p{i}")).collect(),
    )
    .expect("6x6 two-block similarity matrix is valid")
}

/// Every entity is assigned exactly once, with cluster indices in [0, k).
#[test]
fn contract_assignment_covers_every_entity() {
    let sim = block_matrix();
    let kkm = KernelKMeans::new(&sim).with_random_state(42);

    for k in 1..=6 {
        let clustering = kkm.calculate(k).expect("k is in range");
        assert_eq!(
            clustering.assignment.len(),
            6,
            "k={k}: one label per entity"
        );
        for (i, &label) in clustering.assignment.iter().enumerate() {
            assert!(label < k, "k={k}: label[{i}] = {label}, expected < {k}");
        }
        assert_eq!(clustering.centroids.len(), k, "k={k}: exactly k centroids");
    }
}

/// k = 1 puts everything in one cluster and converges in a single iteration.
#[test]
fn contract_single_cluster() {
    let sim = block_matrix();
    let clustering = KernelKMeans::new(&sim)
        .with_random_state(42)
        .calculate(1)
        .expect("k=1 is in range");

    assert!(clustering.assignment.iter().all(|&c| c == 0));
    assert_eq!(clustering.centroids[0].len(), 6);
    assert_eq!(clustering.errors.len(), 1);
}

/// k = n puts every entity in its own cluster; singleton kernel distances
/// degenerate to 0 so the first pass is already stable.
#[test]
fn contract_each_entity_its_own_cluster() {
    let sim = block_matrix();
    let clustering = KernelKMeans::new(&sim)
        .with_random_state(42)
        .calculate(6)
        .expect("k=n is in range");

    let mut sorted = clustering.assignment.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..6).collect::<Vec<_>>());
    assert!(clustering.centroids.iter().all(|c| c.len() == 1));

    // Objective is the sum of own-cluster distances, all exactly 0.
    let final_error = *clustering.errors.last().expect("trace is never empty");
    assert!(final_error.abs() < 1e-5, "got {final_error}");
}

/// Three tight blocks are recovered at k = 3 with the default seed. A
/// balanced initial deal would be a stable fixed point here (every cluster
/// sees every block symmetrically); the farthest-point seeding must not
/// fall into it.
#[test]
fn contract_three_blocks_recovered() {
    let n = 9;
    let mut data = vec![1.0_f32; n * n];
    for b in 0..3 {
        for i in 0..3 {
            for j in 0..3 {
                data[(b * 3 + i) * n + b * 3 + j] = if i == j { 10.0 } else { 9.0 };
            }
        }
    }
    let sim = SimilarityMatrix::from_vec(n, data, (0..n).map(|i| format!("p{i}")).collect())
        .expect("9x9 three-block similarity matrix is valid");

    let clustering = KernelKMeans::new(&sim)
        .calculate(3)
        .expect("k=3 is in range");

    let a = &clustering.assignment;
    for b in 0..3 {
        assert_eq!(a[b * 3], a[b * 3 + 1]);
        assert_eq!(a[b * 3 + 1], a[b * 3 + 2]);
    }
    assert_ne!(a[0], a[3]);
    assert_ne!(a[3], a[6]);
    assert_ne!(a[0], a[6]);

    // Per-block kernel distance is 2/3 per member, 9 members in total.
    let final_error = *clustering.errors.last().expect("trace is never empty");
    assert!((final_error - 6.0).abs() < 1e-3, "got {final_error}");
}

/// A fixed seed makes calculate fully deterministic.
#[test]
fn contract_deterministic_given_seed() {
    let sim = block_matrix();

    let first = KernelKMeans::new(&sim)
        .with_random_state(7)
        .calculate(3)
        .expect("k=3 is in range");
    let second = KernelKMeans::new(&sim)
        .with_random_state(7)
        .calculate(3)
        .expect("k=3 is in range");

    assert_eq!(first.assignment, second.assignment);
    assert_eq!(first.errors, second.errors);
}

/// Without an explicit seed the engine still behaves deterministically.
#[test]
fn contract_deterministic_without_seed() {
    let sim = block_matrix();

    let first = KernelKMeans::new(&sim).calculate(2).expect("k=2 in range");
    let second = KernelKMeans::new(&sim).calculate(2).expect("k=2 in range");
    assert_eq!(first.assignment, second.assignment);
}

/// Different seeds must still yield valid clusterings.
#[test]
fn contract_any_seed_yields_valid_labels() {
    let sim = block_matrix();
    for seed in [0, 1, 99, 12345] {
        let clustering = KernelKMeans::new(&sim)
            .with_random_state(seed)
            .calculate(4)
            .expect("k=4 is in range");
        assert!(clustering.assignment.iter().all(|&c| c < 4));
    }
}

/// k = 0 is rejected at call time.
#[test]
fn contract_k_zero_rejected() {
    let sim = block_matrix();
    let err = KernelKMeans::new(&sim).calculate(0).unwrap_err();
    assert!(matches!(err, AgruparError::InvalidArgument { .. }));
    assert!(err.to_string().contains("k = 0"));
}

/// k > n is rejected at call time.
#[test]
fn contract_k_above_n_rejected() {
    let sim = block_matrix();
    let err = KernelKMeans::new(&sim).calculate(7).unwrap_err();
    assert!(matches!(err, AgruparError::InvalidArgument { .. }));
    assert!(err.to_string().contains("1 <= k <= 6"));
}

/// The error trace has one entry per executed iteration and never exceeds
/// max_iter.
#[test]
fn contract_error_trace_length() {
    let sim = block_matrix();
    for k in 1..=6 {
        let clustering = KernelKMeans::new(&sim)
            .with_max_iter(50)
            .with_random_state(42)
            .calculate(k)
            .expect("k is in range");
        assert!(!clustering.errors.is_empty());
        assert!(clustering.errors.len() <= 50);
    }
}
