// Contract tests for the gap-statistic search: block recovery, early-stop vs
// full-curve behavior, idempotence, and the permuter boundary.

use super::*;

fn tight_blocks(n_blocks: usize, block_size: usize) -> SimilarityMatrix {
    let n = n_blocks * block_size;
    let mut data = vec![1.0_f32; n * n];
    for b in 0..n_blocks {
        for i in 0..block_size {
            for j in 0..block_size {
                let row = b * block_size + i;
                let col = b * block_size + j;
                data[row * n + col] = if i == j { 10.0 } else { 9.0 };
            }
        }
    }
    SimilarityMatrix::from_vec(n, data, (0..n).map(|i| format!("p{i}")).collect())
        .expect("block-diagonal similarity matrix is valid")
}

/// Two tight blocks are detected as k = 2.
#[test]
fn contract_two_blocks_select_k2() {
    let gstat = GapStatistic::new(tight_blocks(2, 3)).with_random_state(42);
    let result = gstat.calculate_good_k(false).expect("parameters valid");
    assert_eq!(result.chosen_k, 2, "gap history: {:?}", result.gap);
}

/// Three tight blocks are detected as k = 3.
#[test]
fn contract_three_blocks_select_k3() {
    let gstat = GapStatistic::new(tight_blocks(3, 3)).with_random_state(42);
    let result = gstat.calculate_good_k(false).expect("parameters valid");
    assert_eq!(result.chosen_k, 3, "gap history: {:?}", result.gap);
}

/// Early stop returns the history accumulated through k = chosen_k + 1, the
/// evaluation at which the rule fired.
#[test]
fn contract_early_stop_history_length() {
    let gstat = GapStatistic::new(tight_blocks(2, 3)).with_random_state(42);
    let result = gstat.calculate_good_k(false).expect("parameters valid");
    assert_eq!(result.n_evaluated(), result.chosen_k + 1);
    assert_eq!(result.gap.len(), result.s.len());
    assert_eq!(result.gap.len(), result.w_observed.len());
    assert_eq!(result.gap.len(), result.w_expected.len());
}

/// do_all_k keeps evaluating to max_k but still returns the first adequate k.
#[test]
fn contract_do_all_k_returns_first_hit_with_full_curve() {
    let sim = tight_blocks(2, 3);
    let early = GapStatistic::new(sim.clone())
        .with_random_state(42)
        .calculate_good_k(false)
        .expect("parameters valid");
    let full = GapStatistic::new(sim)
        .with_random_state(42)
        .calculate_good_k(true)
        .expect("parameters valid");

    assert_eq!(full.chosen_k, early.chosen_k);
    // max_k defaults to 10 and is clamped to n = 6.
    assert_eq!(full.n_evaluated(), 6);
    // The shared prefix of the two runs is identical.
    assert_eq!(&full.gap[..early.n_evaluated()], &early.gap[..]);
}

/// Two searches over the same matrix with the same seed agree exactly.
#[test]
fn contract_idempotent_given_seed() {
    let gstat = GapStatistic::new(tight_blocks(2, 3)).with_random_state(7);
    let first = gstat.calculate_good_k(false).expect("parameters valid");
    let second = gstat.calculate_good_k(false).expect("parameters valid");
    assert_eq!(first, second);
}

/// Separate instances with the same seed also agree.
#[test]
fn contract_reproducible_across_instances() {
    let sim = tight_blocks(3, 3);
    let first = GapStatistic::new(sim.clone())
        .with_random_state(9)
        .calculate_good_k(true)
        .expect("parameters valid");
    let second = GapStatistic::new(sim)
        .with_random_state(9)
        .calculate_good_k(true)
        .expect("parameters valid");
    assert_eq!(first, second);
}

/// Adjusted standard errors are non-negative and finite.
#[test]
fn contract_standard_errors_well_formed() {
    let gstat = GapStatistic::new(tight_blocks(2, 3)).with_random_state(42);
    let result = gstat.calculate_good_k(true).expect("parameters valid");
    for (k, &s_k) in result.s.iter().enumerate() {
        assert!(s_k >= 0.0 && s_k.is_finite(), "s[{k}] = {s_k}");
    }
}

/// The permuter boundary is exercised exactly B times per evaluated k.
#[test]
fn contract_permuter_called_b_times_per_k() {
    struct CountingPermuter {
        inner: SymmetricPermuter,
        calls: usize,
    }

    impl MatrixPermuter for CountingPermuter {
        fn permute(&mut self, values: &crate::primitives::Matrix<f32>) -> crate::primitives::Matrix<f32> {
            self.calls += 1;
            self.inner.permute(values)
        }
    }

    let mut permuter = CountingPermuter {
        inner: SymmetricPermuter::new().with_random_state(1),
        calls: 0,
    };
    let gstat = GapStatistic::new(tight_blocks(2, 3))
        .with_n_permutations(3)
        .with_random_state(42);
    let result = gstat
        .calculate_good_k_with(&mut permuter, true)
        .expect("parameters valid");

    assert_eq!(permuter.calls, 3 * result.n_evaluated());
}
