//! Agrupar: kernel k-means clustering and gap-statistic model selection
//! over precomputed similarity matrices, in pure Rust.
//!
//! Entities (patients, documents, samples) are described only by a square,
//! symmetric pairwise-similarity matrix — no feature vectors exist. The
//! [`cluster::KernelKMeans`] engine partitions them using the kernel-trick
//! distance computed directly from matrix entries, and
//! [`model_selection::GapStatistic`] chooses a good cluster count by
//! comparing observed compactness against a permutation-based null
//! reference.
//!
//! # Quick Start
//!
//! ```
//! use agrupar::prelude::*;
//!
//! // Pairwise similarities for six entities forming two tight groups.
//! let sim = SimilarityMatrix::from_vec(
//!     6,
//!     vec![
//!         10.0, 9.0, 9.0, 1.0, 1.0, 1.0,
//!         9.0, 10.0, 9.0, 1.0, 1.0, 1.0,
//!         9.0, 9.0, 10.0, 1.0, 1.0, 1.0,
//!         1.0, 1.0, 1.0, 10.0, 9.0, 9.0,
//!         1.0, 1.0, 1.0, 9.0, 10.0, 9.0,
//!         1.0, 1.0, 1.0, 9.0, 9.0, 10.0,
//!     ],
//!     (1..=6).map(|i| format!("p{i}")).collect(),
//! ).unwrap();
//!
//! let gstat = GapStatistic::new(sim).with_random_state(42);
//! let result = gstat.calculate_good_k(false).unwrap();
//! assert_eq!(result.chosen_k, 2);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`similarity`]: Validated similarity-matrix data holder
//! - [`cluster`]: Kernel k-means clustering engine
//! - [`permute`]: Symmetry-preserving matrix permutation (null reference)
//! - [`model_selection`]: Gap-statistic cluster-count selection

pub mod cluster;
pub mod error;
pub mod model_selection;
pub mod permute;
pub mod prelude;
pub mod primitives;
pub mod similarity;

pub use error::{AgruparError, Result};
pub use primitives::{Matrix, Vector};
pub use similarity::SimilarityMatrix;
