//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use agrupar::prelude::*;
//! ```

pub use crate::cluster::{Centroid, Clustering, KernelKMeans};
pub use crate::error::{AgruparError, Result};
pub use crate::model_selection::{GapResult, GapStatistic};
pub use crate::permute::{MatrixPermuter, SymmetricPermuter};
pub use crate::primitives::{Matrix, Vector};
pub use crate::similarity::SimilarityMatrix;
