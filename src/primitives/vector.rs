//! Vector type for 1D numeric data.

use serde::{Deserialize, Serialize};
use std::ops::{Index, Sub};

/// A 1D vector of numeric values.
///
/// # Examples
///
/// ```
/// use agrupar::primitives::Vector;
///
/// let v = Vector::from_slice(&[3.0_f32, 4.0]);
/// assert_eq!(v.len(), 2);
/// assert!((v.norm() - 5.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector<T> {
    data: Vec<T>,
}

impl<T: Copy> Vector<T> {
    /// Creates a vector from an owned Vec.
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Creates a vector by copying a slice.
    #[must_use]
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the vector has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl Vector<f32> {
    /// Sum of squared elements.
    #[must_use]
    pub fn norm_squared(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// Euclidean norm.
    #[must_use]
    pub fn norm(&self) -> f32 {
        self.norm_squared().sqrt()
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl Sub for &Vector<f32> {
    type Output = Vector<f32>;

    /// Element-wise difference.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    fn sub(self, other: &Vector<f32>) -> Vector<f32> {
        assert_eq!(self.len(), other.len(), "sub requires equal lengths");
        Vector {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a - b)
                .collect(),
        }
    }
}
