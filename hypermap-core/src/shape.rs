//! Row-major shape descriptor
//!
//! A minimal [`Indexer`] for dense C-ordered arrays. Hypercube algebra
//! (slicing, rolling, transposition) is deliberately not provided here.

use alloc::vec::Vec;

use crate::error::{CoreError, Result};
use crate::traits::Indexer;

/// Dimension lengths of a dense row-major array
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    dims: Vec<u64>,
}

impl Shape {
    /// Create a shape from dimension lengths, outermost first
    pub fn new(dims: impl Into<Vec<u64>>) -> Self {
        Self { dims: dims.into() }
    }

    /// Shorthand for a one-dimensional shape
    pub fn flat(len: u64) -> Self {
        Self::new([len])
    }

    /// Dimension lengths, outermost first
    pub fn dims(&self) -> &[u64] {
        &self.dims
    }

    /// Length of dimension `dim`
    pub fn dim(&self, dim: usize) -> Option<u64> {
        self.dims.get(dim).copied()
    }

    /// Row-major strides in elements
    pub fn strides(&self) -> Result<Vec<u64>> {
        let mut strides = Vec::with_capacity(self.dims.len());
        let mut stride = 1u64;
        for &len in self.dims.iter().rev() {
            strides.push(stride);
            stride = stride.checked_mul(len).ok_or(CoreError::SizeOverflow)?;
        }
        strides.reverse();
        Ok(strides)
    }
}

impl From<Vec<u64>> for Shape {
    fn from(dims: Vec<u64>) -> Self {
        Self { dims }
    }
}

impl From<&[u64]> for Shape {
    fn from(dims: &[u64]) -> Self {
        Self::new(dims)
    }
}

impl<const N: usize> From<[u64; N]> for Shape {
    fn from(dims: [u64; N]) -> Self {
        Self::new(dims)
    }
}

impl Indexer for Shape {
    fn ndim(&self) -> usize {
        self.dims.len()
    }

    fn size(&self) -> Result<u64> {
        self.dims
            .iter()
            .try_fold(1u64, |acc, &len| acc.checked_mul(len))
            .ok_or(CoreError::SizeOverflow)
    }

    fn offset_of(&self, indices: &[u64]) -> Result<u64> {
        if indices.len() != self.dims.len() {
            return Err(CoreError::DimensionMismatch {
                expected: self.dims.len(),
                actual: indices.len(),
            });
        }

        let mut offset = 0u64;
        for (dim, (&index, &len)) in indices.iter().zip(&self.dims).enumerate() {
            if index >= len {
                return Err(CoreError::IndexOutOfBounds { dim, index, len });
            }
            offset = offset
                .checked_mul(len)
                .and_then(|o| o.checked_add(index))
                .ok_or(CoreError::SizeOverflow)?;
        }
        Ok(offset)
    }
}
