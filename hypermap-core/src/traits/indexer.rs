//! Multi-index to flat offset translation
//!
//! The mapped array itself only understands flat offsets. Anything that can
//! report an element count and turn a multi-index into a flat offset can
//! front it.

use crate::error::Result;

/// Trait for shape descriptors that translate multi-indices to flat offsets
pub trait Indexer {
    /// Number of dimensions
    fn ndim(&self) -> usize;

    /// Total number of elements described
    ///
    /// Fails with [`CoreError::SizeOverflow`](crate::CoreError::SizeOverflow)
    /// when the element count does not fit in a `u64`.
    fn size(&self) -> Result<u64>;

    /// Translate a multi-index into a flat offset in `[0, size)`
    ///
    /// Implementations validate the number of indices and every component,
    /// so a returned offset is always in bounds.
    fn offset_of(&self, indices: &[u64]) -> Result<u64>;
}

impl<I: Indexer + ?Sized> Indexer for &I {
    fn ndim(&self) -> usize {
        (**self).ndim()
    }

    fn size(&self) -> Result<u64> {
        (**self).size()
    }

    fn offset_of(&self, indices: &[u64]) -> Result<u64> {
        (**self).offset_of(indices)
    }
}
