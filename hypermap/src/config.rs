//! Configuration for opening mapped arrays

use hypermap_core::{SegmentGeometry, DEFAULT_SEGMENT_SHIFT};

use crate::error::Result;

/// Configuration for segment mapping
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArrayConfig {
    /// log2 of the number of elements per segment
    pub segment_shift: u32,
    /// Segment indices to leave deliberately unmapped
    pub unmapped_segments: Vec<usize>,
    /// Extend a short backing file to the array's byte size
    pub grow_file: bool,
}

impl ArrayConfig {
    /// Create config with a segment capacity of `2^shift` elements
    pub fn with_segment_shift(shift: u32) -> Self {
        Self {
            segment_shift: shift,
            ..Self::default()
        }
    }

    /// Leave the given segments unmapped
    ///
    /// Reads from an unmapped segment yield the element sentinel, writes
    /// into it fail.
    pub fn with_unmapped_segments(mut self, segments: impl IntoIterator<Item = usize>) -> Self {
        self.unmapped_segments = segments.into_iter().collect();
        self.unmapped_segments.sort_unstable();
        self.unmapped_segments.dedup();
        self
    }

    /// Set whether a short backing file is grown or rejected
    pub fn with_grow_file(mut self, grow_file: bool) -> Self {
        self.grow_file = grow_file;
        self
    }

    /// Validated segment geometry
    pub fn geometry(&self) -> Result<SegmentGeometry> {
        Ok(SegmentGeometry::new(self.segment_shift)?)
    }

    /// Whether segment `index` is configured as unmapped
    pub fn is_unmapped(&self, index: usize) -> bool {
        self.unmapped_segments.binary_search(&index).is_ok()
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            segment_shift: DEFAULT_SEGMENT_SHIFT,
            unmapped_segments: Vec::new(),
            grow_file: true,
        }
    }
}
