//! Segment geometry and flat offset translation
//!
//! A logical array of N elements is split into M = ceil(N / C) segments of
//! capacity C = 2^shift. Every segment but the last is full; the last holds
//! `N - (M - 1) * C` elements, which is never zero.

use super::constants::{DEFAULT_SEGMENT_SHIFT, MAX_SEGMENT_SHIFT, MIN_SEGMENT_SHIFT};
use crate::error::{CoreError, Result};
use crate::validation::checked_byte_size;

/// Power-of-two segment capacity and the shift/mask arithmetic over it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentGeometry {
    shift: u32,
}

impl Default for SegmentGeometry {
    fn default() -> Self {
        Self {
            shift: DEFAULT_SEGMENT_SHIFT,
        }
    }
}

impl SegmentGeometry {
    /// Create a geometry with `2^shift` elements per segment
    pub const fn new(shift: u32) -> Result<Self> {
        if shift < MIN_SEGMENT_SHIFT || shift > MAX_SEGMENT_SHIFT {
            return Err(CoreError::InvalidSegmentShift(shift));
        }
        Ok(Self { shift })
    }

    pub const fn shift(&self) -> u32 {
        self.shift
    }

    /// Segment capacity in elements
    pub const fn capacity(&self) -> u64 {
        1 << self.shift
    }

    pub const fn mask(&self) -> u64 {
        self.capacity() - 1
    }

    /// Segment index holding `offset`
    #[inline]
    pub const fn segment_of(&self, offset: u64) -> usize {
        (offset >> self.shift) as usize
    }

    /// Offset of `offset` within its segment
    #[inline]
    pub const fn local_of(&self, offset: u64) -> usize {
        (offset & self.mask()) as usize
    }

    /// Translate a flat offset into `(segment, local offset)`
    ///
    /// No validation: the caller guarantees `offset < len`.
    #[inline]
    pub const fn locate(&self, offset: u64) -> (usize, usize) {
        (self.segment_of(offset), self.local_of(offset))
    }

    /// Split `[start, start + len)` into per-segment pieces
    ///
    /// The first piece begins at `start`'s local offset, each following piece
    /// begins at local offset 0.
    pub const fn spans(&self, start: u64, len: usize) -> Spans {
        Spans {
            geometry: *self,
            position: start,
            buffer_offset: 0,
            remaining: len,
        }
    }
}

/// One contiguous piece of a transfer that lies within a single segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub segment: usize,
    /// First element within the segment
    pub local: usize,
    /// Offset of this piece relative to the start of the transfer
    pub buffer_offset: usize,
    pub len: usize,
}

/// Iterator over the [`Span`]s of a transfer
#[derive(Debug, Clone)]
pub struct Spans {
    geometry: SegmentGeometry,
    position: u64,
    buffer_offset: usize,
    remaining: usize,
}

impl Iterator for Spans {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        if self.remaining == 0 {
            return None;
        }

        let (segment, local) = self.geometry.locate(self.position);
        let room = (self.geometry.capacity() - local as u64) as usize;
        let len = self.remaining.min(room);
        let span = Span {
            segment,
            local,
            buffer_offset: self.buffer_offset,
            len,
        };

        self.position += len as u64;
        self.buffer_offset += len;
        self.remaining -= len;
        Some(span)
    }
}

/// Sizing of every segment needed to cover an array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentPlan {
    geometry: SegmentGeometry,
    len: u64,
    element_size: usize,
    count: usize,
}

impl SegmentPlan {
    /// Plan the segments for `len` elements of `element_size` bytes
    ///
    /// Fails if the total byte size overflows `u64`, or a full segment's byte
    /// size overflows `usize`.
    pub fn new(geometry: SegmentGeometry, len: u64, element_size: usize) -> Result<Self> {
        checked_byte_size(len, element_size)?;
        let segment_bytes = checked_byte_size(geometry.capacity(), element_size)?;
        if usize::try_from(segment_bytes).is_err() || segment_bytes > isize::MAX as u64 {
            return Err(CoreError::SizeOverflow);
        }

        let count = if len == 0 {
            0
        } else {
            ((len - 1) >> geometry.shift()) + 1
        };
        let count = usize::try_from(count).map_err(|_| CoreError::SizeOverflow)?;

        Ok(Self {
            geometry,
            len,
            element_size,
            count,
        })
    }

    pub const fn geometry(&self) -> SegmentGeometry {
        self.geometry
    }

    /// Total number of elements
    pub const fn len(&self) -> u64 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn element_size(&self) -> usize {
        self.element_size
    }

    /// Number of segments, M
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Total byte size of the array, N * W
    pub const fn total_bytes(&self) -> u64 {
        self.len * self.element_size as u64
    }

    /// Number of elements in segment `index`
    ///
    /// Full capacity for all but the last segment. The last segment holds
    /// the remainder, or a full capacity when `len` is an exact multiple.
    pub fn segment_len(&self, index: usize) -> usize {
        debug_assert!(index < self.count);
        let capacity = self.geometry.capacity();
        if index + 1 < self.count {
            return capacity as usize;
        }
        let tail = self.len - (self.count as u64 - 1) * capacity;
        debug_assert!(tail > 0 && tail <= capacity);
        tail as usize
    }

    /// Byte position of segment `index` within the backing file
    pub fn byte_offset(&self, index: usize) -> u64 {
        index as u64 * self.geometry.capacity() * self.element_size as u64
    }

    /// Byte length of segment `index`
    pub fn byte_len(&self, index: usize) -> usize {
        self.segment_len(index) * self.element_size
    }
}
