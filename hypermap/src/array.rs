//! Memory-mapped dense arrays
//!
//! [`MappedArray`] presents a segmented mapping as one logically contiguous
//! array of `T`, addressed by flat offset or by multi-index through its
//! shape.

use std::fs::{File, OpenOptions};
use std::path::Path;

use hypermap_core::{DataType, Element, Indexer, LayoutFlags, SegmentGeometry, Shape};
use tracing::debug;

use crate::config::ArrayConfig;
use crate::error::Result;
use crate::segment::SegmentTable;

/// A dense array of `T` stored in a memory-mapped file
///
/// The file holds exactly `len() * size_of::<T>()` bytes of row-major,
/// native byte order elements with no header or padding, so any tool that
/// understands that layout can share it without conversion.
///
/// Reads take `&self` and safe writes take `&mut self`. The mappings are
/// released when the array is dropped or [closed](MappedArray::close).
pub struct MappedArray<T: Element, I: Indexer = Shape> {
    shape: I,
    len: u64,
    pub(crate) segments: SegmentTable<T>,
}

impl<T: Element, I: Indexer> MappedArray<T, I> {
    /// Open an existing file read/write and map it as an array of `shape`
    pub fn open<P: AsRef<Path>>(path: P, shape: I, config: ArrayConfig) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening mapped array: {:?}", path);
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(&file, shape, config)
    }

    /// Open `path` read/write, creating it if missing, and map it
    ///
    /// Existing contents are kept; a new or short file is zero-extended.
    pub fn create<P: AsRef<Path>>(path: P, shape: I, config: ArrayConfig) -> Result<Self> {
        let path = path.as_ref();
        debug!("Creating mapped array: {:?}", path);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        Self::from_file(&file, shape, config)
    }

    /// Map an already-open read/write file as an array of `shape`
    ///
    /// The mappings stay valid after `file` is closed.
    pub fn from_file(file: &File, shape: I, config: ArrayConfig) -> Result<Self> {
        let len = shape.size()?;
        let segments = SegmentTable::map(file, len, &config)?;
        Ok(Self {
            shape,
            len,
            segments,
        })
    }

    /// Total number of elements, N
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn shape(&self) -> &I {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Size of the array's data in bytes, N * W
    pub fn nbytes(&self) -> u64 {
        self.segments.plan().total_bytes()
    }

    pub fn dtype(&self) -> DataType {
        T::DATA_TYPE
    }

    pub fn geometry(&self) -> SegmentGeometry {
        self.segments.plan().geometry()
    }

    /// Number of segments backing the array
    pub fn segment_count(&self) -> usize {
        self.segments.plan().count()
    }

    /// Number of elements in segment `index`
    pub fn segment_len(&self, index: usize) -> Option<usize> {
        (index < self.segment_count()).then(|| self.segments.plan().segment_len(index))
    }

    /// Whether segment `index` exists and is mapped
    pub fn is_mapped(&self, index: usize) -> bool {
        index < self.segment_count() && self.segments.get(index).is_some()
    }

    /// Elements of segment `index`, or `None` if absent or unmapped
    pub fn segment(&self, index: usize) -> Option<&[T]> {
        if index >= self.segment_count() {
            return None;
        }
        self.segments.get(index).map(|segment| segment.as_slice())
    }

    /// Mutable elements of segment `index`, or `None` if absent or unmapped
    pub fn segment_mut(&mut self, index: usize) -> Option<&mut [T]> {
        if index >= self.segment_count() {
            return None;
        }
        self.segments
            .get_mut(index)
            .map(|segment| segment.as_mut_slice())
    }

    /// Layout capability flags of the backing storage
    pub fn layout_flags(&self) -> LayoutFlags {
        LayoutFlags::mapped()
    }

    /// Element at flat `offset`
    ///
    /// Returns the sentinel if the offset lies in an unmapped segment.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= len()`.
    #[inline]
    pub fn get_at(&self, offset: u64) -> T {
        self.check_offset(offset);
        let (segment, local) = self.geometry().locate(offset);
        match self.segments.get(segment) {
            Some(segment) => segment.read(local),
            None => T::SENTINEL,
        }
    }

    /// Store `value` at flat `offset`
    ///
    /// Fails if the offset lies in an unmapped segment.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= len()`.
    #[inline]
    pub fn set_at(&mut self, offset: u64, value: T) -> Result<()> {
        self.check_offset(offset);
        let (segment, local) = self.geometry().locate(offset);
        self.segments.mapped_mut(segment)?.write(local, value);
        Ok(())
    }

    /// Element at flat `offset` as an optional value
    ///
    /// Always `Some`; an unmapped region yields `Some` of the sentinel.
    pub fn get_option_at(&self, offset: u64) -> Option<T> {
        Some(self.get_at(offset))
    }

    /// Store an optional value at flat `offset`, `None` storing the sentinel
    pub fn set_option_at(&mut self, offset: u64, value: Option<T>) -> Result<()> {
        self.set_at(offset, T::from_option(value))
    }

    /// Element at a multi-index, validated through the shape
    pub fn get(&self, indices: &[u64]) -> Result<T> {
        let offset = self.shape.offset_of(indices)?;
        Ok(self.get_at(offset))
    }

    /// Store `value` at a multi-index, validated through the shape
    pub fn set(&mut self, indices: &[u64], value: T) -> Result<()> {
        let offset = self.shape.offset_of(indices)?;
        self.set_at(offset, value)
    }

    /// Store `value` at flat `offset` through a shared reference
    ///
    /// Lets several threads fill disjoint parts of one array without
    /// locking. Fails if the offset lies in an unmapped segment.
    ///
    /// # Safety
    ///
    /// No other thread may read or write `offset` while this call runs, and
    /// no slice returned by [`MappedArray::segment`] covering `offset` may be
    /// alive.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= len()`.
    pub unsafe fn write_at(&self, offset: u64, value: T) -> Result<()> {
        self.check_offset(offset);
        let (segment, local) = self.geometry().locate(offset);
        self.segments.mapped(segment)?.write_shared(local, value);
        Ok(())
    }

    /// Force all pending writes to the backing file
    ///
    /// Blocks until every mapped segment has been forced, in index order.
    /// The first failure is returned and later segments are not attempted.
    pub fn flush(&self) -> Result<()> {
        self.segments.flush()
    }

    /// Flush and release the mappings
    ///
    /// Dropping the array also releases the mappings, but without flushing.
    pub fn close(self) -> Result<()> {
        self.flush()
    }

    #[inline]
    fn check_offset(&self, offset: u64) {
        assert!(
            offset < self.len,
            "offset {offset} out of bounds for array of {} elements",
            self.len
        );
    }
}

impl<T: Element, I: Indexer + std::fmt::Debug> std::fmt::Debug for MappedArray<T, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedArray")
            .field("dtype", &T::DATA_TYPE)
            .field("shape", &self.shape)
            .field("len", &self.len)
            .field("segments", &self.segment_count())
            .finish()
    }
}
