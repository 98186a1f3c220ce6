//! Segment mapping for mapped arrays
//!
//! One logical array is backed by an ordered table of fixed-capacity
//! memory-mapped segments. Each segment maps its own byte range of the same
//! file, so the file itself stays one contiguous raw array.

use std::fs::File;
use std::ptr::NonNull;

use hypermap_core::{validate_alignment, CoreError, Element, SegmentPlan};
use memmap2::{MmapMut, MmapOptions};
use tracing::{debug, trace, warn};

use crate::config::ArrayConfig;
use crate::error::Result;

/// One read/write mapping covering a contiguous run of elements
///
/// Element access goes through a raw pointer captured at construction so
/// that shared-reference writers never materialise a `&mut` to the mapping.
pub(crate) struct Segment<T: Element> {
    map: MmapMut, // Keep the mapping alive
    ptr: NonNull<T>,
    len: usize,
}

// SAFETY: The pointer targets memory owned by `map`, which moves with the
// segment. Mutation through `&self` is only possible via the `unsafe`
// shared writers, whose callers guarantee exclusive access to the range.
unsafe impl<T: Element> Send for Segment<T> {}
unsafe impl<T: Element> Sync for Segment<T> {}

impl<T: Element> Segment<T> {
    /// Map `len` elements of `file` starting at byte `offset`
    fn map(file: &File, offset: u64, len: usize) -> Result<Self> {
        let byte_len = len * T::size_bytes();

        // SAFETY: The mapping is only accessed through this segment, and the
        // file has been sized to cover `offset + byte_len` by the caller.
        // Concurrent modification of the file by other processes is outside
        // what this crate can guard against.
        let mut map = unsafe {
            MmapOptions::new()
                .offset(offset)
                .len(byte_len)
                .map_mut(file)?
        };

        validate_alignment::<T>(map.as_ptr())?;
        let elements: &mut [T] = bytemuck::try_cast_slice_mut(&mut map[..])
            .map_err(|_| CoreError::Misaligned {
                align: std::mem::align_of::<T>(),
            })?;
        debug_assert_eq!(elements.len(), len);
        let ptr = NonNull::from(elements).cast::<T>();

        Ok(Self { map, ptr, len })
    }

    /// Number of elements in this segment
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn read(&self, local: usize) -> T {
        assert!(local < self.len, "local offset {local} beyond segment of {}", self.len);
        // SAFETY: In bounds per the assertion, and the mapping is alive.
        unsafe { self.ptr.as_ptr().add(local).read() }
    }

    #[inline]
    pub(crate) fn write(&mut self, local: usize, value: T) {
        self.as_mut_slice()[local] = value;
    }

    /// Elements `[local, local + len)`
    pub(crate) fn slice(&self, local: usize, len: usize) -> &[T] {
        self.check_range(local, len);
        // SAFETY: Range validated against the mapping length.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().add(local), len) }
    }

    /// Mutable elements `[local, local + len)`
    pub(crate) fn slice_mut(&mut self, local: usize, len: usize) -> &mut [T] {
        self.check_range(local, len);
        // SAFETY: Range validated, and `&mut self` grants exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr().add(local), len) }
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        self.slice(0, self.len)
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        self.slice_mut(0, self.len)
    }

    /// Write one element through a shared reference
    ///
    /// # Safety
    ///
    /// No other thread may read or write element `local` concurrently, and no
    /// slice covering it may be alive.
    #[inline]
    pub(crate) unsafe fn write_shared(&self, local: usize, value: T) {
        assert!(local < self.len, "local offset {local} beyond segment of {}", self.len);
        self.ptr.as_ptr().add(local).write(value);
    }

    /// Copy `src` into the segment at `local` through a shared reference
    ///
    /// # Safety
    ///
    /// Same contract as [`Segment::write_shared`] for every element in
    /// `[local, local + src.len())`.
    pub(crate) unsafe fn copy_shared(&self, local: usize, src: &[T]) {
        self.check_range(local, src.len());
        std::ptr::copy_nonoverlapping(src.as_ptr(), self.ptr.as_ptr().add(local), src.len());
    }

    /// Force pending writes to the backing file
    pub(crate) fn flush(&self) -> std::io::Result<()> {
        self.map.flush()
    }

    fn check_range(&self, local: usize, len: usize) {
        let in_bounds = local.checked_add(len).is_some_and(|end| end <= self.len);
        assert!(
            in_bounds,
            "range {local}+{len} beyond segment of {}",
            self.len
        );
    }
}

/// Ordered table of every segment backing one array
///
/// A `None` slot is a segment deliberately left unmapped.
pub(crate) struct SegmentTable<T: Element> {
    plan: SegmentPlan,
    segments: Vec<Option<Segment<T>>>,
}

impl<T: Element> SegmentTable<T> {
    /// Map every segment needed to cover `len` elements of `file`
    ///
    /// Grows the file to the array's byte size first when it is short and the
    /// config allows it. If any segment fails to map, the segments mapped so
    /// far are released before the error is returned.
    pub(crate) fn map(file: &File, len: u64, config: &ArrayConfig) -> Result<Self> {
        let plan = SegmentPlan::new(config.geometry()?, len, T::size_bytes())?;

        if let Some(&index) = config
            .unmapped_segments
            .iter()
            .find(|&&index| index >= plan.count())
        {
            return Err(CoreError::SegmentOutOfRange {
                index,
                count: plan.count(),
            }
            .into());
        }

        let required = plan.total_bytes();
        let actual = file.metadata()?.len();
        if actual < required {
            if !config.grow_file {
                return Err(CoreError::FileTooShort { required, actual }.into());
            }
            debug!("Growing backing file from {} to {} bytes", actual, required);
            file.set_len(required)?;
        }

        let mut segments = Vec::with_capacity(plan.count());
        for index in 0..plan.count() {
            if config.is_unmapped(index) {
                debug!("Leaving segment {} unmapped", index);
                segments.push(None);
                continue;
            }

            let position = plan.byte_offset(index);
            let size = plan.byte_len(index);
            trace!(
                "Mapping segment {} at position {} and size {}",
                index,
                position,
                size
            );
            // Dropping `segments` on error unmaps everything mapped so far
            segments.push(Some(Segment::map(file, position, plan.segment_len(index))?));
        }

        debug!(
            "Mapped {} elements of {} in {} segments",
            len,
            T::DATA_TYPE,
            plan.count()
        );
        Ok(Self { plan, segments })
    }

    pub(crate) fn plan(&self) -> &SegmentPlan {
        &self.plan
    }

    /// Segment `index`, or `None` when it is unmapped
    ///
    /// Panics if `index` is not a segment of this array.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&Segment<T>> {
        self.segments[index].as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Segment<T>> {
        self.segments[index].as_mut()
    }

    /// Like [`SegmentTable::get_mut`], failing for an unmapped segment
    pub(crate) fn mapped_mut(&mut self, index: usize) -> Result<&mut Segment<T>> {
        self.get_mut(index)
            .ok_or_else(|| CoreError::UnmappedSegment(index).into())
    }

    pub(crate) fn mapped(&self, index: usize) -> Result<&Segment<T>> {
        self.get(index)
            .ok_or_else(|| CoreError::UnmappedSegment(index).into())
    }

    /// Fail unless every segment touched by `[start, start + len)` is mapped
    pub(crate) fn ensure_mapped(&self, start: u64, len: usize) -> Result<()> {
        for span in self.plan.geometry().spans(start, len) {
            self.mapped(span.segment)?;
        }
        Ok(())
    }

    /// Force every mapped segment to durable storage, in index order
    ///
    /// Stops at the first segment that fails; later segments are not
    /// attempted.
    pub(crate) fn flush(&self) -> Result<()> {
        for (index, slot) in self.segments.iter().enumerate() {
            let Some(segment) = slot else {
                continue;
            };
            if let Err(e) = segment.flush() {
                warn!("Failed to force segment {}: {}", index, e);
                return Err(e.into());
            }
        }
        debug!("Flushed {} segments", self.segments.len());
        Ok(())
    }
}
