//! Bulk transfer between mapped arrays and in-memory buffers
//!
//! A transfer is split at segment boundaries into [`Span`]s and each span is
//! served by a single bulk copy. For buffers shorter than a segment that
//! means at most two copies, split exactly at the boundary.
//!
//! Every call validates its full range against both the array and the
//! buffer before touching any element.
//!
//! [`Span`]: hypermap_core::Span

use hypermap_core::{validate_buffer_range, validate_range, Element, Indexer};
use tracing::trace;

use crate::array::MappedArray;
use crate::error::Result;

impl<T: Element, I: Indexer> MappedArray<T, I> {
    /// Copy `length` elements starting at flat `src_pos` into
    /// `dst[dst_pos..dst_pos + length]`
    ///
    /// Ranges inside unmapped segments are filled with the sentinel.
    pub fn flatten(&self, src_pos: u64, dst: &mut [T], dst_pos: usize, length: usize) -> Result<()> {
        trace!(
            "Flattening with src_pos={} dst_len={} dst_pos={} length={}",
            src_pos,
            dst.len(),
            dst_pos,
            length
        );
        self.check_transfer(src_pos, dst.len(), dst_pos, length)?;

        match length {
            0 => {}
            1 => dst[dst_pos] = self.get_at(src_pos),
            _ => {
                let dst = &mut dst[dst_pos..dst_pos + length];
                for span in self.geometry().spans(src_pos, length) {
                    let out = &mut dst[span.buffer_offset..span.buffer_offset + span.len];
                    match self.segments.get(span.segment) {
                        Some(segment) => out.copy_from_slice(segment.slice(span.local, span.len)),
                        None => out.fill(T::SENTINEL),
                    }
                }
            }
        }
        Ok(())
    }

    /// Copy `src[src_pos..src_pos + length]` into the array at flat `dst_pos`
    ///
    /// Fails without writing anything if the range touches an unmapped
    /// segment.
    pub fn unflatten(&mut self, src: &[T], src_pos: usize, dst_pos: u64, length: usize) -> Result<()> {
        trace!(
            "Unflattening with src_len={} src_pos={} dst_pos={} length={}",
            src.len(),
            src_pos,
            dst_pos,
            length
        );
        self.check_transfer(dst_pos, src.len(), src_pos, length)?;
        self.segments.ensure_mapped(dst_pos, length)?;

        match length {
            0 => {}
            1 => self.set_at(dst_pos, src[src_pos])?,
            _ => {
                let src = &src[src_pos..src_pos + length];
                for span in self.geometry().spans(dst_pos, length) {
                    let input = &src[span.buffer_offset..span.buffer_offset + span.len];
                    self.segments
                        .mapped_mut(span.segment)?
                        .slice_mut(span.local, span.len)
                        .copy_from_slice(input);
                }
            }
        }
        Ok(())
    }

    /// Like [`MappedArray::flatten`], into a buffer of optional values
    ///
    /// Every written element is `Some`; unmapped regions yield `Some` of the
    /// sentinel.
    pub fn flatten_to_options(
        &self,
        src_pos: u64,
        dst: &mut [Option<T>],
        dst_pos: usize,
        length: usize,
    ) -> Result<()> {
        trace!(
            "Flattening to options with src_pos={} dst_len={} dst_pos={} length={}",
            src_pos,
            dst.len(),
            dst_pos,
            length
        );
        self.check_transfer(src_pos, dst.len(), dst_pos, length)?;

        let dst = &mut dst[dst_pos..dst_pos + length];
        for span in self.geometry().spans(src_pos, length) {
            let out = &mut dst[span.buffer_offset..span.buffer_offset + span.len];
            match self.segments.get(span.segment) {
                Some(segment) => {
                    for (slot, &value) in out.iter_mut().zip(segment.slice(span.local, span.len)) {
                        *slot = Some(value);
                    }
                }
                None => out.fill(Some(T::SENTINEL)),
            }
        }
        Ok(())
    }

    /// Like [`MappedArray::unflatten`], from a buffer of optional values
    ///
    /// `None` elements are stored as the sentinel.
    pub fn unflatten_from_options(
        &mut self,
        src: &[Option<T>],
        src_pos: usize,
        dst_pos: u64,
        length: usize,
    ) -> Result<()> {
        trace!(
            "Unflattening from options with src_len={} src_pos={} dst_pos={} length={}",
            src.len(),
            src_pos,
            dst_pos,
            length
        );
        self.check_transfer(dst_pos, src.len(), src_pos, length)?;
        self.segments.ensure_mapped(dst_pos, length)?;

        let src = &src[src_pos..src_pos + length];
        for span in self.geometry().spans(dst_pos, length) {
            let input = &src[span.buffer_offset..span.buffer_offset + span.len];
            let out = self
                .segments
                .mapped_mut(span.segment)?
                .slice_mut(span.local, span.len);
            for (slot, &value) in out.iter_mut().zip(input) {
                *slot = T::from_option(value);
            }
        }
        Ok(())
    }

    /// Like [`MappedArray::unflatten`], through a shared reference
    ///
    /// Lets several threads fill disjoint ranges of one array concurrently.
    ///
    /// # Safety
    ///
    /// No other thread may read or write any element of
    /// `[dst_pos, dst_pos + length)` while this call runs, and no slice
    /// returned by [`MappedArray::segment`] overlapping that range may be
    /// alive.
    pub unsafe fn unflatten_shared(
        &self,
        src: &[T],
        src_pos: usize,
        dst_pos: u64,
        length: usize,
    ) -> Result<()> {
        self.check_transfer(dst_pos, src.len(), src_pos, length)?;
        self.segments.ensure_mapped(dst_pos, length)?;

        let src = &src[src_pos..src_pos + length];
        for span in self.geometry().spans(dst_pos, length) {
            let input = &src[span.buffer_offset..span.buffer_offset + span.len];
            self.segments
                .mapped(span.segment)?
                .copy_shared(span.local, input);
        }
        Ok(())
    }

    /// Validate a transfer of `length` elements at flat `array_pos` and at
    /// `buffer_pos` in a buffer of `buffer_len` elements
    fn check_transfer(
        &self,
        array_pos: u64,
        buffer_len: usize,
        buffer_pos: usize,
        length: usize,
    ) -> Result<()> {
        validate_range(array_pos, length as u64, self.len())?;
        validate_buffer_range(buffer_pos, length, buffer_len)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{ArrayConfig, CoreError, Error, MappedArray, Shape};

    fn array(len: u64, config: ArrayConfig) -> MappedArray<f64> {
        let file = tempfile::tempfile().unwrap();
        MappedArray::from_file(&file, Shape::flat(len), config).unwrap()
    }

    fn counting_array(len: u64) -> MappedArray<f64> {
        let mut array = array(len, ArrayConfig::with_segment_shift(2));
        for i in 0..len {
            array.set_at(i, i as f64).unwrap();
        }
        array
    }

    #[test]
    fn test_flatten_across_segments() {
        let array = counting_array(10);
        let mut buf = [0.0; 10];
        array.flatten(0, &mut buf, 0, 10).unwrap();
        assert_eq!(buf, [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_flatten_into_buffer_offset() {
        let array = counting_array(10);
        let mut buf = [-1.0; 6];
        array.flatten(3, &mut buf, 1, 4).unwrap();
        assert_eq!(buf, [-1.0, 3.0, 4.0, 5.0, 6.0, -1.0]);
    }

    #[test]
    fn test_flatten_single_and_empty() {
        let array = counting_array(10);
        let mut buf = [-1.0; 2];
        array.flatten(7, &mut buf, 1, 1).unwrap();
        assert_eq!(buf, [-1.0, 7.0]);
        array.flatten(10, &mut buf, 2, 0).unwrap();
        assert_eq!(buf, [-1.0, 7.0]);
    }

    #[test]
    fn test_unflatten_across_boundary() {
        let mut array = counting_array(10);
        array.unflatten(&[10.0, 20.0, 30.0], 0, 3, 3).unwrap();
        let mut buf = [0.0; 10];
        array.flatten(0, &mut buf, 0, 10).unwrap();
        assert_eq!(buf, [0.0, 1.0, 2.0, 10.0, 20.0, 30.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_flatten_rejects_out_of_range() {
        let array = counting_array(10);
        let mut buf = [-1.0; 4];

        let err = array.flatten(8, &mut buf, 0, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfBounds(CoreError::RangeOutOfBounds {
                start: 8,
                len: 3,
                limit: 10
            })
        ));

        let err = array.flatten(0, &mut buf, 2, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfBounds(CoreError::RangeOutOfBounds { limit: 4, .. })
        ));
        assert_eq!(buf, [-1.0; 4]);
    }

    #[test]
    fn test_unflatten_rejects_out_of_range_without_writing() {
        let mut array = counting_array(10);

        let err = array.unflatten(&[5.0; 4], 0, 8, 4).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds(_)));
        let err = array.unflatten(&[5.0; 4], 2, 0, 3).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds(_)));

        for i in 0..10 {
            assert_eq!(array.get_at(i), i as f64);
        }
    }

    #[test]
    fn test_options_round_trip_with_none() {
        let mut array = counting_array(10);
        array
            .unflatten_from_options(&[Some(1.5), None, Some(2.5)], 0, 2, 3)
            .unwrap();
        assert_eq!(array.get_at(2), 1.5);
        assert!(array.get_at(3).is_nan());
        assert_eq!(array.get_at(4), 2.5);

        let mut out = [None; 3];
        array.flatten_to_options(2, &mut out, 0, 3).unwrap();
        assert_eq!(out[0], Some(1.5));
        assert!(out[1].unwrap().is_nan());
        assert_eq!(out[2], Some(2.5));
    }

    #[test]
    fn test_unmapped_region_reads_sentinel() {
        let config = ArrayConfig::with_segment_shift(2).with_unmapped_segments([1]);
        let mut array = array(12, config);
        array.unflatten(&[1.0, 2.0, 3.0, 4.0], 0, 0, 4).unwrap();

        let mut buf = [0.0; 6];
        array.flatten(2, &mut buf, 0, 6).unwrap();
        assert_eq!(&buf[..2], &[3.0, 4.0]);
        assert!(buf[2..].iter().all(|v| v.is_nan()));

        let mut out = [None; 4];
        array.flatten_to_options(4, &mut out, 0, 4).unwrap();
        assert!(out.iter().all(|v| v.is_some_and(f64::is_nan)));
    }

    #[test]
    fn test_unflatten_into_unmapped_writes_nothing() {
        let config = ArrayConfig::with_segment_shift(2).with_unmapped_segments([1]);
        let mut array = array(12, config);

        let err = array.unflatten(&[9.0; 4], 0, 2, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument(CoreError::UnmappedSegment(1))
        ));
        assert_eq!(array.get_at(2), 0.0);
        assert_eq!(array.get_at(3), 0.0);

        let err = array
            .unflatten_from_options(&[Some(9.0); 4], 0, 2, 4)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(array.get_at(2), 0.0);
    }

    #[test]
    fn test_unflatten_shared() {
        let array = array(10, ArrayConfig::with_segment_shift(2));
        // SAFETY: single thread, no outstanding segment slices
        unsafe {
            array.unflatten_shared(&[7.0; 5], 0, 2, 5).unwrap();
            array.write_at(9, 1.0).unwrap();
        }
        let mut buf = [0.0; 10];
        array.flatten(0, &mut buf, 0, 10).unwrap();
        assert_eq!(buf, [0.0, 0.0, 7.0, 7.0, 7.0, 7.0, 7.0, 0.0, 0.0, 1.0]);
    }
}
