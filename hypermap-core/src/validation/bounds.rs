//! Range, size and alignment validation for mapped arrays
//!
//! This module provides pure validation functions with no I/O
//! dependencies. Everything here runs before any element is touched.

use crate::error::{CoreError, Result};

/// Validate that `[start, start + len)` lies within `[0, limit)`
///
/// Overflow of `start + len` is reported as out of bounds rather than
/// wrapping around.
pub const fn validate_range(start: u64, len: u64, limit: u64) -> Result<()> {
    match start.checked_add(len) {
        Some(end) if end <= limit => Ok(()),
        _ => Err(CoreError::RangeOutOfBounds { start, len, limit }),
    }
}

/// Validate a range addressing an in-memory buffer of `capacity` elements
pub const fn validate_buffer_range(start: usize, len: usize, capacity: usize) -> Result<()> {
    validate_range(start as u64, len as u64, capacity as u64)
}

/// Calculate the byte size of `count` elements with overflow protection
pub const fn checked_byte_size(count: u64, element_size: usize) -> Result<u64> {
    match count.checked_mul(element_size as u64) {
        Some(bytes) => Ok(bytes),
        None => Err(CoreError::SizeOverflow),
    }
}

/// Validate alignment for a pointer to typed data
///
/// Checks that a raw pointer has the correct alignment for type T.
/// This is a pure check with no memory access.
pub fn validate_alignment<T>(ptr: *const u8) -> Result<()> {
    let alignment = core::mem::align_of::<T>();
    if (ptr as usize) % alignment != 0 {
        return Err(CoreError::Misaligned { align: alignment });
    }
    Ok(())
}
