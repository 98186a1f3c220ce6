//! Element type constraints for mapped arrays
//!
//! This module defines the trait that constrains what types can be
//! stored in a memory-mapped array.

use crate::format::DataType;

/// Trait for types that can be stored as mapped array elements
///
/// Elements are plain old data: any bit pattern read from the backing file
/// is a valid value, and values are stored in native byte order with no
/// padding. Only the width and the sentinel vary between element types.
pub trait Element: bytemuck::Pod + PartialEq + core::fmt::Debug + Send + Sync + 'static {
    /// The data type descriptor for this element type
    const DATA_TYPE: DataType;

    /// The in-band value standing for "no data"
    ///
    /// NaN for floating point types. Integer types have no natural marker
    /// and use zero.
    const SENTINEL: Self;

    /// Get the size in bytes of this element type
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }

    /// Whether this value is the sentinel
    ///
    /// Compares bit patterns so that NaN sentinels are recognised.
    fn is_sentinel(&self) -> bool {
        bytemuck::bytes_of(self) == bytemuck::bytes_of(&Self::SENTINEL)
    }

    /// Unwrap an optional value, substituting the sentinel for `None`
    fn from_option(value: Option<Self>) -> Self {
        value.unwrap_or(Self::SENTINEL)
    }
}

macro_rules! impl_element {
    ($type:ty, $data_type:ident, $sentinel:expr) => {
        impl Element for $type {
            const DATA_TYPE: DataType = DataType::$data_type;
            const SENTINEL: Self = $sentinel;
        }
    };
}

impl_element!(i8, I8, 0);
impl_element!(i16, I16, 0);
impl_element!(i32, I32, 0);
impl_element!(i64, I64, 0);
impl_element!(u8, U8, 0);
impl_element!(u16, U16, 0);
impl_element!(u32, U32, 0);
impl_element!(u64, U64, 0);
impl_element!(f32, F32, f32::NAN);
impl_element!(f64, F64, f64::NAN);
