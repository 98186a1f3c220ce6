//! Element data type descriptors
//!
//! The on-disk layout carries no header, so external readers must be told the
//! element type out of band. [`DataType`] is that descriptor.

/// Element types that can back a mapped array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DataType {
    I8 = 0,
    I16 = 1,
    I32 = 2,
    I64 = 3,
    U8 = 4,
    U16 = 5,
    U32 = 6,
    U64 = 7,
    F32 = 8,
    F64 = 9,
}

impl DataType {
    /// Get the size in bytes for this data type
    pub const fn size_bytes(&self) -> usize {
        match self {
            DataType::I8 | DataType::U8 => 1,
            DataType::I16 | DataType::U16 => 2,
            DataType::I32 | DataType::U32 | DataType::F32 => 4,
            DataType::I64 | DataType::U64 | DataType::F64 => 8,
        }
    }

    /// Whether this is a floating point type
    pub const fn is_float(&self) -> bool {
        matches!(self, DataType::F32 | DataType::F64)
    }

    /// Native byte order type string as understood by `numpy.dtype`
    ///
    /// Opening the backing file with this descriptor, the array's shape and
    /// `order='C'` yields a view over exactly the same elements.
    pub const fn numpy_descr(&self) -> &'static str {
        #[cfg(target_endian = "little")]
        let descr = match self {
            DataType::I8 => "|i1",
            DataType::I16 => "<i2",
            DataType::I32 => "<i4",
            DataType::I64 => "<i8",
            DataType::U8 => "|u1",
            DataType::U16 => "<u2",
            DataType::U32 => "<u4",
            DataType::U64 => "<u8",
            DataType::F32 => "<f4",
            DataType::F64 => "<f8",
        };
        #[cfg(target_endian = "big")]
        let descr = match self {
            DataType::I8 => "|i1",
            DataType::I16 => ">i2",
            DataType::I32 => ">i4",
            DataType::I64 => ">i8",
            DataType::U8 => "|u1",
            DataType::U16 => ">u2",
            DataType::U32 => ">u4",
            DataType::U64 => ">u8",
            DataType::F32 => ">f4",
            DataType::F64 => ">f8",
        };
        descr
    }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            DataType::I8 => "i8",
            DataType::I16 => "i16",
            DataType::I32 => "i32",
            DataType::I64 => "i64",
            DataType::U8 => "u8",
            DataType::U16 => "u16",
            DataType::U32 => "u32",
            DataType::U64 => "u64",
            DataType::F32 => "f32",
            DataType::F64 => "f64",
        };
        write!(f, "{name}")
    }
}
