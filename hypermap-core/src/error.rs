//! Error types for hypermap layout and addressing operations

/// Broad classification of a [`CoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller supplied an invalid size, shape or configuration
    Argument,
    /// An offset or range fell outside the array or a buffer
    Bounds,
}

/// Errors that can occur while validating array layout and addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// Element count times element width does not fit the addressable range
    SizeOverflow,
    /// Segment shift outside the supported range
    InvalidSegmentShift(u32),
    /// Number of indices does not match the number of dimensions
    DimensionMismatch { expected: usize, actual: usize },
    /// Multi-index component outside its dimension
    IndexOutOfBounds { dim: usize, index: u64, len: u64 },
    /// Range `[start, start + len)` exceeds `limit`
    RangeOutOfBounds { start: u64, len: u64, limit: u64 },
    /// Write into a segment that was deliberately left unmapped
    UnmappedSegment(usize),
    /// Backing file is shorter than the array and growing it is disabled
    FileTooShort { required: u64, actual: u64 },
    /// Mapped region does not meet the element alignment
    Misaligned { align: usize },
    /// Segment index beyond the number of segments
    SegmentOutOfRange { index: usize, count: usize },
}

impl CoreError {
    /// Classify this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            CoreError::IndexOutOfBounds { .. } | CoreError::RangeOutOfBounds { .. } => {
                ErrorCategory::Bounds
            }
            CoreError::SizeOverflow
            | CoreError::InvalidSegmentShift(_)
            | CoreError::DimensionMismatch { .. }
            | CoreError::UnmappedSegment(_)
            | CoreError::FileTooShort { .. }
            | CoreError::Misaligned { .. }
            | CoreError::SegmentOutOfRange { .. } => ErrorCategory::Argument,
        }
    }
}

impl core::fmt::Display for CoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CoreError::SizeOverflow => write!(f, "Array byte size overflows addressable range"),
            CoreError::InvalidSegmentShift(shift) => {
                write!(f, "Invalid segment shift {shift}")
            }
            CoreError::DimensionMismatch { expected, actual } => write!(
                f,
                "Number of indices, {actual}, did not match number of dimensions, {expected}"
            ),
            CoreError::IndexOutOfBounds { dim, index, len } => write!(
                f,
                "Index {index} out of bounds for dimension {dim} of length {len}"
            ),
            CoreError::RangeOutOfBounds { start, len, limit } => write!(
                f,
                "Position {start} plus length {len} exceeds size {limit}"
            ),
            CoreError::UnmappedSegment(segment) => write!(f, "Segment {segment} is not mapped"),
            CoreError::FileTooShort { required, actual } => write!(
                f,
                "Backing file holds {actual} bytes but {required} are required"
            ),
            CoreError::Misaligned { align } => {
                write!(f, "Mapped region not aligned to {align} bytes")
            }
            CoreError::SegmentOutOfRange { index, count } => {
                write!(f, "Segment {index} out of range for {count} segments")
            }
        }
    }
}

/// Result type for hypermap core operations
pub type Result<T> = core::result::Result<T, CoreError>;
