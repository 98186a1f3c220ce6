//! Segment sizing constants

/// Default log2 of the segment capacity in elements (2^30 elements)
///
/// Keeps a single segment's byte length within what one mapping can address
/// for every supported element width.
pub const DEFAULT_SEGMENT_SHIFT: u32 = 30;

/// Smallest supported segment shift
pub const MIN_SEGMENT_SHIFT: u32 = 1;

/// Largest supported segment shift
pub const MAX_SEGMENT_SHIFT: u32 = 30;
