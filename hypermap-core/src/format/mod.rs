//! Layout definitions for segmented memory-mapped arrays
//!
//! This module contains pure data structure definitions describing how a
//! logical array maps onto segments and onto the backing file. No I/O.

pub mod constants;
pub mod dtype;
pub mod geometry;
pub mod layout;

pub use constants::{DEFAULT_SEGMENT_SHIFT, MAX_SEGMENT_SHIFT, MIN_SEGMENT_SHIFT};
pub use dtype::DataType;
pub use geometry::{SegmentGeometry, SegmentPlan, Span, Spans};
pub use layout::LayoutFlags;
