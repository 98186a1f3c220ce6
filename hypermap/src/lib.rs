//! hypermap - dense arrays stored in memory-mapped files
//!
//! This library treats an arbitrarily large multi-dimensional numeric array
//! as one logically contiguous object whose bytes live in a memory-mapped
//! file. The file is headerless: `N` elements in row-major, native byte
//! order with no padding, so external tools can open the same file directly.
//!
//! ## Architecture
//!
//! hypermap separates layout definitions from I/O:
//!
//! - **hypermap-core**: element types, segment geometry, validation and
//!   layout flags (no I/O)
//! - **hypermap**: segment mapping, scalar and bulk access, persistence
//!
//! An array larger than one mapping can address is split into fixed
//! power-of-two segments. Flat offsets are translated with shift/mask
//! arithmetic and bulk transfers are split exactly at segment boundaries.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hypermap::{ArrayConfig, Indexer, MappedArray, Shape};
//!
//! fn example() -> hypermap::Result<()> {
//!     let mut cube = MappedArray::<f64>::create(
//!         "cube.bin",
//!         Shape::new([64, 128, 256]),
//!         ArrayConfig::default(),
//!     )?;
//!
//!     cube.set(&[1, 2, 3], 3.5)?;
//!
//!     let mut row = vec![0.0; 256];
//!     cube.flatten(cube.shape().offset_of(&[1, 2, 0])?, &mut row, 0, 256)?;
//!
//!     cube.close()
//! }
//! ```
//!
//! The same file is readable from numpy with
//! `numpy.memmap("cube.bin", dtype="<f8", mode="r+", shape=(64, 128, 256))`.

// Re-export core abstractions and layout definitions
pub use hypermap_core::{
    // Core traits
    Element, Indexer,
    // Layout definitions
    DataType, LayoutFlags, SegmentGeometry, Shape, DEFAULT_SEGMENT_SHIFT,
    // Error handling
    CoreError, ErrorCategory,
};

// Implementation modules
pub mod array;
pub mod config;
pub mod error;
mod segment;
mod transfer;

// Public exports
pub use array::MappedArray;
pub use config::ArrayConfig;
pub use error::{Error, ErrorKind, Result};
