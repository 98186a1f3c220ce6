#![no_std]

//! hypermap core - layout and addressing definitions
//!
//! This crate provides the element trait, the segment geometry used to
//! translate flat offsets, range validation and layout flags for segmented
//! memory-mapped arrays. It performs no I/O.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod format;
#[cfg(feature = "alloc")]
pub mod shape;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
#[cfg(feature = "alloc")]
pub use shape::Shape;
pub use traits::*;
pub use validation::*;
