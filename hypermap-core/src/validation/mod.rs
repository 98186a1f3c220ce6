//! Validation utilities for mapped arrays
//!
//! This module contains pure validation functions with no I/O dependencies.

pub mod bounds;

pub use bounds::{
    checked_byte_size, validate_alignment, validate_buffer_range, validate_range,
};
