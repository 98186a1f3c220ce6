//! Abstract interfaces for hypermap
//!
//! Traits are pure interfaces. Concrete element impls live next to the trait,
//! shape implementations live in [`crate::shape`].

pub mod element;
pub mod indexer;

pub use element::Element;
pub use indexer::Indexer;
