//! Error types for mapped array operations

use std::io;

use hypermap_core::{CoreError, ErrorCategory};
use thiserror::Error;

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Argument,
    Bounds,
    Io,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(CoreError),

    #[error("Out of bounds: {0}")]
    OutOfBounds(CoreError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::Argument,
            Error::OutOfBounds(_) => ErrorKind::Bounds,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err.category() {
            ErrorCategory::Argument => Error::InvalidArgument(err),
            ErrorCategory::Bounds => Error::OutOfBounds(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
