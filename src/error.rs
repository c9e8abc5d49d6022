//! Run Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A run error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for run operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An envelope could not be encoded by the sink.
    #[display("could not encode envelope for output")]
    Sink,
    /// The sink's writer failed.
    #[display("could not write output")]
    Io,
    #[display("unknown collection: {_0}")]
    UnknownCollection(#[error(not(source))] String),
    #[display("missing required argument: {_0}")]
    MissingArgument(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io)
    }
}
