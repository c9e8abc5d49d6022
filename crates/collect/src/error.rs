//! Collect Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Listing errors (one bad item, one failed page) never show up here: they
//! are [`cirrus_client::error::ErrorKind`]s, logged and skipped by the stage
//! that hit them. What's left are the two ways a stage itself can go wrong.

use cirrus_models::Kind;
use derive_more::{Display, Error};

/// A collection error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for collection operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The parent stream carried an envelope this stage can't derive an id
    /// from. Always a wiring mistake between two stages; fatal to the stage.
    #[display("expected {expected} from the parent stage, found {found}")]
    Contract { expected: Kind, found: Kind },
    /// A task panicked and was stopped by its recovery boundary.
    #[display("task in stage {_0} faulted")]
    Fault(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Contract { .. } | Self::Fault(_) => false,
        }
    }
}
