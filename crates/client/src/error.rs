//! Client Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A client error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for client operations, and the item type of every
/// listing stream.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// [`Transport`](ErrorKind::Transport), [`Status`](ErrorKind::Status) and
/// [`InvalidBody`](ErrorKind::InvalidBody) end a listing: whatever remained
/// of it is abandoned. [`InvalidItem`](ErrorKind::InvalidItem) concerns one
/// element only; the listing carries on with the next one.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The transport could not complete the request.
    #[display("transport error: {_0}")]
    Transport(#[error(not(source))] String),
    /// The API answered with a non-2xx status code.
    #[display("unexpected status code {_0}")]
    Status(#[error(not(source))] u16),
    /// The response body is not a page of results.
    #[display("malformed page body")]
    InvalidBody,
    /// One element of an otherwise valid page could not be decoded.
    #[display("malformed item in page")]
    InvalidItem,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status(status) => *status == 429 || (500..600).contains(status),
            Self::InvalidBody | Self::InvalidItem => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Transport("reset".to_string()), true)]
    #[case(ErrorKind::Status(429), true)]
    #[case(ErrorKind::Status(503), true)]
    #[case(ErrorKind::Status(403), false)]
    #[case(ErrorKind::Status(404), false)]
    #[case(ErrorKind::InvalidBody, false)]
    #[case(ErrorKind::InvalidItem, false)]
    fn test_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::Status(403).to_string(), "unexpected status code 403");
        assert_eq!(ErrorKind::Transport("timed out".to_string()).to_string(), "transport error: timed out");
    }
}
