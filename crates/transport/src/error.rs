//! Transport Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A transport error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The address could not be parsed as a URL.
    #[display("malformed address: {_0}")]
    AddressMalformed(#[error(not(source))] String),
    /// The address is a URL, but not one that speaks HTTP.
    #[display("not an HTTP address: {_0}")]
    NotHttp(#[error(not(source))] String),
    /// The server answered with something other than `200 OK`.
    #[display("unexpected HTTP status: {_0}")]
    Status(#[error(not(source))] u16),
    /// Connection, TLS or timeout failure.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The body could not be read, or it isn't a JSON object.
    #[display("malformed response body")]
    BodyMalformed,
    /// The body is not valid JSON.
    #[display("could not decode response body as JSON")]
    Decode,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status(code) => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Network("timed out".into()), true)]
    #[case(ErrorKind::Status(503), true)]
    #[case(ErrorKind::Status(429), true)]
    #[case(ErrorKind::Status(404), false)]
    #[case(ErrorKind::AddressMalformed("::".into()), false)]
    #[case(ErrorKind::Decode, false)]
    fn test_is_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }
}
