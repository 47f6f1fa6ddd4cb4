//! Graph Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Every variant here means the remote
//! payload for one book is unusable; the book is never partially built.

use derive_more::{Display, Error};

/// A graph construction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for graph construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field is absent from the payload.
    #[display("missing required field: {_0}")]
    MissingField(#[error(not(source))] &'static str),
    /// A field is present but has the wrong type or an unparseable value.
    #[display("invalid value for field '{field}': {value}")]
    InvalidField {
        /// The field that failed to parse.
        field: &'static str,
        /// The offending value (or key) as found in the payload.
        value: String,
    },
    /// A release names a group that was never registered. Groups must be
    /// preloaded before releases are resolved.
    #[display("release references unregistered group: {_0}")]
    UnregisteredGroup(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Same payload, same result. The data is either valid or it isn't.
        false
    }
}
