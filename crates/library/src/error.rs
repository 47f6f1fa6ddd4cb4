//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Transport and graph errors are raised
//! into this taxonomy so callers only ever match on one set of kinds; the
//! original error stays in the tree as a child.

use derive_more::{Display, Error};
use guya_graph::error::{Error as GraphError, ErrorKind as GraphErrorKind};
use guya_transport::error::{Error as TransportError, ErrorKind as TransportErrorKind};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Every kind is terminal for the operation that raised it; nothing here is
/// retried automatically.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The address (or the book identifier used to build it) is unusable.
    /// Raised before any network activity.
    #[display("malformed address: {_0}")]
    AddressMalformed(#[error(not(source))] String),
    /// The request never got a usable response (connection, TLS, timeout).
    #[display("transport failure")]
    TransportFailure,
    /// The server answered with something other than `200 OK`.
    #[display("unexpected HTTP status: {_0}")]
    HttpStatusFailure(#[error(not(source))] u16),
    /// The response is not what the API is supposed to send.
    #[display("malformed data: {_0}")]
    DataMalformed(#[error(not(source))] String),
    /// A release names a group that no payload has registered.
    #[display("reference to unregistered group: {_0}")]
    UnregisteredGroupReference(#[error(not(source))] String),
    /// The operation was cancelled by its owner.
    #[display("cancelled")]
    Cancelled,
    /// The client could not be constructed from its configuration.
    #[display("invalid client configuration")]
    Config,
}

impl ErrorKind {
    /// Raise a transport error into the library taxonomy, keeping the
    /// transport's `Exn` frame as a child in the error tree.
    #[track_caller]
    pub fn transport(err: TransportError) -> Error {
        let kind = match &*err {
            TransportErrorKind::AddressMalformed(address) | TransportErrorKind::NotHttp(address) => {
                Self::AddressMalformed(address.clone())
            },
            TransportErrorKind::Status(code) => Self::HttpStatusFailure(*code),
            TransportErrorKind::Network(_) => Self::TransportFailure,
            kind @ (TransportErrorKind::BodyMalformed | TransportErrorKind::Decode) => {
                Self::DataMalformed(kind.to_string())
            },
        };
        err.raise(kind)
    }

    /// Raise a graph construction error into the library taxonomy.
    #[track_caller]
    pub fn graph(err: GraphError) -> Error {
        let kind = match &*err {
            GraphErrorKind::UnregisteredGroup(identifier) => Self::UnregisteredGroupReference(identifier.clone()),
            kind => Self::DataMalformed(kind.to_string()),
        };
        err.raise(kind)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransportFailure => true,
            Self::HttpStatusFailure(code) => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TransportErrorKind::AddressMalformed("x".into()), ErrorKind::AddressMalformed("x".into()))]
    #[case(TransportErrorKind::NotHttp("ftp://x".into()), ErrorKind::AddressMalformed("ftp://x".into()))]
    #[case(TransportErrorKind::Status(418), ErrorKind::HttpStatusFailure(418))]
    #[case(TransportErrorKind::Network("timed out".into()), ErrorKind::TransportFailure)]
    #[case(TransportErrorKind::BodyMalformed, ErrorKind::DataMalformed("malformed response body".into()))]
    fn test_transport_mapping(#[case] source: TransportErrorKind, #[case] expected: ErrorKind) {
        let err = ErrorKind::transport(exn::Exn::from(source));
        assert_eq!(*err, expected);
    }

    #[rstest]
    #[case(GraphErrorKind::UnregisteredGroup("9".into()), ErrorKind::UnregisteredGroupReference("9".into()))]
    #[case(GraphErrorKind::MissingField("title"), ErrorKind::DataMalformed("missing required field: title".into()))]
    fn test_graph_mapping(#[case] source: GraphErrorKind, #[case] expected: ErrorKind) {
        let err = ErrorKind::graph(exn::Exn::from(source));
        assert_eq!(*err, expected);
    }

    #[rstest]
    #[case(ErrorKind::TransportFailure, true)]
    #[case(ErrorKind::HttpStatusFailure(502), true)]
    #[case(ErrorKind::HttpStatusFailure(404), false)]
    #[case(ErrorKind::DataMalformed(String::new()), false)]
    #[case(ErrorKind::Cancelled, false)]
    fn test_is_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }
}
