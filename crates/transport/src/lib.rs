//! Transport collaborator: fetch a URL and hand back its decoded JSON object.
//!
//! Retries and timeouts are the transport's business; callers treat a timeout
//! like any other failure.

pub mod backend;
pub mod error;

pub use crate::backend::{HttpTransport, Transport};
pub use reqwest::Url;
use std::sync::Arc;

pub type TransportHandle = Arc<dyn Transport + Send + Sync>;
/// A decoded top-level JSON object.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;
