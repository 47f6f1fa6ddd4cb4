//! Transport trait and implementations.

mod http;
#[cfg(feature = "mock")]
mod mock;

pub use self::http::HttpTransport;
#[cfg(feature = "mock")]
pub use self::mock::{MockResponse, MockTransport};

use crate::JsonObject;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use serde_json::Value;

/// Unified interface for fetching JSON documents.
///
/// Each call is a single request: it either completes with the decoded
/// top-level object or fails with one [`ErrorKind`]. Dropping the returned
/// future abandons the request, after which it never completes.
///
/// # Examples
///
/// ```
/// use guya_transport::{JsonObject, Transport};
/// use guya_transport::error::Result;
///
/// async fn title_of(transport: &dyn Transport, url: &str) -> Result<Option<String>> {
///     let data: JsonObject = transport.fetch_json(url).await?;
///     Ok(data.get("title").and_then(|t| t.as_str()).map(String::from))
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Name of the transport (used for logging only).
    fn name(&self) -> &str;

    /// Fetch `url` and decode its body, which must be a JSON object.
    async fn fetch_json(&self, url: &str) -> Result<JsonObject>;
}

/// Decode a response body that must hold a JSON object.
pub(crate) fn decode(body: &[u8]) -> Result<JsonObject> {
    match serde_json::from_slice::<Value>(body).or_raise(|| ErrorKind::Decode)? {
        Value::Object(object) => Ok(object),
        _ => exn::bail!(ErrorKind::BodyMalformed),
    }
}
