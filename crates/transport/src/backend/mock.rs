//! In-memory transport for testing.

use crate::JsonObject;
use crate::Transport;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock};

/// Canned outcome for one URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Respond with this JSON value (it must be an object to succeed).
    Json(Value),
    /// Fail with this error.
    Fail(ErrorKind),
    /// Never complete. Useful for testing cancellation.
    Pending,
}

/// In-memory transport for testing.
///
/// Responses are keyed by exact URL and stored behind a [`RwLock`], so they
/// can be swapped between calls on `&self`. Every requested URL is recorded,
/// in order. Unknown URLs fail with [`ErrorKind::Status(404)`](ErrorKind::Status).
///
/// # Examples
///
/// ```
/// use guya_transport::backend::{MockResponse, MockTransport};
/// use guya_transport::Transport;
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = MockTransport::with_responses([
///     ("https://example.test/a", MockResponse::Json(json!({ "a": 1 }))),
/// ]);
/// let data = transport.fetch_json("https://example.test/a").await?;
/// assert_eq!(data["a"], 1);
/// assert_eq!(transport.requests().await, ["https://example.test/a"]);
/// # Ok(())
/// # }
/// ```
pub struct MockTransport {
    name: String,
    responses: RwLock<HashMap<String, MockResponse>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn with_responses(responses: impl IntoIterator<Item = (impl Into<String>, MockResponse)>) -> Self {
        Self {
            name: "mock".to_string(),
            responses: RwLock::new(responses.into_iter().map(|(url, response)| (url.into(), response)).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replace (or add) the canned response for `url`.
    pub async fn respond(&self, url: impl Into<String>, response: MockResponse) {
        self.responses.write().await.insert(url.into(), response);
    }

    /// Every URL requested so far, in request order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}
impl Default for MockTransport {
    fn default() -> Self {
        let responses: [(&str, MockResponse); 0] = [];
        Self::with_responses(responses)
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_json(&self, url: &str) -> Result<JsonObject> {
        self.requests.lock().await.push(url.to_string());
        // Clone under the read lock, then drop it before (maybe) never returning.
        let response = self.responses.read().await.get(url).cloned();
        match response {
            Some(MockResponse::Json(Value::Object(object))) => Ok(object),
            Some(MockResponse::Json(_)) => exn::bail!(ErrorKind::BodyMalformed),
            Some(MockResponse::Fail(kind)) => exn::bail!(kind),
            Some(MockResponse::Pending) => std::future::pending().await,
            None => exn::bail!(ErrorKind::Status(404)),
        }
    }
}
