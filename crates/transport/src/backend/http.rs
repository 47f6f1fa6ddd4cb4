//! HTTP transport backed by `reqwest`.

use super::decode;
use crate::JsonObject;
use crate::Transport;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{instrument, trace};

/// Fetches JSON over HTTP(S).
///
/// The request timeout covers the whole exchange (connect, headers and body),
/// so a hung server surfaces as [`ErrorKind::Network`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    name: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .or_raise(|| ErrorKind::Network("could not construct HTTP client".to_string()))?;
        Ok(Self { name: "http".to_string(), client })
    }
}

/// Validate `address` before anything touches the network.
pub(crate) fn parse_address(address: &str) -> Result<Url> {
    let url = Url::parse(address).or_raise(|| ErrorKind::AddressMalformed(address.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        exn::bail!(ErrorKind::NotHttp(address.to_string()));
    }
    Ok(url)
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(transport = %self.name))]
    async fn fetch_json(&self, url: &str) -> Result<JsonObject> {
        let parsed = parse_address(url)?;
        let response =
            self.client.get(parsed).send().await.or_raise(|| ErrorKind::Network(url.to_string()))?;
        let status = response.status();
        trace!(%status, "response received");
        if status != StatusCode::OK {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        let body = response.bytes().await.or_raise(|| ErrorKind::BodyMalformed)?;
        decode(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[rstest]
    #[case("https://guya.moe/api/get_all_series/")]
    #[case("http://localhost:8000/api/series/Kaguya-Wants-To-Be-Confessed-To/")]
    fn test_parse_address(#[case] address: &str) {
        assert!(parse_address(address).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("guya.moe/api")]
    #[case("https://")]
    fn test_parse_address_malformed(#[case] address: &str) {
        let err = parse_address(address).unwrap_err();
        assert_eq!(*err, ErrorKind::AddressMalformed(address.to_string()));
    }

    #[rstest]
    #[case("ftp://guya.moe/api")]
    #[case("file:///etc/passwd")]
    fn test_parse_address_not_http(#[case] address: &str) {
        let err = parse_address(address).unwrap_err();
        assert_eq!(*err, ErrorKind::NotHttp(address.to_string()));
    }

    /// Serve one canned HTTP response to the first connection, or hold that
    /// connection open without answering when `response` is `None`.
    async fn serve_once(response: Option<String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0; 4096];
            _ = socket.read(&mut request).await;
            match response {
                Some(response) => {
                    _ = socket.write_all(response.as_bytes()).await;
                    _ = socket.shutdown().await;
                },
                None => tokio::time::sleep(Duration::from_secs(30)).await,
            }
        });
        format!("http://{address}/api/get_all_series/")
    }

    fn ok(body: &str) -> String {
        format!("HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}", body.len())
    }

    #[tokio::test]
    async fn test_fetch_object() {
        let url = serve_once(Some(ok(r#"{"Oshi no Ko": {"slug": "oshi-no-ko"}}"#))).await;
        let transport = HttpTransport::new(Duration::from_secs(5), "guya-test").unwrap();
        let data = transport.fetch_json(&url).await.unwrap();
        assert_eq!(data["Oshi no Ko"]["slug"], "oshi-no-ko");
    }

    #[rstest]
    #[case("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(), ErrorKind::Status(404))]
    #[case("HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(), ErrorKind::Status(503))]
    #[case(ok("[1, 2]"), ErrorKind::BodyMalformed)]
    #[case(ok("not json"), ErrorKind::Decode)]
    #[tokio::test]
    async fn test_fetch_failures(#[case] response: String, #[case] expected: ErrorKind) {
        let url = serve_once(Some(response)).await;
        let transport = HttpTransport::new(Duration::from_secs(5), "guya-test").unwrap();
        let err = transport.fetch_json(&url).await.unwrap_err();
        assert_eq!(*err, expected);
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let url = serve_once(None).await;
        let transport = HttpTransport::new(Duration::from_millis(200), "guya-test").unwrap();
        let err = transport.fetch_json(&url).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Network(url));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/get_all_groups/", listener.local_addr().unwrap());
        drop(listener);
        let transport = HttpTransport::new(Duration::from_secs(5), "guya-test").unwrap();
        let err = transport.fetch_json(&url).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_before_network() {
        let transport = HttpTransport::new(Duration::from_secs(1), "guya-test").unwrap();
        let err = transport.fetch_json("not a url").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::AddressMalformed(_)));
    }
}
