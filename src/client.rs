//! HTTP transport shared by the feed clients and the image store.
//!
//! The transport performs no interpretation of status codes or payloads.
//! The only failure it classifies itself is an unreachable upstream.

use crate::outcome::FetchOutcome;
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("upstream unreachable: {0}")]
    Unreachable(String),
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

impl TransportError {
    /// Human-readable cause without the variant prefix.
    pub fn cause(&self) -> String {
        match self {
            Self::Unreachable(cause) => cause.clone(),
            Self::Build(e) => e.to_string(),
        }
    }
}

impl<T> From<TransportError> for FetchOutcome<T> {
    fn from(err: TransportError) -> Self {
        FetchOutcome::Unreachable(err.cause())
    }
}

/// Status code and raw body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A blocking-in-spirit GET: one request, one response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            timeout: None,
            user_agent: format!("skywatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// reqwest-backed [`Transport`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent)
            .gzip(true)
            .brotli(true)
            .deflate(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        tracing::debug!("Fetching: {}", redact_key(url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        tracing::debug!("Received status {} ({} bytes)", status, body.len());

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

/// Replace the value of an `api_key` query parameter so URLs can be logged.
pub fn redact_key(url: &str) -> String {
    let Some(start) = url.find("api_key=") else {
        return url.to_string();
    };
    let value_start = start + "api_key=".len();
    let value_end = url[value_start..]
        .find('&')
        .map(|i| value_start + i)
        .unwrap_or(url.len());

    format!("{}***{}", &url[..value_start], &url[value_end..])
}


#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_redact_key() {
        assert_eq!(
            redact_key("https://host/apod?api_key=SECRET"),
            "https://host/apod?api_key=***"
        );
        assert_eq!(
            redact_key("https://host/feed?api_key=SECRET&start_date=2024-01-01"),
            "https://host/feed?api_key=***&start_date=2024-01-01"
        );
        assert_eq!(redact_key("https://host/img.jpg"), "https://host/img.jpg");
    }

    #[test]
    fn test_response_helpers() {
        let response = HttpResponse::new(200, br#"{"a": 1}"#.to_vec());
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["a"], 1);
        assert_eq!(response.body_text(), r#"{"a": 1}"#);
    }

    #[tokio::test]
    async fn test_get_returns_status_and_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await.unwrap();
            let body = "quota exceeded";
            let response = format!(
                "HTTP/1.1 403 Forbidden\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let client = HttpClient::new(ClientConfig::new()).unwrap();
        let response = client
            .get(&format!("http://{}/apod?api_key=k", addr))
            .await
            .unwrap();

        assert_eq!(response.status, 403);
        assert_eq!(response.body_text(), "quota exceeded");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::new(ClientConfig::new().with_timeout(Duration::from_secs(5)))
            .unwrap();
        let result = client.get(&format!("http://{}/", addr)).await;

        assert!(matches!(result, Err(TransportError::Unreachable(_))));
    }
}
