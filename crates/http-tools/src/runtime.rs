//! Outbound HTTP transport and request-encoding helpers.
//!
//! The transport is a trait so callers can swap the production `reqwest` client for a recording
//! fake in tests. Everything else in this module is pure string composition.

use crate::safety::{redact_url, sanitize_reqwest_error};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum HttpToolsError {
    #[error("config error: {0}")]
    Config(String),
    #[error("http transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, HttpToolsError>;

impl From<reqwest::Error> for HttpToolsError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(sanitize_reqwest_error(&value))
    }
}

/// Failure of a single outbound HTTP exchange.
///
/// A response with an error status is **not** a transport error; it comes back as a
/// [`TransportResponse`] and the caller decides what it means.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Network-level fault: timeout, refused connection, broken body stream.
    #[error("{message}")]
    Network {
        message: String,
        code: Option<String>,
    },

    /// The request could not be built or sent for a reason unrelated to the network.
    #[error("{0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let message = sanitize_reqwest_error(&e);
        if e.is_builder() {
            return Self::Unexpected(message);
        }

        let code = if e.is_timeout() {
            "TIMEOUT"
        } else if e.is_connect() {
            "CONNECTION_FAILED"
        } else if e.is_body() || e.is_decode() {
            "BODY_READ_FAILED"
        } else {
            "REQUEST_FAILED"
        };

        Self::Network {
            message,
            code: Some(code.to_string()),
        }
    }
}

/// A fully-composed outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: Method,
    /// Final URL including the query string.
    pub url: String,
    /// Header pairs in send order. Names are unique (case-insensitively).
    pub headers: Vec<(String, String)>,
    /// Serialized request body, if any.
    pub body: Option<String>,
    pub timeout: Duration,
}

/// What came back over the wire, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    /// One entry per header name; repeated headers are joined with `", "`.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as JSON when it parses, the raw text otherwise, `null` when empty.
    #[must_use]
    pub fn body_value(&self) -> Value {
        if self.body.is_empty() {
            return Value::Null;
        }
        let text = String::from_utf8_lossy(&self.body);
        serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text.into_owned()))
    }
}

/// Capability: send one HTTP request, get a response or a transport error.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        request: OutboundRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a transport with a client identifying itself with `user_agent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: OutboundRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let url = Url::parse(&request.url)
            .map_err(|e| TransportError::Unexpected(format!("Invalid URL: {e}")))?;
        tracing::debug!(method = %request.method, url = %redact_url(&url), "sending request");

        let mut builder = self
            .client
            .request(request.method, url)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = collapse_headers(response.headers());
        let body = response.bytes().await.map_err(|e| TransportError::Network {
            message: sanitize_reqwest_error(&e),
            code: Some("BODY_READ_FAILED".to_string()),
        })?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: body.to_vec(),
        })
    }
}

fn collapse_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            (name.as_str().to_string(), joined)
        })
        .collect()
}

/// Parse an HTTP method token (case-insensitive).
///
/// # Errors
///
/// Returns an error if the token is not a valid HTTP method.
pub fn parse_http_method(method: &str) -> Result<Method> {
    let method_str = method.trim();
    method_str
        .to_uppercase()
        .parse()
        .map_err(|_| HttpToolsError::Config(format!("Invalid HTTP method '{method_str}'")))
}

/// Encode query parameters in insertion order.
///
/// `null` values are skipped entirely (they do not become empty parameters).
#[must_use]
pub fn build_query_string(params: &Map<String, Value>) -> String {
    params
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            format!(
                "{}={}",
                encode_query_component(k),
                encode_query_component(&value_to_string(v))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append an encoded query string to a URL, without touching the rest of the URL.
#[must_use]
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{query}")
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
#[must_use]
pub fn encode_query_component(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}

/// Convert a JSON value to a string for URL/header parameters.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}
