//! 传输层：客户端与后端服务之间的 HTTP 交互。
//!
//! Transport layer.
//!
//! The client never talks to `reqwest` directly; it goes through the
//! [`CatalogTransport`] seam so a UI host (or a test) can inject its own
//! request path. [`HttpTransport`] is the production implementation.

mod http;

pub use http::HttpTransport;

use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Raw HTTP outcome handed back to the client.
///
/// Status and body are interpreted by the client, not the transport, so every
/// transport reports non-2xx responses the same way.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Convenience for a 200 response carrying a JSON document.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossy; used for error messages.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Request path used by [`crate::VoiceCatalogClient`].
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// POST a JSON document to `path` (relative to the transport's base URL).
    ///
    /// Returns `Err` only when no HTTP response was obtained at all.
    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<RawResponse>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Build a status error, truncating long bodies so messages stay readable.
    pub fn status(status: u16, body: &str) -> Self {
        const MAX_BODY: usize = 512;
        let body = if body.len() > MAX_BODY {
            let mut end = MAX_BODY;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &body[..end])
        } else {
            body.to_string()
        };
        TransportError::Status { status, body }
    }
}
