//! Mock HTTP server setup for integration tests

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use tokio::sync::Mutex;
use voice_catalog::{InMemoryEventSink, VoiceCatalogClient, VoiceCatalogClientBuilder};

pub const REFRESH_PATH: &str = "/minimax_refresh_voices";
pub const PREVIEW_PATH: &str = "/qwen3_tts_preview";
/// Nothing listens on port 1, so connections are refused.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
    pub events: Arc<InMemoryEventSink>,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
            events: Arc::new(InMemoryEventSink::default()),
        }
    }

    /// Builder pointed at the mock server, recording events in `self.events`.
    pub fn builder(&self) -> VoiceCatalogClientBuilder {
        VoiceCatalogClient::builder()
            .base_url(&self.base_url)
            .event_sink(self.events.clone())
    }

    pub fn client(&self) -> VoiceCatalogClient {
        self.builder().build().expect("client builds")
    }

    /// Create a mock for a JSON response, optionally matching part of the request body
    pub async fn mock_json(
        &self,
        path: &str,
        request: Option<serde_json::Value>,
        status: usize,
        body: &str,
    ) -> Mock {
        let mut server = self.server.lock().await;
        let matcher = request.map(Matcher::PartialJson).unwrap_or(Matcher::Any);
        server
            .mock("POST", path)
            .match_body(matcher)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock that must never be hit
    pub async fn mock_never_called(&self, path: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", path)
            .with_status(200)
            .with_body("{}")
            .expect(0)
            .create_async()
            .await
    }

    /// Create a mock for a successful preview of `voice` carrying `audio`
    pub async fn mock_preview(&self, voice: &str, audio: &[u8]) -> Mock {
        let body = serde_json::json!({ "audio": STANDARD.encode(audio) }).to_string();
        self.mock_json(
            PREVIEW_PATH,
            Some(serde_json::json!({ "voice": voice })),
            200,
            &body,
        )
        .await
    }
}

/// Minimal RIFF/WAVE header followed by a marker byte.
pub fn wav_bytes(marker: u8) -> Vec<u8> {
    let mut data = b"RIFF".to_vec();
    data.extend_from_slice(&37u32.to_le_bytes());
    data.extend_from_slice(b"WAVEfmt ");
    data.push(marker);
    data
}
