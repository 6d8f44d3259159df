//! In-process transport whose responses are released by the test, one key at a time.
//!
//! Requests are keyed by the `voice` field (previews) or the `voice_type` field
//! (refreshes), so a test decides the order in which responses arrive.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use voice_catalog::transport::TransportError;
use voice_catalog::{CatalogTransport, Error, RawResponse, Result};

#[derive(Default)]
pub struct GatedTransport {
    receivers: Mutex<HashMap<String, oneshot::Receiver<RawResponse>>>,
    senders: Mutex<HashMap<String, oneshot::Sender<RawResponse>>>,
    calls: AtomicUsize,
}

impl GatedTransport {
    pub fn new(keys: &[&str]) -> Arc<Self> {
        let transport = Self::default();
        for key in keys {
            let (tx, rx) = oneshot::channel();
            transport.senders.lock().unwrap().insert(key.to_string(), tx);
            transport.receivers.lock().unwrap().insert(key.to_string(), rx);
        }
        Arc::new(transport)
    }

    pub fn release(&self, key: &str, response: RawResponse) {
        let tx = self
            .senders
            .lock()
            .unwrap()
            .remove(key)
            .unwrap_or_else(|| panic!("no gate for {key}"));
        tx.send(response).expect("request is still waiting");
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Yield until `n` requests have reached the transport.
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls() < n {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("requests reached the transport");
    }
}

#[async_trait]
impl CatalogTransport for GatedTransport {
    async fn post_json(&self, _path: &str, body: &serde_json::Value) -> Result<RawResponse> {
        let key = body
            .get("voice")
            .or_else(|| body.get("voice_type"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let rx = self.receivers.lock().unwrap().remove(&key);
        self.calls.fetch_add(1, Ordering::SeqCst);
        match rx {
            Some(rx) => rx
                .await
                .map_err(|_| Error::Transport(TransportError::Other("gate closed".into()))),
            None => Err(Error::Transport(TransportError::Other(format!(
                "no gate for {key}"
            )))),
        }
    }
}

pub fn preview_response(audio: &[u8]) -> RawResponse {
    RawResponse::json(&serde_json::json!({ "audio": STANDARD.encode(audio) }))
}

pub fn refresh_response(voices: &[&str]) -> RawResponse {
    RawResponse::json(&serde_json::json!({
        "status": "success",
        "voice_names": voices,
        "count": voices.len(),
    }))
}
