use crate::client::core::VoiceCatalogClient;
use crate::events::{CatalogEvent, Operation};
use crate::protocol::{PreviewRequest, PreviewResponse};
use crate::transport::TransportError;
use crate::types::PreviewAudio;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use tracing::{debug, warn};

impl VoiceCatalogClient {
    /// Fetch and cache the preview sample for `voice`.
    ///
    /// A blank `voice` is a no-op returning `Ok(None)`. On success the new
    /// audio replaces the cached one and the old one is released (reported
    /// through `PreviewReleased`). A failure leaves the cache untouched; the
    /// `PreviewFailed` event carries the delay after which a UI should hide
    /// its preview surface.
    pub async fn load_preview(&self, voice: &str) -> Result<Option<Arc<PreviewAudio>>> {
        if voice.trim().is_empty() {
            return Ok(None);
        }

        let guard = self.inflight.enter(Operation::Preview);
        let seq = guard.seq();
        debug!(seq, voice, "loading preview audio");
        self.emit(CatalogEvent::PreviewRequested {
            seq,
            voice: voice.to_string(),
        })
        .await;

        let outcome = match self.fetch_preview(voice, seq).await {
            Ok(audio) => self.install_preview(seq, audio).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            if !matches!(e, Error::Superseded { .. }) {
                warn!(seq, voice, "loading preview audio failed: {}", e);
                self.emit(CatalogEvent::PreviewFailed {
                    seq,
                    voice: voice.to_string(),
                    kind: e.kind(),
                    message: e.to_string(),
                    hide_after_ms: u64::try_from(self.preview_hide_delay.as_millis())
                        .unwrap_or(u64::MAX),
                })
                .await;
            }
        }
        drop(guard);
        outcome.map(Some)
    }

    async fn fetch_preview(&self, voice: &str, seq: u64) -> Result<PreviewAudio> {
        let body = serde_json::to_value(PreviewRequest { voice })?;
        let raw = self.transport.post_json(&self.preview_path, &body).await?;
        if !raw.is_success() {
            return Err(TransportError::status(raw.status, &raw.text_lossy()).into());
        }

        let response: PreviewResponse = serde_json::from_slice(&raw.body).map_err(|e| {
            Error::malformed_with_context(
                format!("Invalid preview response: {}", e),
                ErrorContext::new().with_source("preview"),
            )
        })?;

        if let Some(message) = response.error_message() {
            return Err(Error::server_reported(message));
        }

        let payload = response.audio.ok_or_else(|| {
            Error::malformed_with_context(
                "Preview response carried neither audio nor error",
                ErrorContext::new()
                    .with_field_path("audio")
                    .with_source("preview"),
            )
        })?;

        PreviewAudio::decode(voice, seq, &payload)
    }

    async fn install_preview(&self, seq: u64, audio: PreviewAudio) -> Result<Arc<PreviewAudio>> {
        let audio = Arc::new(audio);
        let installed = {
            let mut state = self.lock_state();
            if self.discards_stale() && seq < state.applied_preview {
                Err(state.applied_preview)
            } else {
                state.applied_preview = seq;
                Ok(state.preview.replace(audio.clone()))
            }
        };

        let released = match installed {
            Ok(released) => released,
            Err(applied) => {
                debug!(seq, applied, "discarding stale preview response");
                self.emit(CatalogEvent::ResponseDiscarded {
                    operation: Operation::Preview,
                    seq,
                    applied,
                })
                .await;
                return Err(Error::Superseded { seq, applied });
            }
        };

        if let Some(old) = released {
            self.emit(CatalogEvent::PreviewReleased {
                handle: old.handle,
                voice: old.voice.clone(),
            })
            .await;
        }
        self.emit(CatalogEvent::PreviewReady {
            handle: audio.handle,
            voice: audio.voice.clone(),
            mime_type: audio.mime_type().to_string(),
            bytes: audio.len(),
        })
        .await;
        Ok(audio)
    }
}
