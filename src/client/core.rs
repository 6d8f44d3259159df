use crate::client::signals::{Activity, InFlight};
use crate::config::ResponseOrdering;
use crate::events::{CatalogEvent, EventSink};
use crate::transport::CatalogTransport;
use crate::types::{PreviewAudio, VoiceList};
use crate::{Error, ErrorContext, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::warn;

/// Voice list, selection and preview cache for one editor node.
///
/// All operations take `&self`; share the client through an `Arc` when
/// several tasks drive it. Overlapping requests are neither coalesced nor
/// cancelled; which response wins is decided by [`ResponseOrdering`].
pub struct VoiceCatalogClient {
    pub(crate) transport: Arc<dyn CatalogTransport>,
    pub(crate) events: Arc<dyn EventSink>,
    pub(crate) refresh_path: String,
    pub(crate) preview_path: String,
    pub(crate) ordering: ResponseOrdering,
    pub(crate) preview_hide_delay: Duration,
    pub(crate) state: Mutex<CatalogState>,
    pub(crate) inflight: InFlight,
}

#[derive(Debug, Default)]
pub(crate) struct CatalogState {
    pub(crate) voices: VoiceList,
    pub(crate) selected: Option<String>,
    pub(crate) preview: Option<Arc<PreviewAudio>>,
    /// Sequence numbers of the last applied response per kind.
    pub(crate) applied_refresh: u64,
    pub(crate) applied_preview: u64,
}

impl VoiceCatalogClient {
    pub fn builder() -> crate::client::VoiceCatalogClientBuilder {
        crate::client::VoiceCatalogClientBuilder::new()
    }

    /// Voice list from the latest applied refresh.
    pub fn voices(&self) -> VoiceList {
        self.lock_state().voices.clone()
    }

    pub fn selected_voice(&self) -> Option<String> {
        self.lock_state().selected.clone()
    }

    /// Cached preview, if any.
    pub fn preview(&self) -> Option<Arc<PreviewAudio>> {
        self.lock_state().preview.clone()
    }

    pub fn activity(&self) -> Activity {
        self.inflight.snapshot()
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    pub fn preview_hide_delay(&self) -> Duration {
        self.preview_hide_delay
    }

    /// Make `voice` the active selection. It must belong to the current list.
    pub async fn select_voice(&self, voice: &str) -> Result<()> {
        let previous = {
            let mut state = self.lock_state();
            if !state.voices.contains(voice) {
                return Err(Error::validation_with_context(
                    format!("Voice '{}' is not in the current voice list", voice),
                    ErrorContext::new().with_field_path("selected_voice"),
                ));
            }
            state.selected.replace(voice.to_string())
        };
        if previous.as_deref() != Some(voice) {
            self.emit(CatalogEvent::SelectionChanged {
                previous,
                current: Some(voice.to_string()),
            })
            .await;
        }
        Ok(())
    }

    /// Release the cached preview and close the event sink.
    ///
    /// The client stays usable afterwards; this only frees what it holds.
    pub async fn dispose(&self) {
        let released = self.lock_state().preview.take();
        if let Some(audio) = released {
            self.emit(CatalogEvent::PreviewReleased {
                handle: audio.handle,
                voice: audio.voice.clone(),
            })
            .await;
        }
        if let Err(e) = self.events.close().await {
            warn!("event sink close failed: {}", e);
        }
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, CatalogState> {
        // Critical sections never panic mid-update.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn discards_stale(&self) -> bool {
        self.ordering == ResponseOrdering::LatestRequestWins
    }

    pub(crate) async fn emit(&self, event: CatalogEvent) {
        let name = event.name();
        if let Err(e) = self.events.emit(event).await {
            warn!(event = name, "event sink rejected event: {}", e);
        }
    }
}
