use crate::client::core::VoiceCatalogClient;
use crate::events::{CatalogEvent, Operation};
use crate::protocol::{RefreshRequest, RefreshResponse};
use crate::transport::TransportError;
use crate::types::{Credential, VoiceFilter, VoiceList};
use crate::{Error, ErrorContext, Result};
use tracing::{debug, info, warn};

impl VoiceCatalogClient {
    /// Fetch the voice list for `filter` (`all` when `None`) and make it current.
    ///
    /// A blank credential fails with [`Error::AuthMissing`] before any request
    /// is made. On success the selection is reconciled with the new list: it
    /// is kept when still present, otherwise it moves to the first voice, or
    /// is cleared when the list is empty. On failure nothing changes.
    pub async fn refresh_voices(
        &self,
        credential: &Credential,
        filter: impl Into<Option<VoiceFilter>>,
    ) -> Result<VoiceList> {
        let filter = filter.into().unwrap_or_default();
        if credential.is_blank() {
            return Err(Error::AuthMissing);
        }

        let guard = self.inflight.enter(Operation::Refresh);
        let seq = guard.seq();
        debug!(seq, filter = %filter, "refreshing voice list");
        self.emit(CatalogEvent::RefreshStarted { seq, filter }).await;

        let outcome = match self.fetch_voices(credential, filter).await {
            Ok(list) => self.apply_refresh(seq, list).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            if !matches!(e, Error::Superseded { .. }) {
                warn!(seq, "voice list refresh failed: {}", e);
                self.emit(CatalogEvent::RefreshFailed {
                    seq,
                    kind: e.kind(),
                    message: e.to_string(),
                })
                .await;
            }
        }
        drop(guard);
        outcome
    }

    async fn fetch_voices(&self, credential: &Credential, filter: VoiceFilter) -> Result<VoiceList> {
        let body = serde_json::to_value(RefreshRequest::new(credential, filter))?;
        let raw = self.transport.post_json(&self.refresh_path, &body).await?;
        if !raw.is_success() {
            return Err(TransportError::status(raw.status, &raw.text_lossy()).into());
        }

        let response: RefreshResponse = serde_json::from_slice(&raw.body).map_err(|e| {
            Error::malformed_with_context(
                format!("Invalid refresh response: {}", e),
                ErrorContext::new().with_source("refresh"),
            )
        })?;

        if !response.is_success() {
            let message = response
                .error_message()
                .unwrap_or_else(|| "refresh failed".to_string());
            return Err(Error::server_reported(message));
        }

        let reported = response.reported_count();
        let names = response.voice_names.ok_or_else(|| {
            Error::malformed_with_context(
                "Successful refresh carried no voice list",
                ErrorContext::new()
                    .with_field_path("voice_names")
                    .with_source("refresh"),
            )
        })?;

        let received = names.len();
        if let Some(count) = reported {
            if count != received as u64 {
                warn!(count, received, "refresh count does not match the voice list");
            }
        }
        let list = VoiceList::from_names(names);
        if list.len() != received {
            debug!(
                dropped = received - list.len(),
                "dropped blank or duplicate voice names"
            );
        }
        Ok(list)
    }

    async fn apply_refresh(&self, seq: u64, list: VoiceList) -> Result<VoiceList> {
        let applied = {
            let mut state = self.lock_state();
            if self.discards_stale() && seq < state.applied_refresh {
                Err(state.applied_refresh)
            } else {
                state.applied_refresh = seq;
                let previous = state.selected.take();
                state.selected = list.reconcile(previous.as_deref());
                state.voices = list.clone();
                Ok((previous, state.selected.clone()))
            }
        };

        let (previous, selected) = match applied {
            Ok(change) => change,
            Err(applied) => {
                debug!(seq, applied, "discarding stale refresh response");
                self.emit(CatalogEvent::ResponseDiscarded {
                    operation: Operation::Refresh,
                    seq,
                    applied,
                })
                .await;
                return Err(Error::Superseded { seq, applied });
            }
        };

        info!(seq, voices = list.len(), "voice list refreshed");
        self.emit(CatalogEvent::VoicesRefreshed {
            seq,
            voices: list.as_slice().to_vec(),
            selected: selected.clone(),
        })
        .await;
        if previous != selected {
            self.emit(CatalogEvent::SelectionChanged {
                previous,
                current: selected,
            })
            .await;
        }
        Ok(list)
    }
}
