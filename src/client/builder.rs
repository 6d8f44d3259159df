use crate::client::core::{CatalogState, VoiceCatalogClient};
use crate::client::signals::InFlight;
use crate::config::{CatalogConfig, ResponseOrdering};
use crate::events::EventSink;
use crate::transport::{CatalogTransport, HttpTransport};
use crate::types::VoiceList;
use crate::Result;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Builder for [`VoiceCatalogClient`].
///
/// Without an explicit transport, an [`HttpTransport`] is built from the
/// configuration.
pub struct VoiceCatalogClientBuilder {
    config: CatalogConfig,
    transport: Option<Arc<dyn CatalogTransport>>,
    events: Arc<dyn EventSink>,
    initial_voices: VoiceList,
    initial_selection: Option<String>,
}

impl VoiceCatalogClientBuilder {
    pub fn new() -> Self {
        Self {
            config: CatalogConfig::default(),
            transport: None,
            events: crate::events::noop_sink(),
            initial_voices: VoiceList::new(),
            initial_selection: None,
        }
    }

    /// Replace the whole configuration (e.g. one from [`CatalogConfig::from_env`]).
    pub fn config(mut self, config: CatalogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.config.refresh_path = path.into();
        self
    }

    pub fn preview_path(mut self, path: impl Into<String>) -> Self {
        self.config.preview_path = path.into();
        self
    }

    /// Whole-request timeout, rounded up to whole seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self.config.timeout_secs = Some(secs.max(1));
        self
    }

    pub fn proxy_url(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy_url = Some(proxy.into());
        self
    }

    pub fn ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.config.ordering = ordering;
        self
    }

    pub fn preview_hide_delay(mut self, delay: Duration) -> Self {
        self.config.preview_hide_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Inject the request path, bypassing the HTTP configuration.
    pub fn transport(mut self, transport: Arc<dyn CatalogTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Inject an event sink. Default is a no-op sink.
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Voices known before the first refresh (e.g. from a saved workflow).
    pub fn initial_voices<I, S>(mut self, voices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial_voices = VoiceList::from_names(voices);
        self
    }

    /// Preferred selection; reconciled against the initial voices at build time.
    pub fn initial_selection(mut self, voice: impl Into<String>) -> Self {
        self.initial_selection = Some(voice.into());
        self
    }

    pub fn build(self) -> Result<VoiceCatalogClient> {
        let config = self.config.validate()?;
        let transport: Arc<dyn CatalogTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&config)?),
        };
        let selected = self
            .initial_voices
            .reconcile(self.initial_selection.as_deref());

        Ok(VoiceCatalogClient {
            transport,
            events: self.events,
            refresh_path: config.refresh_path.clone(),
            preview_path: config.preview_path.clone(),
            ordering: config.ordering,
            preview_hide_delay: config.preview_hide_delay(),
            state: Mutex::new(CatalogState {
                voices: self.initial_voices,
                selected,
                ..CatalogState::default()
            }),
            inflight: InFlight::default(),
        })
    }
}

impl Default for VoiceCatalogClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
