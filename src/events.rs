//! 事件模块：客户端状态变化的订阅接口。
//!
//! Catalog events.
//!
//! A UI subscribes to client state changes by injecting an [`EventSink`]
//! instead of wrapping callbacks. Sinks never influence the outcome of an
//! operation: a failing sink is logged and ignored.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CatalogEvent`] | Typed event enum |
//! | [`EventSink`] | Trait for event destinations |
//! | [`NoopEventSink`] | Default sink (drops everything) |
//! | [`InMemoryEventSink`] | Bounded in-memory sink for tests and polling UIs |
//! | [`TracingEventSink`] | Logs every event through `tracing` |
//! | [`CompositeEventSink`] | Fans events out to several sinks |

use crate::error::ErrorKind;
use crate::types::VoiceFilter;
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, RwLock};

/// State change reported by [`crate::VoiceCatalogClient`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    RefreshStarted {
        seq: u64,
        filter: VoiceFilter,
    },
    VoicesRefreshed {
        seq: u64,
        voices: Vec<String>,
        selected: Option<String>,
    },
    RefreshFailed {
        seq: u64,
        kind: ErrorKind,
        message: String,
    },
    SelectionChanged {
        previous: Option<String>,
        current: Option<String>,
    },
    PreviewRequested {
        seq: u64,
        voice: String,
    },
    PreviewReady {
        handle: u64,
        voice: String,
        mime_type: String,
        bytes: usize,
    },
    /// The audio identified by `handle` left the cache; resources built from
    /// it should be freed.
    PreviewReleased {
        handle: u64,
        voice: String,
    },
    /// `hide_after_ms` is the configured delay after which a UI should hide
    /// the preview surface. The client schedules nothing itself.
    PreviewFailed {
        seq: u64,
        voice: String,
        kind: ErrorKind,
        message: String,
        hide_after_ms: u64,
    },
    /// A response arrived after a newer one of the same kind was applied.
    ResponseDiscarded {
        operation: Operation,
        seq: u64,
        applied: u64,
    },
}

/// Request kind an event or in-flight counter refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Refresh,
    Preview,
}

impl CatalogEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RefreshStarted { .. } => "refresh_started",
            Self::VoicesRefreshed { .. } => "voices_refreshed",
            Self::RefreshFailed { .. } => "refresh_failed",
            Self::SelectionChanged { .. } => "selection_changed",
            Self::PreviewRequested { .. } => "preview_requested",
            Self::PreviewReady { .. } => "preview_ready",
            Self::PreviewReleased { .. } => "preview_released",
            Self::PreviewFailed { .. } => "preview_failed",
            Self::ResponseDiscarded { .. } => "response_discarded",
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: CatalogEvent) -> Result<()>;
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// No-op sink (always available).
pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {
    async fn emit(&self, _: CatalogEvent) -> Result<()> {
        Ok(())
    }
}

/// Returns a no-op event sink.
pub fn noop_sink() -> Arc<dyn EventSink> {
    Arc::new(NoopEventSink)
}

/// In-memory sink; keeps the most recent `max_events` events.
pub struct InMemoryEventSink {
    events: Arc<RwLock<Vec<CatalogEvent>>>,
    max_events: usize,
}

impl InMemoryEventSink {
    pub fn new(max: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            max_events: max.max(1),
        }
    }

    pub fn events(&self) -> Vec<CatalogEvent> {
        self.events
            .read()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    pub fn events_named(&self, name: &str) -> Vec<CatalogEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.name() == name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut e) = self.events.write() {
            e.clear();
        }
    }
}

impl Default for InMemoryEventSink {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn emit(&self, event: CatalogEvent) -> Result<()> {
        if let Ok(mut e) = self.events.write() {
            if e.len() >= self.max_events {
                e.remove(0);
            }
            e.push(event);
        }
        Ok(())
    }
}

/// Logs events at `info` (failures at `warn`).
pub struct TracingEventSink {
    prefix: String,
}

impl TracingEventSink {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for TracingEventSink {
    fn default() -> Self {
        Self::new("voice_catalog")
    }
}

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: CatalogEvent) -> Result<()> {
        match &event {
            CatalogEvent::RefreshFailed { message, .. }
            | CatalogEvent::PreviewFailed { message, .. } => {
                tracing::warn!(prefix = %self.prefix, name = event.name(), "{}", message);
            }
            _ => {
                tracing::info!(prefix = %self.prefix, name = event.name(), ?event);
            }
        }
        Ok(())
    }
}

/// Forwards every event to each inner sink; the first error is returned
/// after all sinks have been tried.
pub struct CompositeEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: CatalogEvent) -> Result<()> {
        let results =
            futures::future::join_all(self.sinks.iter().map(|s| s.emit(event.clone()))).await;
        results.into_iter().collect::<Result<Vec<_>>>().map(|_| ())
    }

    async fn close(&self) -> Result<()> {
        let results = futures::future::join_all(self.sinks.iter().map(|s| s.close())).await;
        results.into_iter().collect::<Result<Vec<_>>>().map(|_| ())
    }
}
