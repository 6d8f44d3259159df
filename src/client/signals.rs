use crate::events::Operation;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Request activity of one client.
///
/// Refreshes and preview loads are tracked independently, so a client can be
/// refreshing and loading a preview at the same time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Activity {
    pub refreshes_in_flight: usize,
    pub previews_in_flight: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientState {
    Idle,
    Refreshing,
    LoadingPreview,
}

impl Activity {
    pub fn is_idle(&self) -> bool {
        self.refreshes_in_flight == 0 && self.previews_in_flight == 0
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshes_in_flight > 0
    }

    pub fn is_loading_preview(&self) -> bool {
        self.previews_in_flight > 0
    }

    /// Active states; `[Idle]` when nothing is in flight.
    pub fn states(&self) -> Vec<ClientState> {
        if self.is_idle() {
            return vec![ClientState::Idle];
        }
        let mut states = Vec::with_capacity(2);
        if self.is_refreshing() {
            states.push(ClientState::Refreshing);
        }
        if self.is_loading_preview() {
            states.push(ClientState::LoadingPreview);
        }
        states
    }
}

/// In-flight counters and per-kind request sequence numbers.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    refreshes: AtomicUsize,
    previews: AtomicUsize,
    refresh_seq: AtomicU64,
    preview_seq: AtomicU64,
}

impl InFlight {
    /// Register a request; the returned guard leaves the in-flight state when
    /// dropped, including when the caller abandons the future.
    pub(crate) fn enter(&self, op: Operation) -> InFlightGuard<'_> {
        let (counter, seq) = match op {
            Operation::Refresh => (&self.refreshes, &self.refresh_seq),
            Operation::Preview => (&self.previews, &self.preview_seq),
        };
        counter.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            counter,
            seq: seq.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    pub(crate) fn snapshot(&self) -> Activity {
        Activity {
            refreshes_in_flight: self.refreshes.load(Ordering::SeqCst),
            previews_in_flight: self.previews.load(Ordering::SeqCst),
        }
    }
}

pub(crate) struct InFlightGuard<'a> {
    counter: &'a AtomicUsize,
    seq: u64,
}

impl InFlightGuard<'_> {
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}
