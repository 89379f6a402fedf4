//! Per-actor pending confirmations for commands that must be typed twice.
//!
//! A handler instance is shared by every caller, so pending state is keyed by
//! actor id and the check-and-arm step happens under one lock: two
//! near-simultaneous invocations from the same actor cannot both see "armed".
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// First invocation (or the previous one expired); the caller must repeat.
    Armed,
    /// Second invocation inside the window; the pending entry is consumed.
    Confirmed,
}

#[derive(Debug, Default)]
pub struct ConfirmationGate {
    pending: Mutex<HashMap<Uuid, Instant>>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, actor: Uuid, window: Duration) -> Confirmation {
        self.check_at(actor, window, Instant::now())
    }

    pub fn check_at(&self, actor: Uuid, window: Duration, now: Instant) -> Confirmation {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        // Keep the map bounded by dropping everyone else's stale entries too.
        pending.retain(|_, armed| now.saturating_duration_since(*armed) <= window);
        match pending.remove(&actor) {
            Some(_) => Confirmation::Confirmed,
            None => {
                pending.insert(actor, now);
                Confirmation::Armed
            }
        }
    }

    pub fn cancel(&self, actor: Uuid) {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&actor);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
