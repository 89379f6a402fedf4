//! Process-wide dispatch counters.
//! Outcome totals are lock-free atomics; per-command tallies sit behind a mutex
//! keyed by the registered command key.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::command::dispatch::Outcome;

static HANDLED: AtomicU64 = AtomicU64::new(0);
static NOT_FOUND: AtomicU64 = AtomicU64::new(0);
static UNAUTHORIZED: AtomicU64 = AtomicU64::new(0);
static PARSE_FAILED: AtomicU64 = AtomicU64::new(0);
static HANDLER_ERRORS: AtomicU64 = AtomicU64::new(0);

static COMMAND_COUNTERS: OnceLock<Mutex<HashMap<String, CommandCounter>>> = OnceLock::new();

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CommandCounter {
    pub invocations: u64,
    pub handled: u64,
    pub rejected: u64,
    pub failed: u64,
}

fn command_counter_lock() -> &'static Mutex<HashMap<String, CommandCounter>> {
    COMMAND_COUNTERS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Count one finished dispatch. `key` is `None` when no descriptor resolved.
pub fn record_outcome(key: Option<&str>, outcome: &Outcome) {
    let total = match outcome {
        Outcome::Handled => &HANDLED,
        Outcome::NotFound => &NOT_FOUND,
        Outcome::Unauthorized => &UNAUTHORIZED,
        Outcome::ParseFailed(_) => &PARSE_FAILED,
        Outcome::HandlerError => &HANDLER_ERRORS,
    };
    total.fetch_add(1, Ordering::Relaxed);

    let Some(key) = key else { return };
    let mut guard = command_counter_lock().lock().unwrap_or_else(|e| e.into_inner());
    let counter = guard.entry(key.to_lowercase()).or_default();
    counter.invocations = counter.invocations.saturating_add(1);
    match outcome {
        Outcome::Handled => counter.handled = counter.handled.saturating_add(1),
        Outcome::HandlerError => counter.failed = counter.failed.saturating_add(1),
        _ => counter.rejected = counter.rejected.saturating_add(1),
    }
}

pub fn command_counters_snapshot() -> HashMap<String, CommandCounter> {
    command_counter_lock()
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub handled: u64,
    pub not_found: u64,
    pub unauthorized: u64,
    pub parse_failed: u64,
    pub handler_errors: u64,
}

impl Snapshot {
    pub fn total(&self) -> u64 {
        self.handled + self.not_found + self.unauthorized + self.parse_failed + self.handler_errors
    }
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        handled: HANDLED.load(Ordering::Relaxed),
        not_found: NOT_FOUND.load(Ordering::Relaxed),
        unauthorized: UNAUTHORIZED.load(Ordering::Relaxed),
        parse_failed: PARSE_FAILED.load(Ordering::Relaxed),
        handler_errors: HANDLER_ERRORS.load(Ordering::Relaxed),
    }
}
