//! Test scheduler — a `RevealScheduler` that never ticks on its own.
//!
//! Tests drive reveals by calling the engine's `tick` directly and use the
//! recorded schedule/cancel history to assert on timer ownership.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use novella_core::scheduler::{RevealHandle, RevealId, RevealScheduler};

#[derive(Debug, Default)]
struct ScheduleLog {
    scheduled: Vec<(RevealId, Duration)>,
    cancelled: Vec<RevealId>,
}

/// A scheduler that records every `schedule` call and every effective
/// `cancel`. Clones share the same history, so a test can keep one clone
/// while the engine owns the other.
#[derive(Debug, Clone, Default)]
pub struct ManualRevealScheduler {
    log: Arc<Mutex<ScheduleLog>>,
}

impl ManualRevealScheduler {
    /// Create a scheduler with an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every `(reveal, interval)` pair scheduled so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn scheduled(&self) -> Vec<(RevealId, Duration)> {
        self.log.lock().unwrap().scheduled.clone()
    }

    /// Returns every reveal whose handle was cancelled, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn cancelled(&self) -> Vec<RevealId> {
        self.log.lock().unwrap().cancelled.clone()
    }

    /// Returns the reveals that were scheduled and not yet cancelled.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn active(&self) -> Vec<RevealId> {
        let log = self.log.lock().unwrap();
        log.scheduled
            .iter()
            .map(|(reveal, _)| *reveal)
            .filter(|reveal| !log.cancelled.contains(reveal))
            .collect()
    }

    /// Returns the most recently scheduled reveal.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn last_scheduled(&self) -> Option<RevealId> {
        self.log
            .lock()
            .unwrap()
            .scheduled
            .last()
            .map(|(reveal, _)| *reveal)
    }
}

impl RevealScheduler for ManualRevealScheduler {
    type Handle = ManualRevealHandle;

    fn schedule(&mut self, reveal: RevealId, interval: Duration) -> Self::Handle {
        self.log.lock().unwrap().scheduled.push((reveal, interval));
        ManualRevealHandle {
            reveal,
            active: true,
            log: Arc::clone(&self.log),
        }
    }
}

/// Handle returned by `ManualRevealScheduler`.
#[derive(Debug)]
pub struct ManualRevealHandle {
    reveal: RevealId,
    active: bool,
    log: Arc<Mutex<ScheduleLog>>,
}

impl RevealHandle for ManualRevealHandle {
    fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.log.lock().unwrap().cancelled.push(self.reveal);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
