//! Reveal scheduling abstraction.
//!
//! The dialogue engine never owns a timer directly. It asks a
//! [`RevealScheduler`] for a repeating tick source and keeps the returned
//! [`RevealHandle`] until the reveal completes or is superseded. Every tick
//! is tagged with the [`RevealId`] it was scheduled for, so a tick that was
//! already in flight when its reveal was cancelled can be recognised and
//! dropped.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifies one reveal run within a single engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RevealId(pub u64);

impl RevealId {
    /// Returns the id that follows this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RevealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reveal-{}", self.0)
    }
}

/// A tick delivered by a scheduled reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTick {
    /// The reveal this tick belongs to.
    pub reveal: RevealId,
}

/// Handle to a scheduled, repeating tick source.
pub trait RevealHandle {
    /// Stops the tick source. Calling this on a stopped handle is a no-op.
    fn cancel(&mut self);

    /// Returns `true` until `cancel` has been called.
    fn is_active(&self) -> bool;
}

/// Factory for repeating tick sources.
pub trait RevealScheduler {
    /// Handle type returned for each scheduled reveal.
    type Handle: RevealHandle;

    /// Starts delivering a [`RevealTick`] for `reveal` every `interval`.
    fn schedule(&mut self, reveal: RevealId, interval: Duration) -> Self::Handle;
}
