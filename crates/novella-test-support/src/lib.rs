//! Shared test fakes and utilities for the Novella visual-novel engine.

mod clock;
mod scheduler;

pub use clock::FixedClock;
pub use scheduler::{ManualRevealHandle, ManualRevealScheduler};
