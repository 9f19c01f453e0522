//! Pure dialogue state: no timers, no channels.

pub mod commands;
pub mod engine;
pub mod events;
pub mod typewriter;
