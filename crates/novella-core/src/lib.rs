//! Novella Core — shared abstractions.
//!
//! This crate defines the traits and small value types that the script,
//! dialogue and session crates depend on. It contains no runtime code.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod scheduler;
pub mod text_speed;
