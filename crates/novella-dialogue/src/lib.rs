//! Novella — dialogue engine and typewriter reveal.
//!
//! Responsible for scene progression, per-character text reveal, the
//! first-input arming step, rewind, and branch choice selection.

pub mod application;
pub mod domain;
