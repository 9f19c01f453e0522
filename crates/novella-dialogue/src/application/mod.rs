//! Tokio-backed tick source and driver for the dialogue engine.

pub mod runtime;
