//! Novella shell — a line-oriented terminal host for the dialogue engine.
//!
//! Reads one command per line from stdin, feeds the dialogue engine and the
//! session context, and writes the resulting view as one JSON line per
//! change.

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod presentation;
