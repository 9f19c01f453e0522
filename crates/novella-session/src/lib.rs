//! Novella — session state outside the dialogue engine.
//!
//! Responsible for the screen the player is on, modal overlays, settings,
//! session-only save slots, achievements, the intro gate, and fade
//! transitions between screens.

pub mod application;
pub mod domain;
