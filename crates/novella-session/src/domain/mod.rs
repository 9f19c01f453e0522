//! Session domain types.

pub mod achievements;
pub mod commands;
pub mod context;
pub mod save_slots;
pub mod settings;
