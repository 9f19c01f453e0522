//! Session command handling.

pub mod command_handlers;
