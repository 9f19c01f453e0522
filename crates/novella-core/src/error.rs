//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Rejected player input is never an error, and script defects are
/// reported by the script crate's own error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A configuration value is out of range.
    #[error("validation error: {0}")]
    Validation(String),
}
