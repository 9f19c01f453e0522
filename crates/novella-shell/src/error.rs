//! Novella shell — error types.

use novella_script::ScriptError;
use thiserror::Error;

/// Startup and runtime errors for the terminal host.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The scene script failed to load.
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Reading input or writing frames failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A view could not be encoded.
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
