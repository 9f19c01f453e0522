//! Environment configuration.

use std::path::PathBuf;
use std::sync::Arc;

use novella_core::text_speed::TextSpeed;
use novella_script::SceneScript;

use crate::error::AppError;

/// Variable holding the starting text speed in milliseconds per character.
pub const TEXT_SPEED_VAR: &str = "NOVELLA_TEXT_SPEED";
/// Variable holding the path of a YAML scene script.
pub const SCRIPT_VAR: &str = "NOVELLA_SCRIPT";

/// Settings the shell reads at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Starting text speed.
    pub text_speed: TextSpeed,
    /// External script; the built-in script is used when absent.
    pub script_path: Option<PathBuf>,
}

impl ShellConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let text_speed = match lookup(TEXT_SPEED_VAR) {
            Some(raw) => {
                let millis: u64 = raw.trim().parse().map_err(|e| {
                    AppError::Config(format!("{TEXT_SPEED_VAR} must be a positive integer: {e}"))
                })?;
                TextSpeed::from_millis(millis)
                    .map_err(|e| AppError::Config(format!("{TEXT_SPEED_VAR}: {e}")))?
            }
            None => TextSpeed::DEFAULT,
        };
        let script_path = lookup(SCRIPT_VAR)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            text_speed,
            script_path,
        })
    }

    /// Loads the configured scene script.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Script` if the file cannot be read or fails
    /// validation.
    pub fn load_script(&self) -> Result<Arc<SceneScript>, AppError> {
        let script = match &self.script_path {
            Some(path) => SceneScript::from_path(path)?,
            None => SceneScript::builtin()?,
        };
        Ok(Arc::new(script))
    }
}
