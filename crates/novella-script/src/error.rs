//! Script loading errors.

use thiserror::Error;

/// A scene script that cannot be handed to the dialogue engine.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script contains no scenes.
    #[error("script has no scenes")]
    NoScenes,

    /// A scene declares a choice list with no entries.
    #[error("scene {scene}: choice list is present but empty")]
    EmptyChoiceList {
        /// Index of the offending scene.
        scene: usize,
    },

    /// A choice has a blank label.
    #[error("scene {scene}, choice {choice}: label is empty")]
    EmptyChoiceLabel {
        /// Index of the offending scene.
        scene: usize,
        /// Position of the choice within the scene.
        choice: usize,
    },

    /// A choice jumps to a scene that does not exist.
    #[error("scene {scene}, choice {choice}: target {target} is outside 0..{len}")]
    TargetOutOfRange {
        /// Index of the offending scene.
        scene: usize,
        /// Position of the choice within the scene.
        choice: usize,
        /// The requested target index.
        target: usize,
        /// Number of scenes in the script.
        len: usize,
    },

    /// The YAML document is malformed.
    #[error("malformed script document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The script file could not be read.
    #[error("failed to read script file: {0}")]
    Io(#[from] std::io::Error),
}
