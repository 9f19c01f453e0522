//! Novella — scene script loading and validation.
//!
//! A scene script is the static, ordered list of scenes the dialogue engine
//! walks through. Scripts are parsed from YAML and validated once; a script
//! that reaches the engine is known to be well formed.

mod document;
pub mod error;
pub mod scene;

pub use error::ScriptError;
pub use scene::{ChoiceRecord, ChoiceTarget, ImageRef, SceneRecord, SceneScript};
