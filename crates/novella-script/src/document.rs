//! On-disk YAML shape of a scene script.

use serde::Deserialize;

use crate::error::ScriptError;
use crate::scene::{ChoiceRecord, ChoiceTarget, ImageRef, SceneRecord};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptDocument {
    pub scenes: Vec<SceneDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SceneDocument {
    pub background: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub choices: Option<Vec<ChoiceDocument>>,
}

/// A choice without a `target` sends the player back to the menu.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ChoiceDocument {
    pub label: String,
    #[serde(default)]
    pub target: Option<usize>,
}

impl ScriptDocument {
    /// Converts the raw document into scene records. Range checks on
    /// choice targets happen in `SceneScript::from_scenes`.
    pub(crate) fn into_scenes(self) -> Result<Vec<SceneRecord>, ScriptError> {
        self.scenes
            .into_iter()
            .enumerate()
            .map(|(index, scene)| scene.into_record(index))
            .collect()
    }
}

impl SceneDocument {
    fn into_record(self, index: usize) -> Result<SceneRecord, ScriptError> {
        let choices = match self.choices {
            None => Vec::new(),
            Some(choices) if choices.is_empty() => {
                return Err(ScriptError::EmptyChoiceList { scene: index });
            }
            Some(choices) => choices
                .into_iter()
                .map(|choice| ChoiceRecord {
                    label: choice.label,
                    target: choice
                        .target
                        .map_or(ChoiceTarget::ReturnToMenu, ChoiceTarget::Scene),
                })
                .collect(),
        };

        Ok(SceneRecord {
            background: ImageRef::new(self.background),
            text: self.text,
            choices,
        })
    }
}
