//! Scene records and the validated scene script.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::document::ScriptDocument;
use crate::error::ScriptError;

const BUILTIN_SCRIPT: &str = include_str!("../scripts/confession.yaml");

/// Opaque reference to a background image, resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wraps an image locator.
    #[must_use]
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Returns the image locator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a choice sends the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum ChoiceTarget {
    /// Jump to the scene at this index.
    Scene(usize),
    /// Leave the dialogue and return to the main menu.
    ReturnToMenu,
}

/// One selectable option on a branch scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    /// Text shown on (or behind) the hotspot.
    pub label: String,
    /// Destination of the choice.
    pub target: ChoiceTarget,
}

/// One scene: a background, a line of dialogue, and optional choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRecord {
    /// Background image for the scene.
    pub background: ImageRef,
    /// Dialogue text; may be empty.
    pub text: String,
    /// Choices offered on this scene; empty when the scene is linear.
    pub choices: Vec<ChoiceRecord>,
}

impl SceneRecord {
    /// Creates a linear scene.
    #[must_use]
    pub fn new(background: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            background: ImageRef::new(background),
            text: text.into(),
            choices: Vec::new(),
        }
    }

    /// Adds a choice to the scene.
    #[must_use]
    pub fn with_choice(mut self, label: impl Into<String>, target: ChoiceTarget) -> Self {
        self.choices.push(ChoiceRecord {
            label: label.into(),
            target,
        });
        self
    }

    /// Returns `true` if the scene offers choices.
    #[must_use]
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Returns `true` if the scene has dialogue to reveal.
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

/// A validated, immutable scene sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneScript {
    scenes: Vec<SceneRecord>,
    fingerprint: String,
}

impl SceneScript {
    /// Validates `scenes` and builds a script.
    ///
    /// # Errors
    ///
    /// Returns `ScriptError::NoScenes` for an empty list, and
    /// `ScriptError::EmptyChoiceLabel` or `ScriptError::TargetOutOfRange`
    /// for a malformed choice.
    pub fn from_scenes(scenes: Vec<SceneRecord>) -> Result<Self, ScriptError> {
        if scenes.is_empty() {
            return Err(ScriptError::NoScenes);
        }

        let len = scenes.len();
        for (scene_index, scene) in scenes.iter().enumerate() {
            for (choice_index, choice) in scene.choices.iter().enumerate() {
                if choice.label.trim().is_empty() {
                    return Err(ScriptError::EmptyChoiceLabel {
                        scene: scene_index,
                        choice: choice_index,
                    });
                }
                if let ChoiceTarget::Scene(target) = choice.target
                    && target >= len
                {
                    return Err(ScriptError::TargetOutOfRange {
                        scene: scene_index,
                        choice: choice_index,
                        target,
                        len,
                    });
                }
            }
        }

        let fingerprint = fingerprint(&scenes);
        Ok(Self {
            scenes,
            fingerprint,
        })
    }

    /// Parses and validates a YAML script.
    ///
    /// # Errors
    ///
    /// Returns `ScriptError::Parse` for malformed YAML and any validation
    /// error from [`SceneScript::from_scenes`].
    pub fn from_yaml(source: &str) -> Result<Self, ScriptError> {
        let document: ScriptDocument = serde_yaml::from_str(source)?;
        let script = Self::from_scenes(document.into_scenes()?)?;
        info!(
            scenes = script.len(),
            fingerprint = %script.fingerprint,
            "scene script loaded"
        );
        Ok(script)
    }

    /// Reads and validates a YAML script file.
    ///
    /// # Errors
    ///
    /// Returns `ScriptError::Io` if the file cannot be read, otherwise the
    /// same errors as [`SceneScript::from_yaml`].
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }

    /// The script bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns a `ScriptError` only if the bundled file is broken.
    pub fn builtin() -> Result<Self, ScriptError> {
        Self::from_yaml(BUILTIN_SCRIPT)
    }

    /// Number of scenes. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Always `false`; a script holds at least one scene.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Index of the final scene.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.scenes.len() - 1
    }

    /// Returns the scene at `index`.
    #[must_use]
    pub fn scene(&self, index: usize) -> Option<&SceneRecord> {
        self.scenes.get(index)
    }

    /// Returns all scenes in order.
    #[must_use]
    pub fn scenes(&self) -> &[SceneRecord] {
        &self.scenes
    }

    /// Hex SHA-256 over the scene contents.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Distinct backgrounds in first-use order, for preloading.
    #[must_use]
    pub fn backgrounds(&self) -> Vec<&ImageRef> {
        let mut seen = HashSet::new();
        self.scenes
            .iter()
            .map(|scene| &scene.background)
            .filter(|image| seen.insert(*image))
            .collect()
    }
}

fn fingerprint(scenes: &[SceneRecord]) -> String {
    let mut hasher = Sha256::new();
    for scene in scenes {
        hasher.update(scene.background.as_str().as_bytes());
        hasher.update([0x1f_u8]);
        hasher.update(scene.text.as_bytes());
        for choice in &scene.choices {
            hasher.update([0x1e_u8]);
            hasher.update(choice.label.as_bytes());
            match choice.target {
                ChoiceTarget::Scene(index) => hasher.update(index.to_le_bytes()),
                ChoiceTarget::ReturnToMenu => hasher.update(b"menu"),
            }
        }
        hasher.update([0x1d_u8]);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_script_has_eight_scenes_with_one_branch() {
        // Act
        let script = SceneScript::builtin().unwrap();

        // Assert
        assert_eq!(script.len(), 8);
        let branch = script.scene(4).unwrap();
        assert!(!branch.has_text());
        assert_eq!(branch.choices.len(), 2);
        assert_eq!(branch.choices[0].target, ChoiceTarget::Scene(5));
        assert_eq!(branch.choices[1].target, ChoiceTarget::ReturnToMenu);
        assert_eq!(
            script.scenes().iter().filter(|s| s.has_choices()).count(),
            1
        );
    }

    #[test]
    fn test_builtin_backgrounds_are_deduplicated() {
        let script = SceneScript::builtin().unwrap();

        let backgrounds = script.backgrounds();

        assert_eq!(backgrounds.len(), 6);
        assert_eq!(
            backgrounds[0].as_str(),
            "https://i.postimg.cc/pTvxV6k6/1.png"
        );
    }

    #[test]
    fn test_from_scenes_rejects_empty_script() {
        let result = SceneScript::from_scenes(Vec::new());

        assert!(matches!(result, Err(ScriptError::NoScenes)));
    }

    #[test]
    fn test_from_scenes_rejects_target_past_last_scene() {
        // Arrange
        let scenes = vec![
            SceneRecord::new("a.png", "hello").with_choice("go", ChoiceTarget::Scene(2)),
            SceneRecord::new("b.png", "bye"),
        ];

        // Act
        let result = SceneScript::from_scenes(scenes);

        // Assert
        match result {
            Err(ScriptError::TargetOutOfRange {
                scene,
                choice,
                target,
                len,
            }) => {
                assert_eq!((scene, choice, target, len), (0, 0, 2, 2));
            }
            other => panic!("expected TargetOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_from_scenes_rejects_blank_choice_label() {
        let scenes =
            vec![SceneRecord::new("a.png", "").with_choice("  ", ChoiceTarget::ReturnToMenu)];

        let result = SceneScript::from_scenes(scenes);

        assert!(matches!(
            result,
            Err(ScriptError::EmptyChoiceLabel {
                scene: 0,
                choice: 0
            })
        ));
    }

    #[test]
    fn test_from_yaml_rejects_explicit_empty_choice_list() {
        let source = "scenes:\n  - background: a.png\n    text: hi\n    choices: []\n";

        let result = SceneScript::from_yaml(source);

        assert!(matches!(
            result,
            Err(ScriptError::EmptyChoiceList { scene: 0 })
        ));
    }

    #[test]
    fn test_from_yaml_rejects_unknown_fields() {
        let source = "scenes:\n  - background: a.png\n    speaker: rui\n";

        let result = SceneScript::from_yaml(source);

        assert!(matches!(result, Err(ScriptError::Parse(_))));
    }

    #[test]
    fn test_from_yaml_defaults_missing_text_to_empty() {
        let source = "scenes:\n  - background: a.png\n";

        let script = SceneScript::from_yaml(source).unwrap();

        assert_eq!(script.scene(0).unwrap().text, "");
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        // Arrange
        let first = SceneScript::from_scenes(vec![SceneRecord::new("a.png", "one")]).unwrap();
        let same = SceneScript::from_scenes(vec![SceneRecord::new("a.png", "one")]).unwrap();
        let other = SceneScript::from_scenes(vec![SceneRecord::new("a.png", "two")]).unwrap();

        // Assert
        assert_eq!(first.fingerprint(), same.fingerprint());
        assert_ne!(first.fingerprint(), other.fingerprint());
        assert_eq!(first.fingerprint().len(), 64);
    }
}
