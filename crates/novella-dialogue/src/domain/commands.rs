//! Inputs for the dialogue engine.

use novella_core::command::Command;
use novella_script::ChoiceTarget;

/// A player input the dialogue engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueInput {
    /// Primary action: arm, skip the reveal, or move to the next scene.
    Advance,
    /// Secondary action: go back one scene.
    Rewind,
    /// A choice hotspot was activated.
    SelectChoice(ChoiceTarget),
}

impl Command for DialogueInput {
    fn command_type(&self) -> &'static str {
        match self {
            Self::Advance => "dialogue.advance",
            Self::Rewind => "dialogue.rewind",
            Self::SelectChoice(_) => "dialogue.select_choice",
        }
    }
}
