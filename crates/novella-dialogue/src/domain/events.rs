//! Signals the dialogue engine raises for its host.

use novella_core::event::DomainEvent;
use serde::{Deserialize, Serialize};

/// A one-shot notification that the host must act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineSignal {
    /// The final scene was advanced past. Raised once per engine.
    Completed,
    /// A menu-bound choice was selected.
    ReturnToMenu,
}

impl DomainEvent for EngineSignal {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Completed => "dialogue.completed",
            Self::ReturnToMenu => "dialogue.return_to_menu",
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({ "event": self.event_type() })
    }
}

/// Result of feeding one input or tick to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The input was not legal in the current phase; nothing changed.
    Ignored,
    /// Engine state changed.
    Changed,
    /// Engine state changed and the host must handle a signal.
    Signal(EngineSignal),
}
