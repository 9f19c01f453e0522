//! The dialogue state machine.

use std::fmt;
use std::sync::Arc;

use novella_core::scheduler::{RevealHandle, RevealId, RevealScheduler};
use novella_core::text_speed::TextSpeed;
use novella_script::{ChoiceTarget, SceneRecord, SceneScript};
use serde::Serialize;
use tracing::{debug, info, instrument, trace};
use uuid::Uuid;

use super::commands::DialogueInput;
use super::events::{EngineSignal, Outcome};
use super::typewriter::Typewriter;

/// Observable phase of the engine, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialoguePhase {
    /// Waiting for the arming input.
    NotStarted,
    /// A reveal timer is running for the current scene.
    Revealing,
    /// The current line is fully shown.
    Idle,
    /// The current scene offers choices; only a selection leaves it.
    AtChoice,
    /// The last scene was advanced past.
    Finished,
}

/// Read-only snapshot of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineState {
    /// Index of the current scene.
    pub current_index: usize,
    /// Visible prefix of the current scene's text.
    pub revealed_text: String,
    /// Whether a reveal timer is active.
    pub is_revealing: bool,
    /// Whether the arming input has been received.
    pub has_started: bool,
    /// Derived phase.
    pub phase: DialoguePhase,
}

struct ActiveReveal<H> {
    id: RevealId,
    handle: H,
}

/// Walks a scene script in response to player input.
///
/// The engine owns at most one reveal handle. Every transition cancels
/// that handle before touching the index or the typewriter, and ticks
/// carrying any other [`RevealId`] are dropped, so text from a superseded
/// scene can never land on the current one.
pub struct DialogueEngine<S: RevealScheduler> {
    id: Uuid,
    script: Arc<SceneScript>,
    scheduler: S,
    text_speed: TextSpeed,
    current_index: usize,
    typewriter: Typewriter,
    has_started: bool,
    finished: bool,
    last_reveal: RevealId,
    active: Option<ActiveReveal<S::Handle>>,
}

impl<S: RevealScheduler> DialogueEngine<S> {
    /// Creates an engine positioned on the first scene, not yet armed.
    #[must_use]
    pub fn new(script: Arc<SceneScript>, scheduler: S, text_speed: TextSpeed) -> Self {
        Self {
            id: Uuid::new_v4(),
            script,
            scheduler,
            text_speed,
            current_index: 0,
            typewriter: Typewriter::default(),
            has_started: false,
            finished: false,
            last_reveal: RevealId(0),
            active: None,
        }
    }

    /// Engine instance identifier, used in log fields.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The script this engine walks.
    #[must_use]
    pub fn script(&self) -> &SceneScript {
        &self.script
    }

    /// Index of the current scene.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The current scene.
    #[must_use]
    pub fn current_scene(&self) -> &SceneRecord {
        &self.script.scenes()[self.current_index]
    }

    /// Visible prefix of the current scene's text.
    #[must_use]
    pub fn revealed_text(&self) -> &str {
        self.typewriter.revealed()
    }

    /// Whether a reveal timer is active.
    #[must_use]
    pub fn is_revealing(&self) -> bool {
        self.active.is_some()
    }

    /// Whether the arming input has been received.
    #[must_use]
    pub fn has_started(&self) -> bool {
        self.has_started
    }

    /// The reveal currently allowed to tick, if any.
    #[must_use]
    pub fn active_reveal(&self) -> Option<RevealId> {
        self.active.as_ref().map(|active| active.id)
    }

    /// Speed the next reveal will use.
    #[must_use]
    pub fn text_speed(&self) -> TextSpeed {
        self.text_speed
    }

    /// Changes the speed for reveals started after this call. A reveal that
    /// is already running keeps its interval.
    pub fn set_text_speed(&mut self, text_speed: TextSpeed) {
        self.text_speed = text_speed;
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> DialoguePhase {
        if self.finished {
            DialoguePhase::Finished
        } else if !self.has_started {
            DialoguePhase::NotStarted
        } else if self.current_scene().has_choices() {
            DialoguePhase::AtChoice
        } else if self.active.is_some() {
            DialoguePhase::Revealing
        } else {
            DialoguePhase::Idle
        }
    }

    /// Snapshot of the engine state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        EngineState {
            current_index: self.current_index,
            revealed_text: self.typewriter.revealed().to_owned(),
            is_revealing: self.is_revealing(),
            has_started: self.has_started,
            phase: self.phase(),
        }
    }

    /// Routes a player input to the matching transition.
    pub fn handle(&mut self, input: DialogueInput) -> Outcome {
        match input {
            DialogueInput::Advance => self.advance(),
            DialogueInput::Rewind => self.rewind(),
            DialogueInput::SelectChoice(target) => self.select_choice(target),
        }
    }

    /// Primary action.
    ///
    /// Arms the engine on first use, completes a running reveal, or moves
    /// to the next scene. Advancing from the last scene finishes the
    /// dialogue and yields [`EngineSignal::Completed`] exactly once.
    #[instrument(skip(self), fields(engine_id = %self.id, index = self.current_index))]
    pub fn advance(&mut self) -> Outcome {
        match self.phase() {
            DialoguePhase::NotStarted => {
                self.has_started = true;
                info!("dialogue armed");
                self.start_reveal();
                Outcome::Changed
            }
            DialoguePhase::Revealing => {
                self.cancel_reveal();
                self.typewriter.finish();
                debug!("reveal skipped");
                Outcome::Changed
            }
            DialoguePhase::Idle if self.current_index < self.script.last_index() => {
                self.enter_scene(self.current_index + 1);
                Outcome::Changed
            }
            DialoguePhase::Idle => {
                self.cancel_reveal();
                self.finished = true;
                info!("dialogue completed");
                Outcome::Signal(EngineSignal::Completed)
            }
            phase @ (DialoguePhase::AtChoice | DialoguePhase::Finished) => {
                debug!(?phase, "advance ignored");
                Outcome::Ignored
            }
        }
    }

    /// Secondary action: restart the previous scene.
    #[instrument(skip(self), fields(engine_id = %self.id, index = self.current_index))]
    pub fn rewind(&mut self) -> Outcome {
        let phase = self.phase();
        let legal = matches!(phase, DialoguePhase::Idle | DialoguePhase::Revealing);
        if !legal || self.current_index == 0 {
            debug!(?phase, "rewind ignored");
            return Outcome::Ignored;
        }

        self.enter_scene(self.current_index - 1);
        Outcome::Changed
    }

    /// Applies a choice offered by the current scene.
    ///
    /// Targets the current scene does not offer are ignored. A menu-bound
    /// choice leaves the index untouched and yields
    /// [`EngineSignal::ReturnToMenu`].
    #[instrument(skip(self), fields(engine_id = %self.id, index = self.current_index))]
    pub fn select_choice(&mut self, target: ChoiceTarget) -> Outcome {
        if self.phase() != DialoguePhase::AtChoice {
            debug!("choice ignored outside a branch scene");
            return Outcome::Ignored;
        }
        if !self
            .current_scene()
            .choices
            .iter()
            .any(|choice| choice.target == target)
        {
            debug!("choice not offered by this scene");
            return Outcome::Ignored;
        }

        match target {
            ChoiceTarget::Scene(index) => {
                self.enter_scene(index);
                Outcome::Changed
            }
            ChoiceTarget::ReturnToMenu => {
                self.cancel_reveal();
                self.typewriter.finish();
                info!("menu choice selected");
                Outcome::Signal(EngineSignal::ReturnToMenu)
            }
        }
    }

    /// Timer callback: reveals one character of the active reveal.
    ///
    /// Ticks for any reveal other than the active one are ignored. The tick
    /// that reveals the last character also stops the timer.
    pub fn tick(&mut self, reveal: RevealId) -> Outcome {
        match &self.active {
            Some(active) if active.id == reveal => {}
            _ => {
                trace!(engine_id = %self.id, %reveal, "stale tick dropped");
                return Outcome::Ignored;
            }
        }

        self.typewriter.step();
        if self.typewriter.is_complete() {
            self.cancel_reveal();
            debug!(engine_id = %self.id, index = self.current_index, "reveal complete");
        }
        Outcome::Changed
    }

    /// Returns to the freshly created state, cancelling any reveal.
    pub fn reset(&mut self) {
        self.cancel_reveal();
        self.current_index = 0;
        self.typewriter = Typewriter::default();
        self.has_started = false;
        self.finished = false;
        debug!(engine_id = %self.id, "engine reset");
    }

    /// Stops the running reveal and leaves the visible text where it is.
    ///
    /// Used when the play screen starts fading out. Returns `true` if a
    /// reveal was running.
    pub fn halt_reveal(&mut self) -> bool {
        let running = self.active.is_some();
        self.cancel_reveal();
        if running {
            debug!(engine_id = %self.id, index = self.current_index, "reveal halted");
        }
        running
    }

    fn enter_scene(&mut self, index: usize) {
        self.cancel_reveal();
        self.current_index = index.min(self.script.last_index());
        info!(engine_id = %self.id, index = self.current_index, "scene entered");
        self.start_reveal();
    }

    fn start_reveal(&mut self) {
        self.cancel_reveal();
        self.typewriter = Typewriter::new(self.current_scene().text.clone());
        if self.typewriter.is_complete() {
            return;
        }

        let id = self.last_reveal.next();
        self.last_reveal = id;
        let handle = self.scheduler.schedule(id, self.text_speed.interval());
        self.active = Some(ActiveReveal { id, handle });
    }

    fn cancel_reveal(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.handle.cancel();
            trace!(engine_id = %self.id, reveal = %active.id, "reveal cancelled");
        }
    }
}

impl<S: RevealScheduler> fmt::Debug for DialogueEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogueEngine")
            .field("id", &self.id)
            .field("current_index", &self.current_index)
            .field("revealed", &self.typewriter.revealed())
            .field("has_started", &self.has_started)
            .field("finished", &self.finished)
            .field("active_reveal", &self.active_reveal())
            .finish_non_exhaustive()
    }
}

impl<S: RevealScheduler> Drop for DialogueEngine<S> {
    fn drop(&mut self) {
        self.cancel_reveal();
    }
}
