//! Shell application state: one dialogue driver, one session, two timers.
//!
//! Every input line, reveal tick and timer expiry is applied from the single
//! task that owns the [`App`], so engine and session transitions never
//! interleave.

use std::path::Path;
use std::sync::Arc;

use novella_core::clock::Clock;
use novella_core::event::DomainEvent;
use novella_core::text_speed::TextSpeed;
use novella_dialogue::application::runtime::DialogueDriver;
use novella_dialogue::domain::commands::DialogueInput;
use novella_dialogue::domain::events::{EngineSignal, Outcome};
use novella_script::SceneScript;
use novella_session::application::command_handlers::handle_session_command;
use novella_session::domain::achievements::{AchievementId, AchievementView};
use novella_session::domain::commands::{Modal, Screen, SessionCommand, SessionEffect};
use novella_session::domain::context::{
    FADE_HOLD, FADE_IN, FADE_OUT, SessionContext, TOAST_DURATION,
};
use novella_session::domain::save_slots::SaveSlot;
use novella_session::domain::settings::Settings;
use serde::Serialize;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use crate::input::{GameButton, PlayAction, PlayInput, ShellLine, interpret};
use crate::presentation::{Frame, render};

/// Whether the shell keeps running after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input.
    Continue,
    /// Leave the shell.
    Quit,
}

/// The intro overlay as shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntroView {
    /// Whole-number preload percentage.
    pub percent: usize,
    /// Whether the overlay accepts the dismiss click.
    pub ready: bool,
}

/// Everything on screen, written as one JSON line per change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View<'a> {
    /// Current screen.
    pub screen: Screen,
    /// Current overlay.
    pub modal: Option<Modal>,
    /// Intro overlay, while it is up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<IntroView>,
    /// Whether a fade is running.
    pub transitioning: bool,
    /// Title of the achievement being announced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toast: Option<&'static str>,
    /// Play screen contents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<Frame>,
    /// Settings, while the settings modal is open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<&'a Settings>,
    /// Save slots, while the save modal is open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<&'a [SaveSlot]>,
    /// Achievement catalog, while the achievements modal is open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<AchievementView>>,
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    command: SessionCommand,
}

/// The running shell.
pub struct App {
    driver: DialogueDriver,
    session: SessionContext,
    clock: Arc<dyn Clock>,
    transition: Option<Deadline>,
    toast: Option<Deadline>,
}

impl App {
    /// Creates the shell for `script`, starting on the intro overlay.
    #[must_use]
    pub fn new(script: Arc<SceneScript>, text_speed: TextSpeed, clock: Arc<dyn Clock>) -> Self {
        let assets = script.backgrounds().len();
        Self {
            driver: DialogueDriver::new(script, text_speed),
            session: SessionContext::new(assets, Settings::with_text_speed(text_speed)),
            clock,
            transition: None,
            toast: None,
        }
    }

    /// The dialogue driver.
    #[must_use]
    pub fn driver(&self) -> &DialogueDriver {
        &self.driver
    }

    /// The session context.
    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Checks every background under `root` and reports progress to the
    /// intro overlay. Missing images count as loaded; the engine never
    /// waits on them.
    pub async fn preload(&mut self, root: &Path) {
        let backgrounds: Vec<String> = self
            .driver
            .engine()
            .script()
            .backgrounds()
            .into_iter()
            .map(|image| image.as_str().to_owned())
            .collect();
        for background in backgrounds {
            if background.contains("://") {
                debug!(%background, "remote background left to the host");
                self.apply(SessionCommand::AssetLoaded);
                continue;
            }
            match tokio::fs::try_exists(root.join(&background)).await {
                Ok(true) => debug!(%background, "background found"),
                Ok(false) => warn!(%background, "background missing"),
                Err(e) => warn!(%background, error = %e, "background unreadable"),
            }
            self.apply(SessionCommand::AssetLoaded);
        }
        self.apply(SessionCommand::FinishPreload);
        info!(percent = self.session.preload().percent(), "preload finished");
    }

    /// Applies one parsed input line.
    pub fn handle_line(&mut self, line: ShellLine) -> Flow {
        match line {
            ShellLine::Quit => return Flow::Quit,
            ShellLine::Session(command) => self.apply(command),
            ShellLine::Play(input) => self.play(input),
        }
        Flow::Continue
    }

    /// Waits for the next reveal tick or timer expiry and applies it.
    ///
    /// Returns `true` if anything visible changed.
    pub async fn next_event(&mut self) -> bool {
        let deadline = self.next_deadline();
        tokio::select! {
            outcome = self.driver.next_tick() => {
                matches!(outcome, Some(Outcome::Changed))
            }
            () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                self.fire_due_timers(Instant::now());
                true
            }
        }
    }

    /// Applies every timer due at `now`.
    pub fn fire_due_timers(&mut self, now: Instant) {
        if let Some(deadline) = self.toast.filter(|d| d.at <= now) {
            self.toast = None;
            self.apply(deadline.command);
        }
        if let Some(deadline) = self.transition.filter(|d| d.at <= now) {
            self.transition = None;
            self.apply(deadline.command);
        }
    }

    /// The earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.transition, self.toast]
            .into_iter()
            .flatten()
            .map(|deadline| deadline.at)
            .min()
    }

    /// Snapshot of what the player sees.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        let session = &self.session;
        let preload = session.preload();
        let engine = self.driver.engine();
        View {
            screen: session.screen(),
            modal: session.modal(),
            intro: session.intro_visible().then_some(IntroView {
                percent: preload.percent(),
                ready: preload.finished,
            }),
            transitioning: session.is_transitioning(),
            toast: session.toast().map(AchievementId::title),
            frame: (session.screen() == Screen::Playing)
                .then(|| render(engine.current_scene(), &engine.state())),
            settings: (session.modal() == Some(Modal::Settings)).then(|| session.settings()),
            slots: (session.modal() == Some(Modal::Save)).then(|| session.save_slots().slots()),
            achievements: (session.modal() == Some(Modal::Achievements))
                .then(|| session.achievements().catalog()),
        }
    }

    fn play(&mut self, input: PlayInput) {
        let session = &self.session;
        if session.screen() == Screen::Load && session.modal().is_none() {
            match input {
                PlayInput::Button(GameButton::Back) => {
                    self.apply(SessionCommand::Show(Screen::Menu));
                }
                PlayInput::Click { .. } => self.apply(SessionCommand::Navigate(Screen::Playing)),
                PlayInput::Key(_) | PlayInput::Button(_) => {
                    debug!(?input, "input ignored on the load screen");
                }
            }
            return;
        }
        let accepting = session.screen() == Screen::Playing
            && session.modal().is_none()
            && !session.is_transitioning()
            && !session.intro_visible();
        if !accepting {
            debug!(?input, "play input ignored off the play screen");
            return;
        }

        let engine = self.driver.engine();
        let frame = render(engine.current_scene(), &engine.state());
        match interpret(input, &frame) {
            PlayAction::Dialogue(input) => self.dispatch(input),
            PlayAction::Button(GameButton::Back) => {
                self.apply(SessionCommand::Navigate(Screen::Menu));
            }
            PlayAction::Button(GameButton::Save) => {
                self.apply(SessionCommand::OpenModal(Modal::Save));
            }
            PlayAction::Button(GameButton::Settings) => {
                self.apply(SessionCommand::OpenModal(Modal::Settings));
            }
        }
    }

    fn dispatch(&mut self, input: DialogueInput) {
        let Outcome::Signal(signal) = self.driver.dispatch(input) else {
            return;
        };
        info!(signal = signal.event_type(), payload = %signal.to_payload(), "engine signal");
        if signal == EngineSignal::Completed {
            self.apply(SessionCommand::CompleteGame);
        }
        self.apply(SessionCommand::Navigate(Screen::Menu));
    }

    fn apply(&mut self, command: SessionCommand) {
        let was_playing = self.session.screen() == Screen::Playing;
        let effects = handle_session_command(&mut self.session, command, self.clock.as_ref());
        for effect in effects {
            self.react(effect, was_playing);
        }
    }

    fn react(&mut self, effect: SessionEffect, was_playing: bool) {
        let now = Instant::now();
        match effect {
            SessionEffect::FadeOutStarted(_) => {
                if was_playing {
                    self.driver.engine_mut().halt_reveal();
                }
                self.transition = Some(Deadline {
                    at: now + FADE_OUT,
                    command: SessionCommand::SwitchScreen,
                });
            }
            SessionEffect::ScreenChanged(screen) => {
                if screen == Screen::Playing || was_playing {
                    let speed = self.session.settings().text_speed();
                    let engine = self.driver.engine_mut();
                    engine.reset();
                    engine.set_text_speed(speed);
                }
                if self.session.is_transitioning() {
                    self.transition = Some(Deadline {
                        at: now + FADE_HOLD + FADE_IN,
                        command: SessionCommand::EndTransition,
                    });
                }
            }
            SessionEffect::TransitionEnded => self.transition = None,
            SessionEffect::TextSpeedChanged(speed) => {
                self.driver.engine_mut().set_text_speed(speed);
            }
            SessionEffect::AchievementUnlocked(_) => {
                self.toast = Some(Deadline {
                    at: now + TOAST_DURATION,
                    command: SessionCommand::HideToast,
                });
            }
            SessionEffect::ToastHidden => self.toast = None,
            SessionEffect::SessionReset => {
                self.driver.engine_mut().reset();
                self.transition = None;
                self.toast = None;
            }
            SessionEffect::IntroDismissed => info!("intro dismissed, music starts"),
            SessionEffect::VolumeChanged(volume) => debug!(volume, "playback volume"),
            SessionEffect::ModalChanged(_) | SessionEffect::SlotSaved { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{Local, TimeZone};
    use novella_dialogue::domain::engine::DialoguePhase;
    use novella_session::domain::commands::MenuAction;
    use novella_test_support::FixedClock;

    use super::*;
    use crate::input::{Key, parse_line};

    fn app() -> App {
        let script = Arc::new(SceneScript::builtin().unwrap());
        let clock = Arc::new(FixedClock(
            Local.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        ));
        App::new(script, TextSpeed::from_millis(10).unwrap(), clock)
    }

    async fn settle(app: &mut App) {
        while app.next_deadline().is_some() {
            app.next_event().await;
        }
    }

    async fn playing_app() -> App {
        let mut app = app();
        app.preload(Path::new("/nonexistent")).await;
        app.handle_line(ShellLine::Session(SessionCommand::DismissIntro));
        app.handle_line(ShellLine::Session(SessionCommand::Menu(
            MenuAction::Transition(Screen::Playing),
        )));
        settle(&mut app).await;
        app
    }

    fn press(app: &mut App, line: &str) {
        let line = parse_line(line).unwrap();
        app.handle_line(line);
    }

    #[tokio::test(start_paused = true)]
    async fn test_preload_unlocks_intro_even_with_missing_images() {
        // Arrange
        let mut app = app();

        // Act
        app.preload(Path::new("/nonexistent")).await;

        // Assert
        let intro = app.view().intro.unwrap();
        assert_eq!(intro.percent, 100);
        assert!(intro.ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_fades_into_play_screen() {
        // Arrange
        let mut app = app();
        app.preload(Path::new("/nonexistent")).await;
        press(&mut app, "intro");
        let started = Instant::now();

        // Act
        press(&mut app, "start");
        assert!(app.view().transitioning);
        settle(&mut app).await;

        // Assert
        assert_eq!(app.session().screen(), Screen::Playing);
        assert!(!app.view().transitioning);
        assert_eq!(started.elapsed(), FADE_OUT + FADE_HOLD + FADE_IN);
        let frame = app.view().frame.unwrap();
        assert_eq!(frame.phase, DialoguePhase::NotStarted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_input_ignored_while_modal_open() {
        // Arrange
        let mut app = playing_app().await;
        press(&mut app, "save");

        // Act
        press(&mut app, "space");

        // Assert
        assert_eq!(app.session().modal(), Some(Modal::Save));
        assert!(!app.driver().engine().has_started());
    }

    #[tokio::test(start_paused = true)]
    async fn test_menu_choice_returns_to_menu() {
        // Arrange
        let mut app = playing_app().await;
        for _ in 0..9 {
            press(&mut app, "space");
        }
        assert_eq!(app.driver().engine().phase(), DialoguePhase::AtChoice);

        // Act
        press(&mut app, "click 60 58");
        settle(&mut app).await;

        // Assert
        assert_eq!(app.session().screen(), Screen::Menu);
        assert!(!app.driver().engine().has_started());
        assert!(!app.session().achievements().is_unlocked(AchievementId::FirstLove));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completing_the_story_unlocks_achievement_and_toast_expires() {
        // Arrange
        let mut app = playing_app().await;
        for _ in 0..9 {
            press(&mut app, "space");
        }
        press(&mut app, "click 60 45");
        assert_eq!(app.driver().engine().current_index(), 5);

        // Act
        for _ in 0..6 {
            app.handle_line(ShellLine::Play(PlayInput::Key(Key::ArrowRight)));
        }

        // Assert
        assert_eq!(app.view().toast, Some("First Love"));
        assert!(app.session().achievements().is_unlocked(AchievementId::FirstLove));
        settle(&mut app).await;
        assert_eq!(app.session().screen(), Screen::Menu);
        assert_eq!(app.view().toast, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_ticks_show_up_in_frames() {
        // Arrange
        let mut app = playing_app().await;
        press(&mut app, "space");

        // Act
        let changed = tokio::time::timeout(Duration::from_secs(1), app.next_event())
            .await
            .unwrap();

        // Assert
        assert!(changed);
        let text = app.view().frame.unwrap().text.unwrap();
        assert_eq!(text.chars().count(), 1);
    }
}
