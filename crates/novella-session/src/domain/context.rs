//! The session context owned by the presentation shell.

use std::time::Duration;

use novella_core::clock::Clock;
use novella_core::text_speed::TextSpeed;
use serde::Serialize;

use super::achievements::{AchievementId, Achievements};
use super::commands::{MenuAction, Modal, Screen, SessionEffect};
use super::save_slots::SaveSlots;
use super::settings::Settings;

/// Fade-out length before a screen swap.
pub const FADE_OUT: Duration = Duration::from_millis(700);
/// Pause on the black frame between fade-out and fade-in.
pub const FADE_HOLD: Duration = Duration::from_millis(100);
/// Fade-in length after a screen swap.
pub const FADE_IN: Duration = Duration::from_millis(700);
/// How long the achievement toast stays up.
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Asset preload counter shown on the intro overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreloadProgress {
    /// Assets loaded so far.
    pub loaded: usize,
    /// Assets to load.
    pub total: usize,
    /// Whether preloading has ended.
    pub finished: bool,
}

impl PreloadProgress {
    /// Whole-number percentage loaded.
    #[must_use]
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        self.loaded.min(self.total) * 100 / self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    FadingOut(Screen),
    FadingIn,
}

/// Session state outside the dialogue engine.
#[derive(Debug, Clone)]
pub struct SessionContext {
    screen: Screen,
    modal: Option<Modal>,
    intro_visible: bool,
    preload: PreloadProgress,
    transition: Option<Transition>,
    toast: Option<AchievementId>,
    settings: Settings,
    save_slots: SaveSlots,
    achievements: Achievements,
}

impl SessionContext {
    /// Creates a session on the intro overlay, waiting for `assets` to load.
    #[must_use]
    pub fn new(assets: usize, settings: Settings) -> Self {
        Self {
            screen: Screen::Menu,
            modal: None,
            intro_visible: true,
            preload: PreloadProgress {
                loaded: 0,
                total: assets,
                finished: false,
            },
            transition: None,
            toast: None,
            settings,
            save_slots: SaveSlots::default(),
            achievements: Achievements::default(),
        }
    }

    /// Current screen.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Current overlay.
    #[must_use]
    pub fn modal(&self) -> Option<Modal> {
        self.modal
    }

    /// Whether the intro overlay is up.
    #[must_use]
    pub fn intro_visible(&self) -> bool {
        self.intro_visible
    }

    /// Preload progress.
    #[must_use]
    pub fn preload(&self) -> PreloadProgress {
        self.preload
    }

    /// Whether a fade transition is running.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// The achievement currently announced by the toast.
    #[must_use]
    pub fn toast(&self) -> Option<AchievementId> {
        self.toast
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Save slots.
    #[must_use]
    pub fn save_slots(&self) -> &SaveSlots {
        &self.save_slots
    }

    /// Achievements.
    #[must_use]
    pub fn achievements(&self) -> &Achievements {
        &self.achievements
    }

    pub(crate) fn asset_loaded(&mut self) -> Vec<SessionEffect> {
        if !self.preload.finished {
            self.preload.loaded = (self.preload.loaded + 1).min(self.preload.total);
        }
        Vec::new()
    }

    /// A failed preload still unlocks the intro; missing images are the
    /// host's concern.
    pub(crate) fn finish_preload(&mut self) -> Vec<SessionEffect> {
        self.preload.finished = true;
        Vec::new()
    }

    pub(crate) fn dismiss_intro(&mut self) -> Vec<SessionEffect> {
        if !self.intro_visible || !self.preload.finished {
            return Vec::new();
        }
        self.intro_visible = false;
        vec![SessionEffect::IntroDismissed]
    }

    pub(crate) fn menu(&mut self, action: MenuAction) -> Vec<SessionEffect> {
        match action {
            MenuAction::Transition(Screen::Playing) => self.navigate(Screen::Playing),
            MenuAction::Transition(screen) => self.show(screen),
            MenuAction::OpenModal(modal) => self.open_modal(modal),
            MenuAction::Exit => self.reset(),
        }
    }

    pub(crate) fn show(&mut self, screen: Screen) -> Vec<SessionEffect> {
        if self.screen == screen || self.is_transitioning() {
            return Vec::new();
        }
        self.enter(screen)
    }

    pub(crate) fn navigate(&mut self, screen: Screen) -> Vec<SessionEffect> {
        if self.screen == screen || self.is_transitioning() {
            return Vec::new();
        }
        self.transition = Some(Transition::FadingOut(screen));
        vec![SessionEffect::FadeOutStarted(screen)]
    }

    pub(crate) fn switch_screen(&mut self) -> Vec<SessionEffect> {
        let Some(Transition::FadingOut(screen)) = self.transition else {
            return Vec::new();
        };
        self.transition = Some(Transition::FadingIn);
        self.enter(screen)
    }

    pub(crate) fn end_transition(&mut self) -> Vec<SessionEffect> {
        if self.transition != Some(Transition::FadingIn) {
            return Vec::new();
        }
        self.transition = None;
        vec![SessionEffect::TransitionEnded]
    }

    pub(crate) fn open_modal(&mut self, modal: Modal) -> Vec<SessionEffect> {
        if self.modal == Some(modal) {
            return Vec::new();
        }
        self.modal = Some(modal);
        vec![SessionEffect::ModalChanged(Some(modal))]
    }

    pub(crate) fn close_modal(&mut self) -> Vec<SessionEffect> {
        if self.modal.take().is_none() {
            return Vec::new();
        }
        vec![SessionEffect::ModalChanged(None)]
    }

    pub(crate) fn save_to_slot(&mut self, id: u8, clock: &dyn Clock) -> Vec<SessionEffect> {
        match self.save_slots.save(id, clock) {
            Some(timestamp) => vec![SessionEffect::SlotSaved { id, timestamp }],
            None => Vec::new(),
        }
    }

    pub(crate) fn set_volume(&mut self, volume: f32) -> Vec<SessionEffect> {
        self.settings.set_volume(volume);
        vec![SessionEffect::VolumeChanged(self.settings.effective_volume())]
    }

    pub(crate) fn toggle_mute(&mut self) -> Vec<SessionEffect> {
        self.settings.toggle_mute();
        vec![SessionEffect::VolumeChanged(self.settings.effective_volume())]
    }

    pub(crate) fn set_text_speed(&mut self, millis: u64) -> Vec<SessionEffect> {
        let speed = self.settings.set_text_speed(millis);
        vec![SessionEffect::TextSpeedChanged(speed)]
    }

    pub(crate) fn restore_default_settings(&mut self) -> Vec<SessionEffect> {
        self.settings.restore_defaults();
        vec![
            SessionEffect::VolumeChanged(self.settings.effective_volume()),
            SessionEffect::TextSpeedChanged(TextSpeed::DEFAULT),
        ]
    }

    pub(crate) fn complete_game(&mut self, clock: &dyn Clock) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        if self.achievements.unlock(AchievementId::FirstLove, clock) {
            self.toast = Some(AchievementId::FirstLove);
            effects.push(SessionEffect::AchievementUnlocked(AchievementId::FirstLove));
        }
        self.save_slots.reset();
        effects
    }

    pub(crate) fn hide_toast(&mut self) -> Vec<SessionEffect> {
        if self.toast.take().is_none() {
            return Vec::new();
        }
        vec![SessionEffect::ToastHidden]
    }

    fn enter(&mut self, screen: Screen) -> Vec<SessionEffect> {
        self.screen = screen;
        if screen == Screen::Playing {
            self.save_slots.reset();
        }
        vec![SessionEffect::ScreenChanged(screen)]
    }

    /// Exit: everything but the preload state and settings goes back to
    /// how it was at launch.
    fn reset(&mut self) -> Vec<SessionEffect> {
        self.screen = Screen::Menu;
        self.modal = None;
        self.toast = None;
        self.transition = None;
        self.achievements.clear();
        self.save_slots.reset();
        self.intro_visible = true;
        vec![SessionEffect::SessionReset]
    }
}
