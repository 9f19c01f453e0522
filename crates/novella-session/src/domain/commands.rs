//! Commands and effects for the session context.

use novella_core::command::Command;
use novella_core::text_speed::TextSpeed;
use serde::Serialize;

use super::achievements::AchievementId;

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Title menu.
    Menu,
    /// The dialogue screen.
    Playing,
    /// The load screen.
    Load,
}

/// Overlay shown above the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Modal {
    /// Controls reference.
    Help,
    /// Volume and text speed.
    Settings,
    /// Achievement catalog.
    Achievements,
    /// Save slots.
    Save,
}

/// What a main-menu button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Go to another screen. `Playing` fades; other screens switch at once.
    Transition(Screen),
    /// Show an overlay.
    OpenModal(Modal),
    /// Reset the whole session back to the intro.
    Exit,
}

/// An input to the session context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCommand {
    /// One preloaded asset finished loading.
    AssetLoaded,
    /// Preloading ended, successfully or not.
    FinishPreload,
    /// Player clicked the intro overlay.
    DismissIntro,
    /// A main-menu button was pressed.
    Menu(MenuAction),
    /// Switch screens immediately.
    Show(Screen),
    /// Start a fade transition to a screen.
    Navigate(Screen),
    /// The fade-out finished; swap the screen.
    SwitchScreen,
    /// The fade-in finished.
    EndTransition,
    /// Show an overlay.
    OpenModal(Modal),
    /// Close the current overlay.
    CloseModal,
    /// Save to the numbered slot.
    SaveToSlot(u8),
    /// Move the volume slider.
    SetVolume(f32),
    /// Toggle mute.
    ToggleMute,
    /// Move the text speed slider (milliseconds per character).
    SetTextSpeed(u64),
    /// Reset settings to defaults.
    RestoreDefaultSettings,
    /// The dialogue reached its end.
    CompleteGame,
    /// Hide the achievement toast.
    HideToast,
}

impl Command for SessionCommand {
    fn command_type(&self) -> &'static str {
        match self {
            Self::AssetLoaded => "session.asset_loaded",
            Self::FinishPreload => "session.finish_preload",
            Self::DismissIntro => "session.dismiss_intro",
            Self::Menu(_) => "session.menu",
            Self::Show(_) => "session.show",
            Self::Navigate(_) => "session.navigate",
            Self::SwitchScreen => "session.switch_screen",
            Self::EndTransition => "session.end_transition",
            Self::OpenModal(_) => "session.open_modal",
            Self::CloseModal => "session.close_modal",
            Self::SaveToSlot(_) => "session.save_to_slot",
            Self::SetVolume(_) => "session.set_volume",
            Self::ToggleMute => "session.toggle_mute",
            Self::SetTextSpeed(_) => "session.set_text_speed",
            Self::RestoreDefaultSettings => "session.restore_default_settings",
            Self::CompleteGame => "session.complete_game",
            Self::HideToast => "session.hide_toast",
        }
    }
}

/// Something the host must react to after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// The intro closed; background music may start.
    IntroDismissed,
    /// A fade-out toward `Screen` began.
    FadeOutStarted(Screen),
    /// The visible screen changed.
    ScreenChanged(Screen),
    /// The fade-in finished; input is accepted again.
    TransitionEnded,
    /// The overlay changed.
    ModalChanged(Option<Modal>),
    /// A slot was saved.
    SlotSaved {
        /// Slot number.
        id: u8,
        /// Save time, `HH:MM:SS`.
        timestamp: String,
    },
    /// Playback volume changed.
    VolumeChanged(f32),
    /// Text speed changed; applies from the next reveal.
    TextSpeedChanged(TextSpeed),
    /// An achievement was unlocked for the first time; show the toast.
    AchievementUnlocked(AchievementId),
    /// The toast was hidden.
    ToastHidden,
    /// The session was reset to its initial state.
    SessionReset,
}
