//! Command handlers for the session context.
//!
//! The shell routes every menu click, modal button and timer expiry through
//! [`handle_session_command`] and reacts to the returned effects.

use novella_core::clock::Clock;
use novella_core::command::Command;
use tracing::{debug, info, instrument};

use crate::domain::commands::{SessionCommand, SessionEffect};
use crate::domain::context::SessionContext;

/// Applies `command` to the session and returns what the host must do next.
///
/// Commands that are not valid in the current state return no effects.
#[instrument(skip(session, clock), fields(command_type = command.command_type()))]
pub fn handle_session_command(
    session: &mut SessionContext,
    command: SessionCommand,
    clock: &dyn Clock,
) -> Vec<SessionEffect> {
    let effects = match command {
        SessionCommand::AssetLoaded => session.asset_loaded(),
        SessionCommand::FinishPreload => session.finish_preload(),
        SessionCommand::DismissIntro => session.dismiss_intro(),
        SessionCommand::Menu(action) => session.menu(action),
        SessionCommand::Show(screen) => session.show(screen),
        SessionCommand::Navigate(screen) => session.navigate(screen),
        SessionCommand::SwitchScreen => session.switch_screen(),
        SessionCommand::EndTransition => session.end_transition(),
        SessionCommand::OpenModal(modal) => session.open_modal(modal),
        SessionCommand::CloseModal => session.close_modal(),
        SessionCommand::SaveToSlot(id) => session.save_to_slot(id, clock),
        SessionCommand::SetVolume(volume) => session.set_volume(volume),
        SessionCommand::ToggleMute => session.toggle_mute(),
        SessionCommand::SetTextSpeed(millis) => session.set_text_speed(millis),
        SessionCommand::RestoreDefaultSettings => session.restore_default_settings(),
        SessionCommand::CompleteGame => session.complete_game(clock),
        SessionCommand::HideToast => session.hide_toast(),
    };

    if effects.is_empty() {
        debug!("session command had no effect");
    }
    for effect in &effects {
        match effect {
            SessionEffect::SlotSaved { id, timestamp } => {
                info!(slot = id, %timestamp, "slot saved");
            }
            SessionEffect::AchievementUnlocked(achievement) => {
                info!(achievement = achievement.key(), "achievement unlocked");
            }
            SessionEffect::SessionReset => info!("session reset"),
            other => debug!(effect = ?other, "session effect"),
        }
    }
    effects
}
