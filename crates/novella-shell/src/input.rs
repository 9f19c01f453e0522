//! Raw input: keys, pointer clicks, and the shell's line protocol.

use novella_dialogue::domain::commands::DialogueInput;
use novella_session::domain::commands::{MenuAction, Modal, Screen, SessionCommand};
use thiserror::Error;

use crate::presentation::Frame;

/// Keys the play screen listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Space bar.
    Space,
    /// Right arrow.
    ArrowRight,
    /// Left arrow.
    ArrowLeft,
}

/// In-game chrome buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameButton {
    /// Leave to the main menu.
    Back,
    /// Open the save modal.
    Save,
    /// Open the settings modal.
    Settings,
}

/// One interaction on the play screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayInput {
    /// A key press.
    Key(Key),
    /// A pointer click at (`x`, `y`) in percent of the background.
    Click {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
    },
    /// A chrome button was clicked.
    Button(GameButton),
}

/// What a play-screen interaction resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayAction {
    /// Feed the dialogue engine.
    Dialogue(DialogueInput),
    /// Handle a chrome button.
    Button(GameButton),
}

/// Resolves an interaction against the frame currently on screen.
///
/// A click that lands on a hotspot selects that choice and does not also
/// advance; chrome buttons never advance.
#[must_use]
pub fn interpret(input: PlayInput, frame: &Frame) -> PlayAction {
    match input {
        PlayInput::Key(Key::Space | Key::ArrowRight) => {
            PlayAction::Dialogue(DialogueInput::Advance)
        }
        PlayInput::Key(Key::ArrowLeft) => PlayAction::Dialogue(DialogueInput::Rewind),
        PlayInput::Click { x, y } => match frame.hotspot_at(x, y) {
            Some(spot) => PlayAction::Dialogue(DialogueInput::SelectChoice(spot.target)),
            None => PlayAction::Dialogue(DialogueInput::Advance),
        },
        PlayInput::Button(button) => PlayAction::Button(button),
    }
}

/// A parsed line of shell input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShellLine {
    /// An interaction on the play screen.
    Play(PlayInput),
    /// A menu, modal or settings command.
    Session(SessionCommand),
    /// Leave the shell.
    Quit,
}

/// A line the shell could not understand.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The first word is not a known command.
    #[error("unknown command `{0}`")]
    Unknown(String),

    /// An argument is missing or malformed.
    #[error("`{command}` expects {expected}")]
    BadArgument {
        /// The command word.
        command: String,
        /// Description of the expected argument.
        expected: &'static str,
    },
}

/// Parses one line of shell input.
///
/// # Errors
///
/// Returns `InputError` for unknown commands or malformed arguments.
pub fn parse_line(line: &str) -> Result<ShellLine, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(ShellLine::Play(PlayInput::Key(Key::Space)));
    };
    let command = command.to_ascii_lowercase();

    let parsed = match command.as_str() {
        "space" | "next" => ShellLine::Play(PlayInput::Key(Key::Space)),
        "right" => ShellLine::Play(PlayInput::Key(Key::ArrowRight)),
        "left" | "prev" => ShellLine::Play(PlayInput::Key(Key::ArrowLeft)),
        "click" => {
            let x = words.next().map(str::parse::<f32>);
            let y = words.next().map(str::parse::<f32>);
            match (x, y) {
                (None, None) => ShellLine::Play(PlayInput::Click { x: 50.0, y: 50.0 }),
                (Some(Ok(x)), Some(Ok(y))) => ShellLine::Play(PlayInput::Click { x, y }),
                _ => return Err(bad_argument(&command, "two percentages, e.g. `click 50 45`")),
            }
        }
        "back" => ShellLine::Play(PlayInput::Button(GameButton::Back)),
        "save" => ShellLine::Play(PlayInput::Button(GameButton::Save)),
        "settings" => ShellLine::Play(PlayInput::Button(GameButton::Settings)),
        "intro" => ShellLine::Session(SessionCommand::DismissIntro),
        "start" => menu(MenuAction::Transition(Screen::Playing)),
        "load" => menu(MenuAction::Transition(Screen::Load)),
        "help" => menu(MenuAction::OpenModal(Modal::Help)),
        "options" => menu(MenuAction::OpenModal(Modal::Settings)),
        "achievements" => menu(MenuAction::OpenModal(Modal::Achievements)),
        "exit" => menu(MenuAction::Exit),
        "continue" => ShellLine::Session(SessionCommand::Navigate(Screen::Playing)),
        "close" => ShellLine::Session(SessionCommand::CloseModal),
        "slot" => {
            let id = words
                .next()
                .and_then(|raw| raw.parse::<u8>().ok())
                .ok_or_else(|| bad_argument(&command, "a slot number"))?;
            ShellLine::Session(SessionCommand::SaveToSlot(id))
        }
        "volume" => {
            let volume = words
                .next()
                .and_then(|raw| raw.parse::<f32>().ok())
                .ok_or_else(|| bad_argument(&command, "a number between 0 and 1"))?;
            ShellLine::Session(SessionCommand::SetVolume(volume))
        }
        "mute" => ShellLine::Session(SessionCommand::ToggleMute),
        "speed" => {
            let millis = words
                .next()
                .and_then(|raw| raw.parse::<u64>().ok())
                .ok_or_else(|| bad_argument(&command, "milliseconds per character"))?;
            ShellLine::Session(SessionCommand::SetTextSpeed(millis))
        }
        "defaults" => ShellLine::Session(SessionCommand::RestoreDefaultSettings),
        "quit" => ShellLine::Quit,
        _ => return Err(InputError::Unknown(command)),
    };
    Ok(parsed)
}

fn menu(action: MenuAction) -> ShellLine {
    ShellLine::Session(SessionCommand::Menu(action))
}

fn bad_argument(command: &str, expected: &'static str) -> InputError {
    InputError::BadArgument {
        command: command.to_owned(),
        expected,
    }
}
