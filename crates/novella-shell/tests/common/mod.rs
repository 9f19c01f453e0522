//! Shared helpers for shell integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chrono::TimeZone;
use novella_core::clock::Clock;
use novella_core::text_speed::TextSpeed;
use novella_script::SceneScript;
use novella_shell::app::App;
use novella_shell::input::parse_line;
use novella_test_support::FixedClock;

/// Four scenes with a branch on the third: `Stay` jumps to the last scene,
/// `Leave` returns to the menu.
pub const BRANCH_SCRIPT: &str = r#"
scenes:
  - background: "hall.png"
    text: "abc"
  - background: "hall.png"
    text: ""
  - background: "stairs.png"
    text: "?"
    choices:
      - label: "Stay"
        target: 3
      - label: "Leave"
  - background: "roof.png"
    text: "end"
"#;

/// Fixed timestamp used across the shell tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::Local.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Builds an app over `source` that is past the intro and on the menu.
pub async fn menu_app(source: &str, millis: u64) -> App {
    let script = Arc::new(SceneScript::from_yaml(source).unwrap());
    let mut app = App::new(script, TextSpeed::from_millis(millis).unwrap(), fixed_clock());
    app.preload(Path::new("/nonexistent")).await;
    send(&mut app, "intro");
    app
}

/// Builds an app already on the play screen.
pub async fn playing_app(source: &str, millis: u64) -> App {
    let mut app = menu_app(source, millis).await;
    send(&mut app, "start");
    settle(&mut app).await;
    app
}

/// Feeds one shell line.
pub fn send(app: &mut App, line: &str) {
    app.handle_line(parse_line(line).unwrap());
}

/// Runs every pending timer.
pub async fn settle(app: &mut App) {
    while app.next_deadline().is_some() {
        app.next_event().await;
    }
}

/// Applies reveal ticks until the current reveal ends.
pub async fn finish_reveal(app: &mut App) {
    while app.driver().engine().is_revealing() {
        app.next_event().await;
    }
}
