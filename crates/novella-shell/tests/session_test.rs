//! Menu, modal and settings behaviour through the shell.

mod common;

use std::time::Duration;

use novella_core::text_speed::TextSpeed;
use novella_session::domain::commands::{Modal, Screen};
use novella_shell::app::Flow;
use novella_shell::input::parse_line;
use tokio::time::Instant;

use common::{BRANCH_SCRIPT, finish_reveal, menu_app, playing_app, send, settle};

#[tokio::test(start_paused = true)]
async fn test_load_screen_round_trip() {
    // Arrange
    let mut app = menu_app(BRANCH_SCRIPT, 20).await;

    // Act
    send(&mut app, "load");
    let on_load = app.session().screen();
    send(&mut app, "back");

    // Assert
    assert_eq!(on_load, Screen::Load);
    assert_eq!(app.session().screen(), Screen::Menu);
    assert!(!app.view().transitioning);
}

#[tokio::test(start_paused = true)]
async fn test_load_slot_starts_play() {
    let mut app = menu_app(BRANCH_SCRIPT, 20).await;
    send(&mut app, "load");

    send(&mut app, "continue");
    settle(&mut app).await;

    assert_eq!(app.session().screen(), Screen::Playing);
}

#[tokio::test(start_paused = true)]
async fn test_clicking_a_load_slot_fades_into_play() {
    // Arrange
    let mut app = menu_app(BRANCH_SCRIPT, 20).await;
    send(&mut app, "load");

    // Act
    send(&mut app, "click 50 50");
    let fading = app.view().transitioning;
    settle(&mut app).await;

    // Assert
    assert!(fading);
    assert_eq!(app.session().screen(), Screen::Playing);
    assert!(!app.driver().engine().has_started());
}

#[tokio::test(start_paused = true)]
async fn test_speed_change_applies_to_next_reveal() {
    // Arrange
    let mut app = playing_app(BRANCH_SCRIPT, 20).await;
    send(&mut app, "settings");
    send(&mut app, "speed 100");
    send(&mut app, "close");

    // Act
    send(&mut app, "space");
    let started = Instant::now();
    finish_reveal(&mut app).await;

    // Assert
    assert_eq!(app.driver().engine().text_speed(), TextSpeed::from_millis(100).unwrap());
    assert_eq!(started.elapsed(), Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_save_modal_lists_stamped_slot() {
    // Arrange
    let mut app = playing_app(BRANCH_SCRIPT, 20).await;
    send(&mut app, "save");

    // Act
    send(&mut app, "slot 3");

    // Assert
    let view = app.view();
    assert_eq!(view.modal, Some(Modal::Save));
    let slots = view.slots.unwrap();
    assert!(slots[2].used);
    assert_eq!(slots[2].timestamp.as_deref(), Some("10:00:00"));
}

#[tokio::test(start_paused = true)]
async fn test_exit_brings_back_the_intro() {
    let mut app = menu_app(BRANCH_SCRIPT, 20).await;

    send(&mut app, "exit");

    assert!(app.view().intro.is_some());
    assert!(app.session().intro_visible());
}

#[tokio::test(start_paused = true)]
async fn test_view_serializes_for_the_terminal() {
    // Arrange
    let mut app = playing_app(BRANCH_SCRIPT, 20).await;
    send(&mut app, "space");

    // Act
    let encoded = serde_json::to_value(app.view()).unwrap();

    // Assert
    assert_eq!(encoded["screen"], "playing");
    assert_eq!(encoded["frame"]["background"], "hall.png");
    assert_eq!(encoded["frame"]["phase"], "revealing");
    assert!(encoded.get("intro").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_quit_stops_the_shell() {
    let mut app = menu_app(BRANCH_SCRIPT, 20).await;

    let flow = app.handle_line(parse_line("quit").unwrap());

    assert_eq!(flow, Flow::Quit);
}
