//! Tokio tick source and the driver that serializes engine transitions.
//!
//! Each reveal gets its own spawned interval task that pushes
//! [`RevealTick`]s onto a shared unbounded channel. The driver owns both the
//! engine and the receiving end, so inputs and ticks are applied one at a
//! time from a single task and never race.

use std::sync::Arc;
use std::time::Duration;

use novella_core::command::Command;
use novella_core::scheduler::{RevealHandle, RevealId, RevealScheduler, RevealTick};
use novella_core::text_speed::TextSpeed;
use novella_script::SceneScript;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

use crate::domain::commands::DialogueInput;
use crate::domain::engine::DialogueEngine;
use crate::domain::events::Outcome;

/// Schedules reveals as tokio interval tasks.
#[derive(Debug, Clone)]
pub struct TokioRevealScheduler {
    ticks: mpsc::UnboundedSender<RevealTick>,
}

impl TokioRevealScheduler {
    /// Creates a scheduler and the receiver its ticks arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RevealTick>) {
        let (ticks, receiver) = mpsc::unbounded_channel();
        (Self { ticks }, receiver)
    }
}

impl RevealScheduler for TokioRevealScheduler {
    type Handle = TokioRevealHandle;

    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    fn schedule(&mut self, reveal: RevealId, interval: Duration) -> Self::Handle {
        let ticks = self.ticks.clone();
        let task = tokio::spawn(async move {
            let mut timer = time::interval_at(Instant::now() + interval, interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                if ticks.send(RevealTick { reveal }).is_err() {
                    break;
                }
            }
        });
        trace!(%reveal, ?interval, "reveal task spawned");
        TokioRevealHandle { task: Some(task) }
    }
}

/// Handle to a spawned reveal task. Aborts the task on cancel or drop.
#[derive(Debug)]
pub struct TokioRevealHandle {
    task: Option<JoinHandle<()>>,
}

impl RevealHandle for TokioRevealHandle {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_active(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for TokioRevealHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Owns a tokio-scheduled engine and its tick receiver.
#[derive(Debug)]
pub struct DialogueDriver {
    engine: DialogueEngine<TokioRevealScheduler>,
    ticks: mpsc::UnboundedReceiver<RevealTick>,
}

impl DialogueDriver {
    /// Creates a driver for a fresh, unarmed engine.
    #[must_use]
    pub fn new(script: Arc<SceneScript>, text_speed: TextSpeed) -> Self {
        let (scheduler, ticks) = TokioRevealScheduler::channel();
        Self {
            engine: DialogueEngine::new(script, scheduler, text_speed),
            ticks,
        }
    }

    /// The driven engine.
    #[must_use]
    pub fn engine(&self) -> &DialogueEngine<TokioRevealScheduler> {
        &self.engine
    }

    /// Mutable access for configuration such as text speed.
    pub fn engine_mut(&mut self) -> &mut DialogueEngine<TokioRevealScheduler> {
        &mut self.engine
    }

    /// Applies a player input.
    pub fn dispatch(&mut self, input: DialogueInput) -> Outcome {
        trace!(command_type = input.command_type(), "input dispatched");
        self.engine.handle(input)
    }

    /// Waits for the next tick and applies it.
    ///
    /// Cancel safe: dropping the future before it resolves loses no tick.
    /// Stale ticks from superseded reveals resolve to `Outcome::Ignored`.
    pub async fn next_tick(&mut self) -> Option<Outcome> {
        let tick = self.ticks.recv().await?;
        Some(self.engine.tick(tick.reveal))
    }
}

#[cfg(test)]
mod tests {
    use novella_script::SceneRecord;
    use tokio::time::timeout;

    use super::*;
    use crate::domain::engine::DialoguePhase;

    fn driver_for(texts: &[&str], millis: u64) -> DialogueDriver {
        let scenes = texts
            .iter()
            .map(|text| SceneRecord::new("bg.png", *text))
            .collect();
        let script = Arc::new(SceneScript::from_scenes(scenes).unwrap());
        DialogueDriver::new(script, TextSpeed::from_millis(millis).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_ticks_once_per_interval() {
        // Arrange
        let mut driver = driver_for(&["abc"], 70);
        let started = Instant::now();

        // Act
        driver.dispatch(DialogueInput::Advance);
        let mut observed = Vec::new();
        while driver.engine().is_revealing() {
            driver.next_tick().await;
            observed.push(driver.engine().revealed_text().to_owned());
        }

        // Assert
        assert_eq!(observed, vec!["a", "ab", "abc"]);
        assert_eq!(started.elapsed(), Duration::from_millis(210));
        assert_eq!(driver.engine().phase(), DialoguePhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skipping_mid_reveal_appends_nothing_afterwards() {
        // Arrange
        let mut driver = driver_for(&["0123456789", "next"], 70);
        driver.dispatch(DialogueInput::Advance);
        driver.next_tick().await;
        driver.next_tick().await;
        assert_eq!(driver.engine().revealed_text(), "01");

        // Act
        driver.dispatch(DialogueInput::Advance);

        // Assert
        let late = timeout(Duration::from_secs(5), driver.next_tick()).await;
        assert!(matches!(late, Err(_) | Ok(Some(Outcome::Ignored))));
        assert_eq!(driver.engine().revealed_text(), "0123456789");
        assert!(!driver.engine().is_revealing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_advances_keep_text_on_current_scene() {
        // Arrange
        let texts = ["abcdef", "uvwxyz", "ghijkl"];
        let mut driver = driver_for(&texts, 30);
        driver.dispatch(DialogueInput::Advance);
        driver.next_tick().await;

        // Let the first reveal's task push more ticks into the channel.
        time::advance(Duration::from_millis(95)).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        // Act
        for _ in 0..4 {
            driver.dispatch(DialogueInput::Advance);
        }

        // Assert
        assert_eq!(driver.engine().current_index(), 2);
        while driver.engine().is_revealing() {
            driver.next_tick().await;
            assert!(texts[2].starts_with(driver.engine().revealed_text()));
        }
        assert_eq!(driver.engine().revealed_text(), "ghijkl");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent_and_silences_the_task() {
        // Arrange
        let (mut scheduler, mut ticks) = TokioRevealScheduler::channel();
        let mut handle = scheduler.schedule(RevealId(1), Duration::from_millis(10));
        assert!(handle.is_active());

        // Act
        handle.cancel();
        handle.cancel();

        // Assert
        assert!(!handle.is_active());
        let received = timeout(Duration::from_secs(1), ticks.recv()).await;
        assert!(received.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_ticks() {
        let (mut scheduler, mut ticks) = TokioRevealScheduler::channel();
        let handle = scheduler.schedule(RevealId(7), Duration::from_millis(10));

        let first = ticks.recv().await;
        drop(handle);

        assert_eq!(first, Some(RevealTick { reveal: RevealId(7) }));
        // Drain anything sent before the abort landed.
        while let Ok(Some(_)) = timeout(Duration::from_millis(1), ticks.recv()).await {}
        let later = timeout(Duration::from_secs(1), ticks.recv()).await;
        assert!(later.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_scene_never_schedules_a_tick() {
        let mut driver = driver_for(&["", "b"], 70);

        driver.dispatch(DialogueInput::Advance);

        assert_eq!(driver.engine().phase(), DialoguePhase::Idle);
        let tick = timeout(Duration::from_secs(1), driver.next_tick()).await;
        assert!(tick.is_err());
    }
}
