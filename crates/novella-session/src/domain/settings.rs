//! Player-adjustable settings.

use novella_core::text_speed::TextSpeed;
use serde::Serialize;

/// Default music volume.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Audio and text settings for the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Settings {
    volume: f32,
    muted: bool,
    text_speed: TextSpeed,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            muted: false,
            text_speed: TextSpeed::DEFAULT,
        }
    }
}

impl Settings {
    /// Creates settings with a starting text speed.
    #[must_use]
    pub fn with_text_speed(text_speed: TextSpeed) -> Self {
        Self {
            text_speed,
            ..Self::default()
        }
    }

    /// Slider volume in `[0.0, 1.0]`, independent of mute.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Whether audio is muted.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Volume actually applied to playback.
    #[must_use]
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Milliseconds per revealed character.
    #[must_use]
    pub fn text_speed(&self) -> TextSpeed {
        self.text_speed
    }

    /// Sets the volume, clamped to `[0.0, 1.0]`. NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_nan() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }

    /// Flips the mute flag and returns the new value.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Sets the text speed, clamped to the slider range.
    pub fn set_text_speed(&mut self, millis: u64) -> TextSpeed {
        self.text_speed = TextSpeed::clamped(millis);
        self.text_speed
    }

    /// Restores volume, mute and text speed defaults.
    pub fn restore_defaults(&mut self) {
        *self = Self::default();
    }
}
