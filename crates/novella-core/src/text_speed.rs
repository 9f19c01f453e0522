//! Per-character reveal interval.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Milliseconds between two revealed characters. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TextSpeed(u64);

impl TextSpeed {
    /// Speed used when nothing else is configured.
    pub const DEFAULT: Self = Self(70);
    /// Fastest speed offered by the settings slider.
    pub const FASTEST: Self = Self(10);
    /// Slowest speed offered by the settings slider.
    pub const SLOWEST: Self = Self(150);

    /// Creates a text speed from a millisecond interval.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `millis` is zero.
    pub fn from_millis(millis: u64) -> Result<Self, DomainError> {
        if millis == 0 {
            return Err(DomainError::Validation(
                "text speed must be a positive number of milliseconds".to_owned(),
            ));
        }
        Ok(Self(millis))
    }

    /// Clamps `millis` into the slider range.
    #[must_use]
    pub fn clamped(millis: u64) -> Self {
        Self(millis.clamp(Self::FASTEST.0, Self::SLOWEST.0))
    }

    /// Returns the interval in milliseconds.
    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Returns the interval as a `Duration`.
    #[must_use]
    pub fn interval(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for TextSpeed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u64> for TextSpeed {
    type Error = DomainError;

    fn try_from(millis: u64) -> Result<Self, Self::Error> {
        Self::from_millis(millis)
    }
}

impl From<TextSpeed> for u64 {
    fn from(speed: TextSpeed) -> Self {
        speed.0
    }
}
