//! Session-only save slots.
//!
//! Slots record that the player saved and when; nothing is written to disk
//! and no dialogue position is stored.

use novella_core::clock::Clock;
use serde::Serialize;

/// Number of save slots offered.
pub const SLOT_COUNT: usize = 3;

/// One save slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveSlot {
    /// 1-based slot number.
    pub id: u8,
    /// Whether the slot has been saved to.
    pub used: bool,
    /// Local wall-clock time of the save, `HH:MM:SS`.
    pub timestamp: Option<String>,
}

impl SaveSlot {
    fn empty(id: u8) -> Self {
        Self {
            id,
            used: false,
            timestamp: None,
        }
    }
}

/// The fixed set of save slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveSlots {
    slots: [SaveSlot; SLOT_COUNT],
}

impl Default for SaveSlots {
    fn default() -> Self {
        Self {
            slots: [SaveSlot::empty(1), SaveSlot::empty(2), SaveSlot::empty(3)],
        }
    }
}

impl SaveSlots {
    /// All slots in id order.
    #[must_use]
    pub fn slots(&self) -> &[SaveSlot] {
        &self.slots
    }

    /// Marks slot `id` as used and stamps it. Returns the stamp, or `None`
    /// for an unknown slot id.
    pub fn save(&mut self, id: u8, clock: &dyn Clock) -> Option<String> {
        let slot = self.slots.iter_mut().find(|slot| slot.id == id)?;
        let stamp = clock.now().format("%H:%M:%S").to_string();
        slot.used = true;
        slot.timestamp = Some(stamp.clone());
        Some(stamp)
    }

    /// Clears every slot.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use novella_test_support::FixedClock;

    use super::*;

    #[test]
    fn test_save_stamps_slot_with_clock_time() {
        // Arrange
        let clock = FixedClock(Local.with_ymd_and_hms(2025, 12, 24, 9, 5, 7).unwrap());
        let mut slots = SaveSlots::default();

        // Act
        let stamp = slots.save(2, &clock);

        // Assert
        assert_eq!(stamp.as_deref(), Some("09:05:07"));
        assert!(slots.slots()[1].used);
        assert!(!slots.slots()[0].used);
        assert!(!slots.slots()[2].used);
    }

    #[test]
    fn test_save_to_unknown_slot_changes_nothing() {
        let clock = FixedClock(Local.with_ymd_and_hms(2025, 12, 24, 9, 5, 7).unwrap());
        let mut slots = SaveSlots::default();

        assert_eq!(slots.save(4, &clock), None);
        assert_eq!(slots, SaveSlots::default());
    }

    #[test]
    fn test_reset_clears_all_slots() {
        let clock = FixedClock(Local.with_ymd_and_hms(2025, 12, 24, 9, 5, 7).unwrap());
        let mut slots = SaveSlots::default();
        slots.save(1, &clock);
        slots.save(3, &clock);

        slots.reset();

        assert!(slots.slots().iter().all(|slot| !slot.used));
    }
}
