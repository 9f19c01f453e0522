//! Achievement catalog and unlock state.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use novella_core::clock::Clock;
use serde::Serialize;

/// Every achievement the game can award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    /// Awarded for reaching the end of the story.
    FirstLove,
}

impl AchievementId {
    /// All achievements, in display order.
    pub const ALL: [Self; 1] = [Self::FirstLove];

    /// Stable identifier.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::FirstLove => "first_love",
        }
    }

    /// Display title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::FirstLove => "First Love",
        }
    }

    /// Display description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::FirstLove => "Reach the end of the confession.",
        }
    }
}

/// One catalog entry as shown in the achievements modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementView {
    /// Which achievement.
    pub id: AchievementId,
    /// Display title.
    pub title: &'static str,
    /// Display description.
    pub description: &'static str,
    /// When it was unlocked, if it was.
    pub unlocked_at: Option<DateTime<Local>>,
}

/// Unlocked achievements for this session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Achievements {
    unlocked: BTreeMap<AchievementId, DateTime<Local>>,
}

impl Achievements {
    /// Unlocks `id`. Returns `true` only the first time.
    pub fn unlock(&mut self, id: AchievementId, clock: &dyn Clock) -> bool {
        if self.unlocked.contains_key(&id) {
            return false;
        }
        self.unlocked.insert(id, clock.now());
        true
    }

    /// Whether `id` has been unlocked.
    #[must_use]
    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.contains_key(&id)
    }

    /// The full catalog with unlock state.
    #[must_use]
    pub fn catalog(&self) -> Vec<AchievementView> {
        AchievementId::ALL
            .iter()
            .map(|&id| AchievementView {
                id,
                title: id.title(),
                description: id.description(),
                unlocked_at: self.unlocked.get(&id).copied(),
            })
            .collect()
    }

    /// Locks everything again.
    pub fn clear(&mut self) {
        self.unlocked.clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use novella_test_support::FixedClock;

    use super::*;

    #[test]
    fn test_unlock_reports_only_first_unlock() {
        // Arrange
        let first = Local.with_ymd_and_hms(2025, 12, 24, 20, 0, 0).unwrap();
        let later = Local.with_ymd_and_hms(2025, 12, 25, 8, 0, 0).unwrap();
        let mut achievements = Achievements::default();

        // Act
        let unlocked_once = achievements.unlock(AchievementId::FirstLove, &FixedClock(first));
        let unlocked_twice = achievements.unlock(AchievementId::FirstLove, &FixedClock(later));

        // Assert
        assert!(unlocked_once);
        assert!(!unlocked_twice);
        assert_eq!(achievements.catalog()[0].unlocked_at, Some(first));
    }

    #[test]
    fn test_catalog_lists_locked_entries() {
        let achievements = Achievements::default();

        let catalog = achievements.catalog();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].id.key(), "first_love");
        assert_eq!(catalog[0].unlocked_at, None);
    }
}
