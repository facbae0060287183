//! Lifetime player profile: history, achievements, counters and streak.
//!
//! Recording a finished test is a pure update on this struct; writing it
//! to disk is the store's job.

use tracing::info;

use crate::clock::CivilDate;
use crate::types::{Achievement, AchievementId, Difficulty, SessionResult, TypingHistoryEntry};

/// WPM needed for Speed Demon.
const SPEED_DEMON_WPM: u64 = 50;
/// Completed tests needed for Persistent.
const PERSISTENT_TESTS: u64 = 5;
/// Lifetime characters needed for Keyboard Warrior.
const KEYBOARD_WARRIOR_CHARS: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub history: Vec<TypingHistoryEntry>,
    pub achievements: Vec<Achievement>,
    pub total_characters_typed: u64,
    pub streak_days: u32,
    /// Last UTC day a test was completed.
    pub last_test_date: Option<CivilDate>,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            history: Vec::new(),
            achievements: Achievement::catalog(),
            total_characters_typed: 0,
            streak_days: 0,
            last_test_date: None,
        }
    }
}

impl Profile {
    /// Record a finished test completed at `date_ms` on day `today`.
    ///
    /// Returns the achievements unlocked by this test.
    pub fn record(
        &mut self,
        result: &SessionResult,
        difficulty: Difficulty,
        date_ms: u64,
        today: CivilDate,
    ) -> Vec<AchievementId> {
        self.history.push(TypingHistoryEntry {
            date: date_ms,
            wpm: result.wpm,
            accuracy: result.accuracy,
            difficulty,
            quote_length: result.quote_length,
        });
        self.total_characters_typed += result.chars_typed as u64;

        let unlocked = self.update_achievements(result);
        self.update_streak(today);

        for id in &unlocked {
            info!(achievement = ?id, "achievement unlocked");
        }
        unlocked
    }

    fn update_achievements(&mut self, result: &SessionResult) -> Vec<AchievementId> {
        let wpm = u64::from(result.wpm);
        let total_chars = self.total_characters_typed;
        let mut unlocked = Vec::new();

        for achievement in self.achievements.iter_mut().filter(|a| !a.unlocked) {
            let reached = match achievement.id {
                AchievementId::FirstTest => true,
                AchievementId::SpeedDemon => {
                    let best = achievement.progress.unwrap_or(0).max(wpm);
                    achievement.progress = Some(best);
                    wpm >= SPEED_DEMON_WPM
                }
                AchievementId::AccuracyMaster => result.accuracy == 100,
                AchievementId::Persistent => {
                    let count = achievement.progress.unwrap_or(0) + 1;
                    achievement.progress = Some(count);
                    count >= PERSISTENT_TESTS
                }
                AchievementId::KeyboardWarrior => {
                    achievement.progress = Some(total_chars);
                    total_chars >= KEYBOARD_WARRIOR_CHARS
                }
            };
            if reached {
                achievement.unlocked = true;
                unlocked.push(achievement.id);
            }
        }

        unlocked
    }

    fn update_streak(&mut self, today: CivilDate) {
        if self.last_test_date == Some(today) {
            return;
        }
        self.streak_days = if self.last_test_date == Some(today.pred()) {
            self.streak_days + 1
        } else {
            1
        };
        self.last_test_date = Some(today);
    }

    // ------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------

    pub fn tests_completed(&self) -> usize {
        self.history.len()
    }

    /// Mean WPM over all tests, rounded. Zero with no history.
    pub fn average_wpm(&self) -> u32 {
        if self.history.is_empty() {
            return 0;
        }
        let sum: u64 = self.history.iter().map(|e| u64::from(e.wpm)).sum();
        (sum as f64 / self.history.len() as f64).round() as u32
    }

    pub fn best_wpm(&self) -> u32 {
        self.history.iter().map(|e| e.wpm).max().unwrap_or(0)
    }

    /// Up to `n` most recent tests, newest first.
    pub fn recent(&self, n: usize) -> Vec<&TypingHistoryEntry> {
        let mut entries: Vec<&TypingHistoryEntry> = self.history.iter().collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(n);
        entries
    }

    pub fn streak_label(&self) -> String {
        format!(
            "{} day{}",
            self.streak_days,
            if self.streak_days == 1 { "" } else { "s" }
        )
    }

    pub fn achievement(&self, id: AchievementId) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> CivilDate {
        s.parse().unwrap()
    }

    fn result(wpm: u32, accuracy: u32, chars: usize) -> SessionResult {
        SessionResult {
            wpm,
            accuracy,
            chars_typed: chars,
            quote_length: chars,
            elapsed_ms: 30_000,
        }
    }

    fn record(profile: &mut Profile, r: SessionResult, today: &str) -> Vec<AchievementId> {
        profile.record(&r, Difficulty::Medium, 0, day(today))
    }

    #[test]
    fn first_test_unlocks_first_steps() {
        let mut profile = Profile::default();
        let unlocked = record(&mut profile, result(30, 90, 100), "2026-10-18");
        assert_eq!(unlocked, vec![AchievementId::FirstTest]);
        assert_eq!(profile.tests_completed(), 1);
        assert_eq!(profile.total_characters_typed, 100);
    }

    #[test]
    fn first_steps_only_unlocks_once() {
        let mut profile = Profile::default();
        record(&mut profile, result(30, 90, 100), "2026-10-18");
        let unlocked = record(&mut profile, result(30, 90, 100), "2026-10-18");
        assert!(!unlocked.contains(&AchievementId::FirstTest));
    }

    #[test]
    fn speed_demon_tracks_best_and_unlocks_at_50() {
        let mut profile = Profile::default();
        record(&mut profile, result(42, 90, 10), "2026-10-18");
        record(&mut profile, result(35, 90, 10), "2026-10-18");
        let speed = profile.achievement(AchievementId::SpeedDemon).unwrap();
        assert_eq!(speed.progress, Some(42));
        assert!(!speed.unlocked);

        let unlocked = record(&mut profile, result(50, 90, 10), "2026-10-18");
        assert!(unlocked.contains(&AchievementId::SpeedDemon));
    }

    #[test]
    fn perfect_accuracy_unlocks_accuracy_master() {
        let mut profile = Profile::default();
        let unlocked = record(&mut profile, result(20, 100, 10), "2026-10-18");
        assert!(unlocked.contains(&AchievementId::AccuracyMaster));
    }

    #[test]
    fn persistent_unlocks_on_fifth_test() {
        let mut profile = Profile::default();
        for _ in 0..4 {
            let unlocked = record(&mut profile, result(20, 90, 10), "2026-10-18");
            assert!(!unlocked.contains(&AchievementId::Persistent));
        }
        let unlocked = record(&mut profile, result(20, 90, 10), "2026-10-18");
        assert!(unlocked.contains(&AchievementId::Persistent));
        assert_eq!(profile.achievement(AchievementId::Persistent).unwrap().progress, Some(5));
    }

    #[test]
    fn keyboard_warrior_follows_lifetime_characters() {
        let mut profile = Profile::default();
        record(&mut profile, result(20, 90, 600), "2026-10-18");
        assert_eq!(
            profile.achievement(AchievementId::KeyboardWarrior).unwrap().progress,
            Some(600)
        );
        let unlocked = record(&mut profile, result(20, 90, 400), "2026-10-18");
        assert!(unlocked.contains(&AchievementId::KeyboardWarrior));
    }

    #[test]
    fn streak_starts_continues_and_resets() {
        let mut profile = Profile::default();
        record(&mut profile, result(20, 90, 10), "2026-10-16");
        assert_eq!(profile.streak_days, 1);

        record(&mut profile, result(20, 90, 10), "2026-10-17");
        assert_eq!(profile.streak_days, 2);

        // Same day does not double count
        record(&mut profile, result(20, 90, 10), "2026-10-17");
        assert_eq!(profile.streak_days, 2);

        // Gap resets
        record(&mut profile, result(20, 90, 10), "2026-10-20");
        assert_eq!(profile.streak_days, 1);
        assert_eq!(profile.last_test_date, Some(day("2026-10-20")));
    }

    #[test]
    fn streak_continues_across_month_end() {
        let mut profile = Profile::default();
        record(&mut profile, result(20, 90, 10), "2026-09-30");
        record(&mut profile, result(20, 90, 10), "2026-10-01");
        assert_eq!(profile.streak_days, 2);
    }

    #[test]
    fn statistics_summarize_history() {
        let mut profile = Profile::default();
        assert_eq!(profile.average_wpm(), 0);
        for (i, wpm) in [40, 51, 60].into_iter().enumerate() {
            profile.record(&result(wpm, 90, 10), Difficulty::Easy, i as u64, day("2026-10-18"));
        }
        assert_eq!(profile.average_wpm(), 50);
        assert_eq!(profile.best_wpm(), 60);

        let recent = profile.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].wpm, 60);
        assert_eq!(recent[1].wpm, 51);
    }

    #[test]
    fn streak_label_pluralizes() {
        let mut profile = Profile::default();
        profile.streak_days = 1;
        assert_eq!(profile.streak_label(), "1 day");
        profile.streak_days = 3;
        assert_eq!(profile.streak_label(), "3 days");
    }
}
