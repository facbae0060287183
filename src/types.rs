//! Domain types for keystreak.
//!
//! Plain data shared by the session, profile, store and TUI layers.
//! Storage field names follow the camelCase keys the game has always
//! written, so histories from older installs keep loading.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// ENUMS
// ============================================================================

/// Quote length band a test is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Quotes shorter than 200 characters.
    Easy,
    /// Quotes of 200 to 399 characters.
    #[default]
    Medium,
    /// Quotes of 400 characters or more.
    Hard,
    /// Any quote, no length filter.
    Custom,
}

impl Difficulty {
    /// Levels offered in the settings panel, in display order.
    pub const SELECTABLE: [Difficulty; 3] =
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Custom => "custom",
        }
    }

    /// Whether a quote of `len` characters belongs to this band.
    pub fn accepts(self, len: usize) -> bool {
        match self {
            Difficulty::Easy => len < 200,
            Difficulty::Medium => (200..400).contains(&len),
            Difficulty::Hard => len >= 400,
            Difficulty::Custom => true,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "custom" => Ok(Difficulty::Custom),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// Colour theme names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    Blue,
    Red,
    Yellow,
    Green,
    Purple,
}

impl ThemeName {
    /// All themes in selector order.
    pub const ALL: [ThemeName; 7] = [
        ThemeName::Dark,
        ThemeName::Light,
        ThemeName::Blue,
        ThemeName::Red,
        ThemeName::Yellow,
        ThemeName::Green,
        ThemeName::Purple,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
            ThemeName::Blue => "blue",
            ThemeName::Red => "red",
            ThemeName::Yellow => "yellow",
            ThemeName::Green => "green",
            ThemeName::Purple => "purple",
        }
    }

    /// Position in [`ThemeName::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ThemeName::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown theme: {}", s.trim()))
    }
}

/// Stable identifiers of the achievement catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AchievementId {
    FirstTest,
    SpeedDemon,
    AccuracyMaster,
    Persistent,
    KeyboardWarrior,
}

// ============================================================================
// STRUCTS
// ============================================================================

/// One completed test, as kept in the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingHistoryEntry {
    /// Completion time, milliseconds since the Unix epoch.
    pub date: u64,
    pub wpm: u32,
    pub accuracy: u32,
    pub difficulty: Difficulty,
    /// Length of the quote in characters.
    pub quote_length: usize,
}

/// An achievement and the player's progress towards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<u64>,
}

impl Achievement {
    fn new(id: AchievementId, name: &str, description: &str, goal: Option<u64>) -> Self {
        Achievement {
            id,
            name: name.to_string(),
            description: description.to_string(),
            unlocked: false,
            progress: goal.map(|_| 0),
            goal,
        }
    }

    /// The fixed catalog, all locked.
    pub fn catalog() -> Vec<Achievement> {
        vec![
            Achievement::new(
                AchievementId::FirstTest,
                "First Steps",
                "Complete your first typing test",
                None,
            ),
            Achievement::new(AchievementId::SpeedDemon, "Speed Demon", "Reach 50 WPM", Some(50)),
            Achievement::new(
                AchievementId::AccuracyMaster,
                "Accuracy Master",
                "Complete a test with 100% accuracy",
                None,
            ),
            Achievement::new(
                AchievementId::Persistent,
                "Persistent",
                "Complete 5 typing tests",
                Some(5),
            ),
            Achievement::new(
                AchievementId::KeyboardWarrior,
                "Keyboard Warrior",
                "Type over 1000 characters",
                Some(1000),
            ),
        ]
    }

    /// Progress towards the goal in `0.0..=1.0`. None for one-shot achievements.
    pub fn progress_ratio(&self) -> Option<f64> {
        let goal = self.goal.filter(|&g| g > 0)?;
        let progress = self.progress?;
        Some((progress as f64 / goal as f64).min(1.0))
    }
}

/// Outcome of a finished typing session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub wpm: u32,
    pub accuracy: u32,
    /// Characters in the final input.
    pub chars_typed: usize,
    pub quote_length: usize,
    /// Elapsed time from first keystroke to finish.
    pub elapsed_ms: u64,
}

// ============================================================================
// TESTS
// ============================================================================
