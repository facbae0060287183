//! Text and JSON summaries of the player profile for the CLI.
//!
//! Pure functions: (Profile, OutputFormat) -> String. No I/O.

use serde::Serialize;

use crate::clock::CivilDate;
use crate::profile::Profile;
use crate::types::{Achievement, TypingHistoryEntry};

/// How many tests the recent list shows.
pub const RECENT_TESTS: usize = 10;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsJson<'a> {
    tests_completed: usize,
    average_wpm: u32,
    best_wpm: u32,
    streak_days: u32,
    last_test_date: Option<String>,
    total_characters_typed: u64,
    recent: Vec<&'a TypingHistoryEntry>,
}

/// Format overall statistics and the recent tests.
pub fn format_stats(profile: &Profile, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_stats_human(profile),
        OutputFormat::Json => to_json(&StatsJson {
            tests_completed: profile.tests_completed(),
            average_wpm: profile.average_wpm(),
            best_wpm: profile.best_wpm(),
            streak_days: profile.streak_days,
            last_test_date: profile.last_test_date.map(|d| d.to_string()),
            total_characters_typed: profile.total_characters_typed,
            recent: profile.recent(RECENT_TESTS),
        }),
    }
}

/// Format the achievement list.
pub fn format_achievements(profile: &Profile, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_achievements_human(&profile.achievements),
        OutputFormat::Json => to_json(&profile.achievements),
    }
}

/// Calendar date of a history entry.
pub fn entry_date(entry: &TypingHistoryEntry) -> CivilDate {
    CivilDate::from_epoch_millis(entry.date)
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn format_stats_human(profile: &Profile) -> String {
    let mut out = String::new();

    out.push_str("=== Typing Statistics ===\n");
    out.push_str(&format!("Tests completed:  {}\n", profile.tests_completed()));
    out.push_str(&format!("Average WPM:      {}\n", profile.average_wpm()));
    out.push_str(&format!("Best WPM:         {}\n", profile.best_wpm()));
    out.push_str(&format!("Streak:           {}\n", profile.streak_label()));
    out.push_str(&format!(
        "Characters typed: {}\n",
        profile.total_characters_typed
    ));
    out.push('\n');

    out.push_str("=== Recent Tests ===\n");
    let recent = profile.recent(RECENT_TESTS);
    if recent.is_empty() {
        out.push_str("No history yet\n");
        return out;
    }

    out.push_str(&format!(
        "{:<12}{:>6}{:>10}  {}\n",
        "Date", "WPM", "Accuracy", "Difficulty"
    ));
    for entry in recent {
        out.push_str(&format!(
            "{:<12}{:>6}{:>9}%  {}\n",
            entry_date(entry).to_string(),
            entry.wpm,
            entry.accuracy,
            entry.difficulty
        ));
    }

    out
}

fn format_achievements_human(achievements: &[Achievement]) -> String {
    let unlocked = achievements.iter().filter(|a| a.unlocked).count();
    let mut out = format!(
        "=== Achievements ({}/{}) ===\n",
        unlocked,
        achievements.len()
    );

    for a in achievements {
        let mark = if a.unlocked { "[x]" } else { "[ ]" };
        out.push_str(&format!("{} {} - {}", mark, a.name, a.description));
        if let (Some(progress), Some(goal)) = (a.progress, a.goal) {
            out.push_str(&format!(" ({}/{})", progress.min(goal), goal));
        }
        out.push('\n');
    }

    out
}

// ============================================================================
// JSON FORMAT
// ============================================================================

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}

// ============================================================================
// TESTS
// ============================================================================
