//! Local persistence: a directory of small per-key files.
//!
//! Each key the game stores (history, achievements, counters, last test
//! date, theme) lives in its own file under the data directory. Lists are
//! JSON, scalars are plain text.
//!
//! Structure:
//! - `Store`: raw key/value access (effects)
//! - `load_profile` / `save_profile`: typed mapping with best-effort parsing

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::clock::CivilDate;
use crate::profile::Profile;
use crate::types::{Achievement, ThemeName, TypingHistoryEntry};

pub const KEY_HISTORY: &str = "typingHistory";
pub const KEY_ACHIEVEMENTS: &str = "achievements";
pub const KEY_TOTAL_CHARS: &str = "totalCharactersTyped";
pub const KEY_STREAK_DAYS: &str = "streakDays";
pub const KEY_LAST_TEST_DATE: &str = "lastTestDate";
pub const KEY_THEME: &str = "theme";

/// Every key the game writes.
pub const ALL_KEYS: [&str; 6] = [
    KEY_HISTORY,
    KEY_ACHIEVEMENTS,
    KEY_TOTAL_CHARS,
    KEY_STREAK_DAYS,
    KEY_LAST_TEST_DATE,
    KEY_THEME,
];

/// Suffix of value files inside the store directory.
const VALUE_EXT: &str = "json";

/// Returns the default data directory.
///
/// On Linux: ~/.local/share/keystreak/
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keystreak")
}

/// Key/value store rooted at a directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open (and create if needed) a store at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Store { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, VALUE_EXT))
    }

    /// Read a raw value. `Ok(None)` when the key was never set.
    pub fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write a raw value, replacing any previous one.
    ///
    /// Writes go through a sibling temp file and a rename, so a crash
    /// mid-write leaves the old value intact.
    pub fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.key_path(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }

    /// Write several values as one update.
    ///
    /// Every value is written to its temp file before any is renamed into
    /// place, so a failed write leaves all old values intact. Only a
    /// failing rename can still leave a mix of old and new values.
    pub fn set_all(&self, entries: &[(&str, String)]) -> io::Result<()> {
        let mut staged = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let path = self.key_path(key);
            let tmp = path.with_extension("tmp");
            if let Err(e) = fs::write(&tmp, value) {
                for (tmp, _) in &staged {
                    let _ = fs::remove_file(tmp);
                }
                return Err(e);
            }
            staged.push((tmp, path));
        }
        for (tmp, path) in &staged {
            fs::rename(tmp, path)?;
        }
        Ok(())
    }

    pub fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Remove every key the game writes. Other files are left alone.
    pub fn clear(&self) -> io::Result<()> {
        for key in ALL_KEYS {
            self.remove(key)?;
        }
        Ok(())
    }

    /// Best-effort JSON read: missing, unreadable or malformed values are `None`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_lenient(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "ignoring malformed stored value");
                None
            }
        }
    }

    /// Best-effort scalar read, parsed with `FromStr`.
    pub fn get_parsed<T>(&self, key: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.get_lenient(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "ignoring malformed stored value");
                None
            }
        }
    }

    fn get_lenient(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read stored value");
                None
            }
        }
    }
}

// ============================================================================
// PROFILE MAPPING
// ============================================================================

/// Load the profile. Never fails: bad or missing keys keep their defaults.
pub fn load_profile(store: &Store) -> Profile {
    let mut profile = Profile::default();

    if let Some(history) = store.get_json::<Vec<TypingHistoryEntry>>(KEY_HISTORY) {
        profile.history = history;
    }
    if let Some(saved) = store.get_json::<Vec<Achievement>>(KEY_ACHIEVEMENTS) {
        merge_achievements(&mut profile.achievements, saved);
    }
    if let Some(total) = store.get_parsed::<u64>(KEY_TOTAL_CHARS) {
        profile.total_characters_typed = total;
    }
    if let Some(streak) = store.get_parsed::<u32>(KEY_STREAK_DAYS) {
        profile.streak_days = streak;
    }
    profile.last_test_date = store.get_parsed::<CivilDate>(KEY_LAST_TEST_DATE);

    debug!(
        tests = profile.history.len(),
        streak = profile.streak_days,
        "profile loaded"
    );
    profile
}

/// Copy saved unlock state and progress into the catalog, matched by id.
fn merge_achievements(catalog: &mut [Achievement], saved: Vec<Achievement>) {
    for stored in saved {
        if let Some(entry) = catalog.iter_mut().find(|a| a.id == stored.id) {
            entry.unlocked = stored.unlocked;
            if entry.goal.is_some() {
                entry.progress = stored.progress.or(entry.progress);
            }
        }
    }
}

/// Write every profile key through `Store::set_all`.
///
/// A write error leaves the previously saved profile untouched.
pub fn save_profile(store: &Store, profile: &Profile) -> io::Result<()> {
    let mut entries = vec![
        (KEY_HISTORY, to_json(KEY_HISTORY, &profile.history)?),
        (KEY_ACHIEVEMENTS, to_json(KEY_ACHIEVEMENTS, &profile.achievements)?),
        (KEY_TOTAL_CHARS, profile.total_characters_typed.to_string()),
        (KEY_STREAK_DAYS, profile.streak_days.to_string()),
    ];
    if let Some(date) = profile.last_test_date {
        entries.push((KEY_LAST_TEST_DATE, date.to_string()));
    }
    store.set_all(&entries)?;

    if profile.last_test_date.is_none() {
        store.remove(KEY_LAST_TEST_DATE)?;
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(key: &str, value: &T) -> io::Result<String> {
    serde_json::to_string(value).map_err(|e| {
        let msg = format!("Failed to serialize {}: {}", key, e);
        io::Error::new(io::ErrorKind::InvalidData, msg)
    })
}

pub fn load_theme(store: &Store) -> Option<ThemeName> {
    store.get_parsed(KEY_THEME)
}

pub fn save_theme(store: &Store, theme: ThemeName) -> io::Result<()> {
    store.set(KEY_THEME, theme.as_str())
}

// ============================================================================
// TESTS
// ============================================================================
