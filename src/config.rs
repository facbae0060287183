//! Configuration file for keystreak.
//!
//! Stored at ~/.config/keystreak/config.toml. Every field is optional;
//! command-line flags take precedence over the file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use crate::types::{Difficulty, ThemeName};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Difficulty used when a game starts.
    pub difficulty: Option<Difficulty>,
    /// Theme used when none has been picked in the game yet.
    pub theme: Option<ThemeName>,
    /// File of extra quotes, separated by blank lines.
    pub quotes_file: Option<PathBuf>,
    /// Where history and achievements are kept.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Config file path (~/.config/keystreak/config.toml).
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("keystreak").join("config.toml"))
    }

    /// Load from the default path. A missing file gives defaults.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(p) => Self::load_from(&p),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file gives defaults; an unreadable or
    /// invalid one is an error naming the file.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("Cannot read config {}: {}", path.display(), e)),
        };
        toml::from_str(&contents)
            .map_err(|e| format!("Invalid config {}: {}", path.display(), e.message()))
    }

    /// Save to the default path.
    pub fn save(&self) -> io::Result<()> {
        let path = Self::path().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not determine config path")
        })?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Failed to serialize config: {}", e))
        })?;
        fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default_is_empty() {
        let config = Config::default();
        assert!(config.difficulty.is_none());
        assert!(config.theme.is_none());
        assert!(config.quotes_file.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            Config::load_from(&temp.path().join("nope.toml")),
            Ok(Config::default())
        );
    }

    #[test]
    fn test_parses_lowercase_enums() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "difficulty = \"hard\"\ntheme = \"green\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.difficulty, Some(Difficulty::Hard));
        assert_eq!(config.theme, Some(ThemeName::Green));
    }

    #[test]
    fn test_invalid_field_is_an_error_naming_the_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "data_dir = \"/srv/typing\"\ntheme = \"pink\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();

        assert!(err.contains("config.toml"), "{}", err);
        assert!(err.contains("pink"), "{}", err);
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let temp = TempDir::new().unwrap();
        // A directory cannot be read as a file
        assert!(Config::load_from(temp.path()).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let config = Config {
            difficulty: Some(Difficulty::Easy),
            theme: Some(ThemeName::Blue),
            quotes_file: Some(PathBuf::from("/tmp/quotes.txt")),
            data_dir: None,
        };

        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), Ok(config));
    }
}
