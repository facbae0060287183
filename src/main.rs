//! keystreak CLI
//!
//! Terminal typing-speed game with stats, streaks and achievements.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use keystreak::clock;
use keystreak::config::Config;
use keystreak::logging;
use keystreak::profile::Profile;
use keystreak::quotes::{QuoteDeck, load_quotes};
use keystreak::report::{OutputFormat, format_achievements, format_stats};
use keystreak::store::{self, Store, default_data_dir};
use keystreak::tui::state::App;
use keystreak::types::{Difficulty, ThemeName};

#[derive(Parser)]
#[command(name = "keystreak")]
#[command(about = "Typing-speed game for the terminal")]
#[command(version)]
struct Cli {
    /// Quote length: easy, medium, hard or custom (any length)
    #[arg(long, global = true)]
    difficulty: Option<Difficulty>,

    /// Colour theme: dark, light, blue, red, yellow, green or purple
    #[arg(long, global = true)]
    theme: Option<ThemeName>,

    /// File of quotes separated by blank lines (replaces the built-in set)
    #[arg(long, global = true)]
    quotes: Option<PathBuf>,

    /// Directory holding history and achievements
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the game (default)
    Play,

    /// Show typing statistics and recent tests
    Stats {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Show achievements and progress
    Achievements {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// List themes, or pick one for the next game
    Themes {
        /// Theme to save
        name: Option<ThemeName>,
    },

    /// Show the config file, or write one from the current settings
    Config {
        /// Write the effective settings to the config file
        #[arg(long)]
        init: bool,
    },

    /// Delete all history, achievements and saved settings
    Reset {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let settings = Settings::resolve(&cli, &config);

    if let Err(e) = logging::init(&settings.data_dir) {
        eprintln!("Note: logging disabled: {}", e);
    }

    let result = match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => cmd_play(&settings),
        Commands::Stats { format } => cmd_stats(&settings, format.into()),
        Commands::Achievements { format } => cmd_achievements(&settings, format.into()),
        Commands::Themes { name } => cmd_themes(&settings, name),
        Commands::Config { init } => cmd_config(&settings, init),
        Commands::Reset { force } => cmd_reset(&settings, force),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// SETTINGS RESOLUTION
// ============================================================================

/// Flags merged over the config file.
struct Settings {
    difficulty: Difficulty,
    /// Theme from the command line. Wins over the saved one.
    theme_flag: Option<ThemeName>,
    /// Theme from the config file. Loses to the saved one.
    theme_config: Option<ThemeName>,
    quotes: Option<PathBuf>,
    data_dir: PathBuf,
}

impl Settings {
    fn resolve(cli: &Cli, config: &Config) -> Self {
        Settings {
            difficulty: cli.difficulty.or(config.difficulty).unwrap_or_default(),
            theme_flag: cli.theme,
            theme_config: config.theme,
            quotes: cli.quotes.clone().or_else(|| config.quotes_file.clone()),
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| config.data_dir.clone())
                .unwrap_or_else(default_data_dir),
        }
    }

    fn open_store(&self) -> Result<Store, String> {
        Store::open(&self.data_dir)
            .map_err(|e| format!("Cannot open data directory {}: {}", self.data_dir.display(), e))
    }

    /// Flag, then the theme picked in game, then config, then dark.
    fn theme(&self, store: &Store) -> ThemeName {
        self.theme_flag
            .or_else(|| store::load_theme(store))
            .or(self.theme_config)
            .unwrap_or_default()
    }
}

fn load_deck(path: Option<&Path>) -> Result<QuoteDeck, String> {
    let seed = clock::now_millis();
    match path {
        Some(path) => {
            let quotes = load_quotes(path)
                .map_err(|e| format!("Cannot read quotes from {}: {}", path.display(), e))?;
            info!(path = %path.display(), count = quotes.len(), "loaded quotes");
            Ok(QuoteDeck::new(quotes, seed))
        }
        None => Ok(QuoteDeck::builtin(seed)),
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_play(settings: &Settings) -> Result<(), String> {
    let store = settings.open_store()?;
    let deck = load_deck(settings.quotes.as_deref())?;
    let profile = store::load_profile(&store);
    let theme = settings.theme(&store);

    let app = App::new(deck, settings.difficulty, theme, profile);
    keystreak::tui::run::run(app, &store).map_err(|e| e.to_string())
}

fn cmd_stats(settings: &Settings, format: OutputFormat) -> Result<(), String> {
    let profile = load_profile(settings)?;
    print!("{}", format_stats(&profile, format));
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

fn cmd_achievements(settings: &Settings, format: OutputFormat) -> Result<(), String> {
    let profile = load_profile(settings)?;
    print!("{}", format_achievements(&profile, format));
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

fn cmd_themes(settings: &Settings, name: Option<ThemeName>) -> Result<(), String> {
    let store = settings.open_store()?;

    if let Some(theme) = name {
        store::save_theme(&store, theme).map_err(|e| e.to_string())?;
        println!("Theme set to {}.", theme);
        return Ok(());
    }

    let current = settings.theme(&store);
    for theme in ThemeName::ALL {
        let marker = if theme == current { "*" } else { " " };
        println!("{} {}", marker, theme);
    }
    Ok(())
}

fn cmd_config(settings: &Settings, init: bool) -> Result<(), String> {
    let path = Config::path().ok_or("Could not determine config path")?;

    if init {
        let config = Config {
            difficulty: Some(settings.difficulty),
            theme: settings.theme_flag.or(settings.theme_config),
            quotes_file: settings.quotes.clone(),
            data_dir: Some(settings.data_dir.clone()),
        };
        config.save().map_err(|e| e.to_string())?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    println!("Config file: {}", path.display());
    println!("Data directory: {}", settings.data_dir.display());
    println!("Log file: {}", logging::log_path(&settings.data_dir).display());
    println!();
    match std::fs::read_to_string(&path) {
        Ok(contents) => print!("{}", contents),
        Err(_) => println!("(no config file, using defaults)"),
    }
    Ok(())
}

fn cmd_reset(settings: &Settings, force: bool) -> Result<(), String> {
    let store = settings.open_store()?;
    let profile = store::load_profile(&store);

    println!(
        "About to delete {} test results and {} achievements in {}",
        profile.tests_completed(),
        profile.unlocked_count(),
        store.dir().display()
    );

    if !force {
        eprint!("Continue? [y/N] ");
        std::io::stderr().flush().map_err(|e| e.to_string())?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .map_err(|e| e.to_string())?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.clear().map_err(|e| e.to_string())?;
    warn!(dir = %store.dir().display(), "profile reset");
    println!("Reset complete.");

    Ok(())
}

fn load_profile(settings: &Settings) -> Result<Profile, String> {
    let store = settings.open_store()?;
    Ok(store::load_profile(&store))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("keystreak").chain(args.iter().copied())).unwrap()
    }

    fn config_with(difficulty: Difficulty, theme: ThemeName, data_dir: &str) -> Config {
        Config {
            difficulty: Some(difficulty),
            theme: Some(theme),
            quotes_file: Some(PathBuf::from("/cfg/quotes.txt")),
            data_dir: Some(PathBuf::from(data_dir)),
        }
    }

    #[test]
    fn defaults_without_flags_or_config() {
        let settings = Settings::resolve(&cli(&[]), &Config::default());
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.data_dir, default_data_dir());
        assert_eq!(settings.quotes, None);
    }

    #[test]
    fn config_fills_in_missing_flags() {
        let config = config_with(Difficulty::Hard, ThemeName::Blue, "/cfg/data");
        let settings = Settings::resolve(&cli(&["stats"]), &config);

        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.data_dir, PathBuf::from("/cfg/data"));
        assert_eq!(settings.quotes, Some(PathBuf::from("/cfg/quotes.txt")));
    }

    #[test]
    fn flags_win_over_config() {
        let config = config_with(Difficulty::Hard, ThemeName::Blue, "/cfg/data");
        let args = [
            "--difficulty",
            "easy",
            "--data-dir",
            "/flag/data",
            "--quotes",
            "/flag/quotes.txt",
        ];
        let settings = Settings::resolve(&cli(&args), &config);

        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.data_dir, PathBuf::from("/flag/data"));
        assert_eq!(settings.quotes, Some(PathBuf::from("/flag/quotes.txt")));
    }

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() {
        let args = cli(&["play", "--difficulty", "custom"]);
        let settings = Settings::resolve(&args, &Config::default());
        assert_eq!(settings.difficulty, Difficulty::Custom);
    }

    #[test]
    fn theme_falls_back_from_flag_to_saved_to_config_to_dark() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path()).unwrap();
        let config = config_with(Difficulty::Medium, ThemeName::Blue, "/unused");

        // Nothing anywhere
        let bare = Settings::resolve(&cli(&[]), &Config::default());
        assert_eq!(bare.theme(&store), ThemeName::Dark);

        // Config only
        let configured = Settings::resolve(&cli(&[]), &config);
        assert_eq!(configured.theme(&store), ThemeName::Blue);

        // Saved theme beats config
        store::save_theme(&store, ThemeName::Yellow).unwrap();
        assert_eq!(configured.theme(&store), ThemeName::Yellow);

        // Flag beats saved theme
        let flagged = Settings::resolve(&cli(&["--theme", "red"]), &config);
        assert_eq!(flagged.theme(&store), ThemeName::Red);
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        let args = ["keystreak", "--difficulty", "impossible"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
