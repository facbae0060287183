//! Log setup.
//!
//! The terminal belongs to the TUI, so logs go to `keystreak.log` in the
//! data directory. The filter comes from `KEYSTREAK_LOG` (default `info`).

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "KEYSTREAK_LOG";

/// Log file name inside the data directory.
pub const LOG_FILE: &str = "keystreak.log";

pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}

/// Install the global subscriber, appending to the log file.
///
/// Calling twice is harmless: the second install is ignored.
pub fn init(data_dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(data_dir))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    Ok(())
}
