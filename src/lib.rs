//! keystreak: a terminal typing-speed game with stats, streaks and achievements.

pub mod clock;
pub mod config;
pub mod logging;
pub mod profile;
pub mod quotes;
pub mod report;
pub mod session;
pub mod store;
pub mod tui;
pub mod types;
