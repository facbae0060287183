//! Interactive typing game in the terminal.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (App, Screen, Overlay, Action, Transition)
//! - `update`: Pure transitions driven by actions
//! - `view`: Pure rendering into a ratatui frame
//! - `theme`: Palettes and styles
//! - `run`: Effects (terminal, threads, storage)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;
