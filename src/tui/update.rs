//! State transitions: (App, Action) -> Transition.
//!
//! This is the game logic of the TUI. Fully testable without a terminal:
//! time comes in as a parameter and disk writes go out as effects.
//! Unhandled actions leave the model unchanged.

use crate::clock::CivilDate;
use crate::session::{Key, KeyOutcome};
use crate::types::{Difficulty, ThemeName};

use super::state::{Action, App, Effect, Overlay, Screen, Summary, Transition};

/// Apply `action` to the model at time `now_ms`.
pub fn update(app: &mut App, action: &Action, now_ms: u64) -> Transition {
    match action {
        Action::Quit => return Transition::Quit,
        Action::Tick => {
            app.session.tick(now_ms);
            return Transition::Render;
        }
        _ => {}
    }

    if let Some(overlay) = app.overlay {
        return update_overlay(app, overlay, action);
    }

    match app.screen {
        Screen::Typing => update_typing(app, action, now_ms),
        Screen::Results(_) => update_results(app, action),
    }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

/// Typing: keys feed the session; panel toggles open overlays.
fn update_typing(app: &mut App, action: &Action, now_ms: u64) -> Transition {
    let key = match action {
        Action::Type(c) => Key::Char(*c),
        Action::Backspace => Key::Backspace,
        Action::Restart => {
            app.new_game();
            return Transition::Render;
        }
        other => return open_overlay(app, other),
    };

    match app.session.handle_key(key, now_ms) {
        KeyOutcome::Finished(result) => {
            let today = CivilDate::from_epoch_millis(now_ms);
            let unlocked = app.profile.record(&result, app.difficulty, now_ms, today);
            app.screen = Screen::Results(Summary { result, unlocked });
            Transition::Effect(Effect::SaveProfile)
        }
        KeyOutcome::Accepted | KeyOutcome::Ignored => Transition::Render,
    }
}

/// Results: start over, or open a panel.
fn update_results(app: &mut App, action: &Action) -> Transition {
    match action {
        Action::Restart | Action::Select => {
            app.new_game();
            Transition::Render
        }
        other => open_overlay(app, other),
    }
}

/// Open the panel a toggle action names. Anything else is a no-op.
fn open_overlay(app: &mut App, action: &Action) -> Transition {
    let overlay = match action {
        Action::ToggleSettings => Overlay::settings(app.difficulty),
        Action::ToggleStats => Overlay::Stats,
        Action::ToggleAchievements => Overlay::Achievements,
        Action::ToggleThemes => Overlay::themes(app.theme),
        _ => return Transition::Render,
    };
    app.overlay = Some(overlay);
    Transition::Render
}

// ============================================================================
// OVERLAYS
// ============================================================================

fn update_overlay(app: &mut App, overlay: Overlay, action: &Action) -> Transition {
    match action {
        Action::Back => {
            app.overlay = None;
            return Transition::Render;
        }
        Action::Restart => {
            app.overlay = None;
            app.new_game();
            return Transition::Render;
        }
        Action::ToggleSettings
        | Action::ToggleStats
        | Action::ToggleAchievements
        | Action::ToggleThemes => {
            if is_toggle_for(action, overlay) {
                app.overlay = None;
                return Transition::Render;
            }
            return open_overlay(app, action);
        }
        _ => {}
    }

    match overlay {
        Overlay::Settings { cursor } => update_settings(app, cursor, action),
        Overlay::Themes { cursor } => update_themes(app, cursor, action),
        // Read-only panels
        Overlay::Stats | Overlay::Achievements => Transition::Render,
    }
}

fn is_toggle_for(action: &Action, overlay: Overlay) -> bool {
    matches!(
        (action, overlay),
        (Action::ToggleSettings, Overlay::Settings { .. })
            | (Action::ToggleStats, Overlay::Stats)
            | (Action::ToggleAchievements, Overlay::Achievements)
            | (Action::ToggleThemes, Overlay::Themes { .. })
    )
}

/// Settings: pick a difficulty. Choosing one starts a new game.
fn update_settings(app: &mut App, cursor: usize, action: &Action) -> Transition {
    let len = Difficulty::SELECTABLE.len();
    match action {
        Action::MoveUp => {
            app.overlay = Some(Overlay::Settings { cursor: cursor.saturating_sub(1) });
        }
        Action::MoveDown => {
            app.overlay = Some(Overlay::Settings { cursor: (cursor + 1).min(len - 1) });
        }
        Action::Select => change_difficulty(app, Difficulty::SELECTABLE[cursor.min(len - 1)]),
        Action::NumberKey(n) => {
            if let Some(&difficulty) = Difficulty::SELECTABLE.get(usize::from(*n).wrapping_sub(1)) {
                change_difficulty(app, difficulty);
            }
        }
        _ => {}
    }
    Transition::Render
}

fn change_difficulty(app: &mut App, difficulty: Difficulty) {
    app.difficulty = difficulty;
    app.overlay = None;
    app.new_game();
}

/// Themes: move through the list, apply with Select.
fn update_themes(app: &mut App, cursor: usize, action: &Action) -> Transition {
    let len = ThemeName::ALL.len();
    match action {
        Action::MoveUp => {
            app.overlay = Some(Overlay::Themes { cursor: cursor.saturating_sub(1) });
            Transition::Render
        }
        Action::MoveDown => {
            app.overlay = Some(Overlay::Themes { cursor: (cursor + 1).min(len - 1) });
            Transition::Render
        }
        Action::Select => {
            let theme = ThemeName::ALL[cursor.min(len - 1)];
            app.theme = theme;
            app.overlay = None;
            Transition::Effect(Effect::SaveTheme(theme))
        }
        _ => Transition::Render,
    }
}

// ============================================================================
// TESTS
// ============================================================================
