//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui,
//! and runs the effects update asks for against the `Store`.
//!
//! Architecture: two producer threads feed a single mpsc channel.
//! - Key reader thread: forwards crossterm key presses
//! - Ticker thread: sends a Tick once per second for the live WPM
//! The event loop consumes from the channel, dispatching to pure handlers.

use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info, warn};

use crate::clock;
use crate::store::{self, Store};

use super::state::{Action, App, AppEvent, Effect, InputMode, Transition};
use super::update::update;
use super::view::render;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action in this mode.
pub fn map_key(key: KeyEvent, mode: InputMode) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    // Panel toggles work everywhere
    match key.code {
        KeyCode::F(1) => return Some(Action::ToggleSettings),
        KeyCode::F(2) => return Some(Action::ToggleStats),
        KeyCode::F(3) => return Some(Action::ToggleAchievements),
        KeyCode::F(4) => return Some(Action::ToggleThemes),
        _ => {}
    }

    match mode {
        InputMode::Typing => map_typing_key(key),
        InputMode::Menu => map_menu_key(key),
    }
}

fn map_typing_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char(c) if is_plain(key.modifiers) => Some(Action::Type(c)),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Tab => Some(Action::Restart),
        _ => None,
    }
}

fn map_menu_key(key: KeyEvent) -> Option<Action> {
    if !is_plain(key.modifiers) {
        return None;
    }

    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc => Some(Action::Back),

        // Panels
        KeyCode::Char('d') => Some(Action::ToggleSettings),
        KeyCode::Char('s') => Some(Action::ToggleStats),
        KeyCode::Char('a') => Some(Action::ToggleAchievements),
        KeyCode::Char('t') => Some(Action::ToggleThemes),

        // Game
        KeyCode::Char('r') | KeyCode::Tab => Some(Action::Restart),
        KeyCode::Char('q') => Some(Action::Quit),

        // Number keys pick a difficulty
        KeyCode::Char(c @ '1'..='3') => Some(Action::NumberKey(c as u8 - b'0')),

        _ => None,
    }
}

/// No modifier other than Shift.
fn is_plain(modifiers: KeyModifiers) -> bool {
    modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards key presses to the channel.
fn spawn_key_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            match event::read() {
                // Windows reports releases too
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break; // receiver dropped, TUI is shutting down
                    }
                }
                Ok(_) => {} // ignore mouse, resize, etc.
                Err(e) => {
                    warn!("key reader stopped: {}", e);
                    break;
                }
            }
        }
    });
}

/// Spawn a thread that sends a Tick every second until the receiver is gone.
fn spawn_ticker(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            thread::sleep(TICK_INTERVAL);
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the game until the player quits.
///
/// Sets up the terminal, spawns the key reader and ticker, and feeds every
/// event through `update`. Effects are written to `store` as they come.
pub fn run(mut app: App, store: &Store) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let (tx, rx) = mpsc::channel::<AppEvent>();

    // Spawn producer threads
    spawn_key_reader(tx.clone());
    spawn_ticker(tx);

    info!(
        difficulty = %app.difficulty,
        theme = %app.theme,
        "game started"
    );

    loop {
        // Render
        terminal.draw(|frame| render(&app, frame))?;

        // Check quit flag
        if app.should_quit {
            break;
        }

        // Block on next event from any producer
        let event = match rx.recv() {
            Ok(e) => e,
            Err(_) => break, // all senders dropped
        };

        let action = match event {
            AppEvent::Key(key) => match map_key(key, app.input_mode()) {
                Some(action) => action,
                None => continue,
            },
            AppEvent::Tick => Action::Tick,
        };

        match update(&mut app, &action, clock::now_millis()) {
            Transition::Render => {}
            Transition::Quit => {
                app.should_quit = true;
            }
            Transition::Effect(effect) => {
                handle_effect(effect, &app, store);
            }
        }
    }

    restore_terminal()?;
    info!("game closed");
    Ok(())
}

// ============================================================================
// EFFECT HANDLING
// ============================================================================

/// Run a side effect requested by a pure transition.
///
/// Storage failures are logged and the game carries on.
fn handle_effect(effect: Effect, app: &App, store: &Store) {
    let result = match &effect {
        Effect::SaveProfile => store::save_profile(store, &app.profile),
        Effect::SaveTheme(theme) => store::save_theme(store, *theme),
    };

    match result {
        Ok(()) => debug!(?effect, "effect applied"),
        Err(e) => warn!(?effect, "could not save to {}: {}", store.dir().display(), e),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_maps_to_quit_in_both_modes() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c, InputMode::Typing), Some(Action::Quit));
        assert_eq!(map_key(ctrl_c, InputMode::Menu), Some(Action::Quit));
    }

    #[test]
    fn printable_keys_type_while_typing() {
        assert_eq!(map_key(key(KeyCode::Char('q')), InputMode::Typing), Some(Action::Type('q')));
        assert_eq!(map_key(key(KeyCode::Char(' ')), InputMode::Typing), Some(Action::Type(' ')));
    }

    #[test]
    fn shifted_keys_type_while_typing() {
        let upper = KeyEvent::new(KeyCode::Char('T'), KeyModifiers::SHIFT);
        assert_eq!(map_key(upper, InputMode::Typing), Some(Action::Type('T')));
    }

    #[test]
    fn modifier_chords_are_ignored_while_typing() {
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        let alt_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(map_key(ctrl_a, InputMode::Typing), None);
        assert_eq!(map_key(alt_x, InputMode::Typing), None);
    }

    #[test]
    fn editing_keys_while_typing() {
        assert_eq!(map_key(key(KeyCode::Backspace), InputMode::Typing), Some(Action::Backspace));
        assert_eq!(map_key(key(KeyCode::Tab), InputMode::Typing), Some(Action::Restart));
        assert_eq!(map_key(key(KeyCode::Esc), InputMode::Typing), None);
        assert_eq!(map_key(key(KeyCode::Enter), InputMode::Typing), None);
    }

    #[test]
    fn function_keys_toggle_panels_in_both_modes() {
        for mode in [InputMode::Typing, InputMode::Menu] {
            assert_eq!(map_key(key(KeyCode::F(1)), mode), Some(Action::ToggleSettings));
            assert_eq!(map_key(key(KeyCode::F(2)), mode), Some(Action::ToggleStats));
            assert_eq!(map_key(key(KeyCode::F(3)), mode), Some(Action::ToggleAchievements));
            assert_eq!(map_key(key(KeyCode::F(4)), mode), Some(Action::ToggleThemes));
        }
    }

    #[test]
    fn letters_are_commands_in_menus() {
        let menu = InputMode::Menu;
        assert_eq!(map_key(key(KeyCode::Char('r')), menu), Some(Action::Restart));
        assert_eq!(map_key(key(KeyCode::Char('s')), menu), Some(Action::ToggleStats));
        assert_eq!(map_key(key(KeyCode::Char('a')), menu), Some(Action::ToggleAchievements));
        assert_eq!(map_key(key(KeyCode::Char('t')), menu), Some(Action::ToggleThemes));
        assert_eq!(map_key(key(KeyCode::Char('d')), menu), Some(Action::ToggleSettings));
        assert_eq!(map_key(key(KeyCode::Char('q')), menu), Some(Action::Quit));
    }

    #[test]
    fn vim_and_arrow_keys_move_in_menus() {
        let menu = InputMode::Menu;
        assert_eq!(map_key(key(KeyCode::Char('j')), menu), Some(Action::MoveDown));
        assert_eq!(map_key(key(KeyCode::Char('k')), menu), Some(Action::MoveUp));
        assert_eq!(map_key(key(KeyCode::Down), menu), Some(Action::MoveDown));
        assert_eq!(map_key(key(KeyCode::Up), menu), Some(Action::MoveUp));
    }

    #[test]
    fn enter_and_esc_in_menus() {
        assert_eq!(map_key(key(KeyCode::Enter), InputMode::Menu), Some(Action::Select));
        assert_eq!(map_key(key(KeyCode::Esc), InputMode::Menu), Some(Action::Back));
    }

    #[test]
    fn number_keys_map_to_number_actions() {
        for n in 1..=3u8 {
            let k = key(KeyCode::Char((b'0' + n) as char));
            assert_eq!(map_key(k, InputMode::Menu), Some(Action::NumberKey(n)));
        }
        assert_eq!(map_key(key(KeyCode::Char('4')), InputMode::Menu), None);
    }

    #[test]
    fn unmapped_key_returns_none() {
        assert_eq!(map_key(key(KeyCode::Char('z')), InputMode::Menu), None);
    }

    #[test]
    fn effects_write_to_the_store() {
        use crate::profile::Profile;
        use crate::quotes::QuoteDeck;
        use crate::types::{Difficulty, ThemeName};

        let dir = tempfile::TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let app = App::new(
            QuoteDeck::builtin(1),
            Difficulty::Easy,
            ThemeName::Dark,
            Profile::default(),
        );

        handle_effect(Effect::SaveTheme(ThemeName::Green), &app, &store);
        assert_eq!(store::load_theme(&store), Some(ThemeName::Green));

        handle_effect(Effect::SaveProfile, &app, &store);
        assert!(store.get(store::KEY_ACHIEVEMENTS).unwrap().is_some());
    }
}
