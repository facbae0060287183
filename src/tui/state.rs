//! TUI state algebra: the model, actions and transitions.
//!
//! `App` owns everything the game screen shows: the running session, the
//! player's profile, the quote deck, and which screen and overlay are up.
//! The update layer mutates it in response to `Action`s; anything that has
//! to touch the disk comes back out as an `Effect`.

use crossterm::event::KeyEvent;

use crate::profile::Profile;
use crate::quotes::QuoteDeck;
use crate::session::TypingSession;
use crate::types::{AchievementId, Difficulty, SessionResult, ThemeName};

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// Two producers feed a single mpsc channel:
/// - a key reader thread sends `Key`
/// - a timer thread sends `Tick` once per second
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model.
#[derive(Debug)]
pub struct App {
    pub screen: Screen,
    /// Panel drawn over the current screen, if any.
    pub overlay: Option<Overlay>,
    pub session: TypingSession,
    pub difficulty: Difficulty,
    pub theme: ThemeName,
    pub profile: Profile,
    pub deck: QuoteDeck,
    /// Set to true when the app should exit on the next tick.
    pub should_quit: bool,
}

// ============================================================================
// SCREENS
// ============================================================================

/// The current TUI screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Screen {
    /// Quote on screen, keys go to the session.
    #[default]
    Typing,
    /// Test finished.
    Results(Summary),
}

/// What the results screen shows about the last test.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub result: SessionResult,
    /// Achievements this test unlocked.
    pub unlocked: Vec<AchievementId>,
}

/// Panels that float over either screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Difficulty picker. Cursor indexes `Difficulty::SELECTABLE`.
    Settings { cursor: usize },
    Stats,
    Achievements,
    /// Theme list. Cursor indexes `ThemeName::ALL`.
    Themes { cursor: usize },
}

/// Which key table applies. Derived from the model, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Printable keys are typed into the quote.
    Typing,
    /// Printable keys are commands.
    Menu,
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Type a character into the quote.
    Type(char),
    Backspace,
    /// Fresh quote at the current difficulty.
    Restart,
    ToggleSettings,
    ToggleStats,
    ToggleAchievements,
    ToggleThemes,
    MoveUp,
    MoveDown,
    /// Apply the highlighted item of the open panel.
    Select,
    /// Pick a difficulty by its 1-based position in the settings panel.
    NumberKey(u8),
    /// Close the open panel.
    Back,
    /// One second elapsed.
    Tick,
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of an update step.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Redraw with the updated model.
    Render,
    Quit,
    /// Redraw, and run this side effect.
    Effect(Effect),
}

/// Side effect requested by the update layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Persist the whole profile (after a finished test).
    SaveProfile,
    /// Persist the theme choice.
    SaveTheme(ThemeName),
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl App {
    /// Start a game: draw the first quote and land on the typing screen.
    pub fn new(
        mut deck: QuoteDeck,
        difficulty: Difficulty,
        theme: ThemeName,
        profile: Profile,
    ) -> Self {
        let session = TypingSession::new(&deck.draw(difficulty));
        App {
            screen: Screen::Typing,
            overlay: None,
            session,
            difficulty,
            theme,
            profile,
            deck,
            should_quit: false,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        match (&self.screen, self.overlay) {
            (Screen::Typing, None) => InputMode::Typing,
            _ => InputMode::Menu,
        }
    }

    /// Replace the session with a fresh quote.
    pub fn new_game(&mut self) {
        self.session = TypingSession::new(&self.deck.draw(self.difficulty));
        self.screen = Screen::Typing;
    }
}

impl Overlay {
    pub fn settings(current: Difficulty) -> Self {
        let cursor = Difficulty::SELECTABLE
            .iter()
            .position(|&d| d == current)
            .unwrap_or(0);
        Overlay::Settings { cursor }
    }

    pub fn themes(current: ThemeName) -> Self {
        Overlay::Themes { cursor: current.index() }
    }
}

// ============================================================================
// TESTS
// ============================================================================
