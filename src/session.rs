//! The typing-session state machine.
//!
//! A session holds one quote and the player's input. Keys are matched
//! against the quote position by position; the timer starts on the first
//! handled key and the session finishes when the input reaches the end
//! of the quote. Time is passed in as epoch milliseconds so every
//! transition is deterministic under test.

use std::collections::BTreeMap;

use crate::types::SessionResult;

/// Characters per "word" in the WPM formula.
const CHARS_PER_WORD: f64 = 5.0;

/// Error counts above this are shown as high heat.
const HEAT_HIGH_ABOVE: u32 = 5;
/// Error counts above this (and not high) are shown as medium heat.
const HEAT_MEDIUM_ABOVE: u32 = 2;

/// Input accepted by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    Backspace,
}

/// What a handled key did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Key consumed; session still running.
    Accepted,
    /// Key had no effect (end of quote, or session already finished).
    Ignored,
    /// This key completed the quote.
    Finished(SessionResult),
}

/// Render state of one quote character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharState {
    Pending,
    Correct,
    Incorrect,
}

/// Heat bucket of a mistyped key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Heat {
    Low,
    Medium,
    High,
}

impl Heat {
    pub fn from_count(count: u32) -> Self {
        if count > HEAT_HIGH_ABOVE {
            Heat::High
        } else if count > HEAT_MEDIUM_ABOVE {
            Heat::Medium
        } else {
            Heat::Low
        }
    }
}

/// One cell of the error heat map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatEntry {
    pub key: char,
    pub count: u32,
    pub heat: Heat,
}

/// State of a single typing test.
#[derive(Debug, Clone, PartialEq)]
pub struct TypingSession {
    quote: Vec<char>,
    input: Vec<char>,
    start_ms: Option<u64>,
    end_ms: Option<u64>,
    live_wpm: u32,
    accuracy: u32,
    finished: bool,
    errors: BTreeMap<char, u32>,
}

impl TypingSession {
    pub fn new(quote: &str) -> Self {
        TypingSession {
            quote: quote.chars().collect(),
            input: Vec::new(),
            start_ms: None,
            end_ms: None,
            live_wpm: 0,
            accuracy: 100,
            finished: false,
            errors: BTreeMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn quote_len(&self) -> usize {
        self.quote.len()
    }

    pub fn input(&self) -> String {
        self.input.iter().collect()
    }

    /// Index of the next quote character to type.
    pub fn position(&self) -> usize {
        self.input.len()
    }

    pub fn is_started(&self) -> bool {
        self.start_ms.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    pub fn live_wpm(&self) -> u32 {
        self.live_wpm
    }

    pub fn start_ms(&self) -> Option<u64> {
        self.start_ms
    }

    pub fn end_ms(&self) -> Option<u64> {
        self.end_ms
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Apply one key at time `now_ms`.
    pub fn handle_key(&mut self, key: Key, now_ms: u64) -> KeyOutcome {
        if self.finished {
            return KeyOutcome::Ignored;
        }

        if self.start_ms.is_none() {
            self.start_ms = Some(now_ms);
        }

        let typed = match key {
            Key::Backspace => {
                return if self.input.pop().is_some() {
                    self.live_wpm = self.wpm_at(now_ms);
                    KeyOutcome::Accepted
                } else {
                    KeyOutcome::Ignored
                };
            }
            Key::Char(c) => c,
        };

        let position = self.input.len();
        let Some(&expected) = self.quote.get(position) else {
            return KeyOutcome::Ignored;
        };

        self.input.push(typed);
        if typed != expected {
            *self.errors.entry(typed).or_insert(0) += 1;
        }
        self.accuracy = self.compute_accuracy();

        if self.input.len() >= self.quote.len() {
            return KeyOutcome::Finished(self.finish(now_ms));
        }

        self.live_wpm = self.wpm_at(now_ms);
        KeyOutcome::Accepted
    }

    /// Refresh the live WPM. No-op unless the session is running.
    pub fn tick(&mut self, now_ms: u64) {
        if self.is_started() && !self.finished {
            self.live_wpm = self.wpm_at(now_ms);
        }
    }

    fn finish(&mut self, now_ms: u64) -> SessionResult {
        self.finished = true;
        self.end_ms = Some(now_ms);
        self.live_wpm = self.wpm_at(now_ms);

        SessionResult {
            wpm: self.live_wpm,
            accuracy: self.accuracy,
            chars_typed: self.input.len(),
            quote_length: self.quote.len(),
            elapsed_ms: self.elapsed_ms(now_ms),
        }
    }

    // ------------------------------------------------------------------
    // Derived values
    // ------------------------------------------------------------------

    fn elapsed_ms(&self, now_ms: u64) -> u64 {
        self.start_ms.map(|s| now_ms.saturating_sub(s)).unwrap_or(0)
    }

    /// Words per minute over the input typed so far, as of `now_ms`.
    pub fn wpm_at(&self, now_ms: u64) -> u32 {
        let elapsed = self.elapsed_ms(now_ms);
        if elapsed == 0 {
            return 0;
        }
        let minutes = elapsed as f64 / 60_000.0;
        let words = self.input.len() as f64 / CHARS_PER_WORD;
        (words / minutes).round() as u32
    }

    fn compute_accuracy(&self) -> u32 {
        if self.input.is_empty() {
            return 100;
        }
        let correct = self
            .input
            .iter()
            .zip(&self.quote)
            .filter(|(typed, expected)| typed == expected)
            .count();
        ((correct * 100) / self.input.len()) as u32
    }

    /// Share of the quote typed, 0 before the first key.
    pub fn progress_percent(&self) -> u32 {
        if !self.is_started() || self.quote.is_empty() {
            return 0;
        }
        let pct = (self.input.len() as f64 / self.quote.len() as f64 * 100.0).round() as u32;
        pct.min(100)
    }

    /// Per-character state for rendering the quote.
    pub fn char_states(&self) -> Vec<(char, CharState)> {
        self.quote
            .iter()
            .enumerate()
            .map(|(i, &expected)| {
                let state = match self.input.get(i) {
                    None => CharState::Pending,
                    Some(&typed) if typed == expected => CharState::Correct,
                    Some(_) => CharState::Incorrect,
                };
                (expected, state)
            })
            .collect()
    }

    /// Mistyped keys, most frequent first.
    pub fn error_heatmap(&self) -> Vec<HeatEntry> {
        let mut entries: Vec<HeatEntry> = self
            .errors
            .iter()
            .map(|(&key, &count)| HeatEntry {
                key,
                count,
                heat: Heat::from_count(count),
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.key.cmp(&b.key)));
        entries
    }

    pub fn total_errors(&self) -> u32 {
        self.errors.values().sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================
