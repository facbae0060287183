//! Quote corpus and random selection by difficulty.
//!
//! The deck owns the quotes and a tiny xorshift generator so draws are
//! reproducible under a fixed seed.

use std::fs;
use std::io;
use std::path::Path;

use crate::types::Difficulty;

/// Bundled public-domain passages covering every difficulty band.
const BUILTIN_QUOTES: &[&str] = &[
    "The only way to do great work is to keep at it until the work gets easier.",
    "All happy families are alike; each unhappy family is unhappy in its own way.",
    "Call me Ishmael. Some years ago, never mind how long precisely, having little or no money in my purse, I thought I would sail about a little and see the watery part of the world.",
    "It was a bright cold day in April, and the clocks were striking thirteen.",
    "Whenever I find myself growing grim about the mouth; whenever it is a damp, drizzly November in my soul; whenever I find myself involuntarily pausing before coffin warehouses, and bringing up the rear of every funeral I meet; then, I account it high time to get to sea as soon as I can.",
    "It is a truth universally acknowledged, that a single man in possession of a good fortune, must be in want of a wife. However little known the feelings or views of such a man may be on his first entering a neighbourhood, this truth is so well fixed in the minds of the surrounding families.",
    "There was no possibility of taking a walk that day. We had been wandering, indeed, in the leafless shrubbery an hour in the morning; but since dinner the cold winter wind had brought with it clouds so sombre, and a rain so penetrating, that further outdoor exercise was now out of the question.",
    "It was the best of times, it was the worst of times, it was the age of wisdom, it was the age of foolishness, it was the epoch of belief, it was the epoch of incredulity, it was the season of Light, it was the season of Darkness, it was the spring of hope, it was the winter of despair, we had everything before us, we had nothing before us, we were all going direct to Heaven, we were all going direct the other way. In short, the period was so far like the present period.",
    "In my younger and more vulnerable years my father gave me some advice that I have been turning over in my mind ever since. Whenever you feel like criticizing anyone, he told me, just remember that all the people in this world have not had the advantages that you have had. He did not say any more, but we have always been unusually communicative in a reserved way, and I understood that he meant a great deal more than that. In consequence, I am inclined to reserve all judgements.",
    "Happy families are all alike, the saying goes, but a careful reader soon learns that the exceptions carry the story. A quick brown fox jumps over the lazy dog while the typist keeps a steady rhythm, counting each stroke and trusting the hands to find the keys without looking down. Speed follows accuracy, never the other way around, and every mistake undone with a backspace is time that could have been spent moving forward across the line toward the final period of the passage.",
];

/// Built-in quotes as owned strings.
pub fn builtin_quotes() -> Vec<String> {
    BUILTIN_QUOTES.iter().map(|q| q.to_string()).collect()
}

/// Load quotes from a text file.
///
/// Quotes are separated by blank lines. Line breaks inside a quote are
/// joined with single spaces.
pub fn load_quotes(path: &Path) -> io::Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    let quotes = parse_quotes(&contents);
    if quotes.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("No quotes found in {}", path.display()),
        ));
    }
    Ok(quotes)
}

fn parse_quotes(contents: &str) -> Vec<String> {
    let mut quotes = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in contents.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                quotes.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        quotes.push(current.join(" "));
    }

    quotes
}

/// Quote collection with a seeded random picker.
#[derive(Debug, Clone)]
pub struct QuoteDeck {
    quotes: Vec<String>,
    state: u64,
}

impl QuoteDeck {
    /// Create a deck. An empty list falls back to the built-in quotes.
    pub fn new(quotes: Vec<String>, seed: u64) -> Self {
        let quotes = if quotes.is_empty() { builtin_quotes() } else { quotes };
        QuoteDeck {
            quotes,
            // xorshift must never hold zero
            state: seed | 1,
        }
    }

    pub fn builtin(seed: u64) -> Self {
        Self::new(builtin_quotes(), seed)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Quotes in the difficulty band, or every quote if the band is empty.
    pub fn filter(&self, difficulty: Difficulty) -> Vec<&str> {
        let matching: Vec<&str> = self
            .quotes
            .iter()
            .filter(|q| difficulty.accepts(q.chars().count()))
            .map(String::as_str)
            .collect();

        if matching.is_empty() {
            self.quotes.iter().map(String::as_str).collect()
        } else {
            matching
        }
    }

    /// Pick a random quote for the difficulty.
    pub fn draw(&mut self, difficulty: Difficulty) -> String {
        let roll = self.next_u64();
        let candidates = self.filter(difficulty);
        let index = (roll % candidates.len() as u64) as usize;
        candidates[index].to_string()
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}
