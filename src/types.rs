//! This module defines the core data structures and types shared by the machine, the splitter
//! and the search driver: states, symbols, directions, transition entries, step outcomes and
//! the crate error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The largest number of states a machine may be searched with.
pub const MAX_STATES: usize = 10;
/// The tape alphabet. Unwritten cells read as the first symbol.
pub const SYMBOLS: [Symbol; 2] = [0, 1];
/// The number of entries in a full transition table.
pub const TABLE_SIZE: usize = MAX_STATES * SYMBOLS.len();

/// Index of an active (non-halt) state.
pub type State = u8;
/// A tape symbol, always `0` or `1`.
pub type Symbol = u8;

/// Represents the possible directions the tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// Every direction, in the order the splitter emits them.
    pub const ALL: [Direction; 2] = [Direction::Left, Direction::Right];

    /// The signed head displacement for this direction.
    pub fn offset(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    fn letter(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

/// The key a transition is looked up by: the current state and the symbol under the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub state: State,
    pub symbol: Symbol,
}

impl Key {
    /// The slot of this key in a flat transition table.
    pub fn index(self) -> usize {
        self.state as usize * SYMBOLS.len() + self.symbol as usize
    }
}

/// A single assigned entry of a transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Entering this transition halts the machine.
    Halt,
    /// Write a symbol, move the head and continue in `next_state`.
    Move {
        next_state: State,
        write: Symbol,
        direction: Direction,
    },
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Halt => write!(f, "---"),
            Transition::Move {
                next_state,
                write,
                direction,
            } => write!(
                f,
                "{}{}{}",
                write,
                direction.letter(),
                (b'A' + next_state) as char
            ),
        }
    }
}

/// Represents the outcome of attempting one concrete step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A defined transition was applied.
    Applied,
    /// The machine is halted; nothing was applied.
    Halted,
    /// The transition for the current key has not been chosen yet.
    NeedsTransition(Key),
}

/// Represents the errors surfaced to callers of the search and scheduling APIs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LazyBeaverError {
    /// The requested number of states is outside `1..=MAX_STATES`.
    #[error("Invalid machine size {0}: expected 1..={max}", max = MAX_STATES)]
    InvalidSize(usize),
    /// A step budget of zero was requested.
    #[error("Invalid step budget {0}: must be at least 1")]
    InvalidBudget(u64),
    /// The budget growth factor cannot make progress.
    #[error("Invalid budget growth factor {0}: must be at least 2")]
    InvalidGrowth(u64),
    /// Every budget the schedule allows was tried without finding a gap.
    #[error("LB({size}) > {budget}: no larger budget is available")]
    BudgetExhausted { size: usize, budget: u64 },
    /// A configuration value is malformed or inconsistent.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Reading a configuration file failed.
    #[error("File error: {0}")]
    FileError(String),
}

/// Validates a machine size against `MAX_STATES`.
pub fn check_size(size: usize) -> Result<(), LazyBeaverError> {
    if size == 0 || size > MAX_STATES {
        return Err(LazyBeaverError::InvalidSize(size));
    }
    Ok(())
}
