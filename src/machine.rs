//! This module defines the `PartialMachine` struct: a two-symbol Turing machine whose
//! transition table may still be incomplete, together with its execution state.
//!
//! Machines are cheap to clone. The transition table is a small fixed array copied by value,
//! and the tape sits behind an `Rc` that is only copied when a clone actually writes to it.

use std::fmt;
use std::rc::Rc;

use crate::splitter::expand;
use crate::tape::Tape;
use crate::types::{
    check_size, Key, LazyBeaverError, State, Step, Symbol, Transition, SYMBOLS, TABLE_SIZE,
};

/// A possibly incompletely specified Turing machine and its execution state.
///
/// A fresh machine starts in state 0 on a blank tape with an empty transition table. Entries
/// are only ever added, never changed, so every clone inherits its ancestors' choices.
#[derive(Debug, Clone)]
pub struct PartialMachine {
    /// `None` once the machine has halted.
    state: Option<State>,
    size: usize,
    highest_state_used: State,
    tape: Rc<Tape>,
    position: i64,
    table: [Option<Transition>; TABLE_SIZE],
    defined: usize,
    step_count: u64,
}

impl PartialMachine {
    /// Creates a blank machine that may use up to `size` states.
    ///
    /// # Errors
    ///
    /// * `LazyBeaverError::InvalidSize` if `size` is zero or above `MAX_STATES`.
    pub fn new(size: usize) -> Result<Self, LazyBeaverError> {
        check_size(size)?;
        Ok(Self {
            state: Some(0),
            size,
            highest_state_used: 0,
            tape: Rc::new(Tape::new()),
            position: 0,
            table: [None; TABLE_SIZE],
            defined: 0,
            step_count: 0,
        })
    }

    /// Attempts one concrete step.
    ///
    /// # Returns
    ///
    /// * `Step::Applied` if a defined transition was applied. Entering the halt state counts
    ///   as a step but leaves the tape and head untouched.
    /// * `Step::Halted` if the machine had already halted.
    /// * `Step::NeedsTransition(key)` if the table has no entry for the current key yet.
    pub fn apply_concrete_step(&mut self) -> Step {
        let Some(key) = self.lookup_key() else {
            return Step::Halted;
        };

        match self.table[key.index()] {
            None => Step::NeedsTransition(key),
            Some(Transition::Halt) => {
                self.state = None;
                self.step_count += 1;
                Step::Applied
            }
            Some(Transition::Move {
                next_state,
                write,
                direction,
            }) => {
                // Writing the symbol already under the head is a no-op, keep the tape shared.
                if write != key.symbol {
                    Rc::make_mut(&mut self.tape).set(self.position, write);
                }
                self.position += direction.offset();
                self.state = Some(next_state);
                self.step_count += 1;
                Step::Applied
            }
        }
    }

    /// Performs one step, splitting first if the next transition is undefined.
    ///
    /// Consumes the machine and returns its successors, each already advanced by one step: a
    /// single machine when the transition was defined (or the machine was halted), otherwise
    /// every continuation produced by [`expand`].
    pub fn advance(mut self) -> Vec<PartialMachine> {
        match self.apply_concrete_step() {
            Step::Applied | Step::Halted => vec![self],
            Step::NeedsTransition(_) => {
                let mut machines = expand(&self);
                for machine in &mut machines {
                    machine.apply_concrete_step();
                }
                machines
            }
        }
    }

    /// Checks whether the transitions chosen so far prove that the machine keeps running for
    /// another `steps` steps.
    ///
    /// Simulates a scratch copy. Returns `false` if the copy halts or reaches an undefined
    /// transition within `steps` steps.
    pub fn runs_at_least(&self, steps: u64) -> bool {
        let mut scratch = self.clone();
        for _ in 0..steps {
            if scratch.apply_concrete_step() != Step::Applied {
                return false;
            }
        }
        !scratch.is_halted()
    }

    /// Returns the symbol under the head.
    pub fn current_symbol(&self) -> Symbol {
        self.tape.get(self.position)
    }

    /// Returns the transition table key for the current configuration, `None` once halted.
    pub fn lookup_key(&self) -> Option<Key> {
        self.state.map(|state| Key {
            state,
            symbol: self.current_symbol(),
        })
    }

    /// Returns `true` once the machine has entered the halt state.
    pub fn is_halted(&self) -> bool {
        self.state.is_none()
    }

    /// Returns the current state, `None` once halted.
    pub fn state(&self) -> Option<State> {
        self.state
    }

    /// Returns the number of states this machine may use.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the largest state index referenced by the table so far.
    pub fn highest_state_used(&self) -> State {
        self.highest_state_used
    }

    /// Returns the number of concrete steps applied, including a final halting step.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Returns the head position.
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Returns the tape.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the entry assigned to `key`, if any.
    pub fn transition(&self, key: Key) -> Option<Transition> {
        self.table[key.index()]
    }

    /// Returns the number of assigned table entries.
    pub fn transition_count(&self) -> usize {
        self.defined
    }

    /// Returns `true` if no transition has been assigned yet.
    pub fn is_table_empty(&self) -> bool {
        self.transition_count() == 0
    }

    /// Assigns a new table entry.
    ///
    /// # Panics
    ///
    /// Panics if the key is already assigned, if the key or target state is outside the
    /// machine's size, or if the target would skip past the next unused state. These are
    /// splitter bugs, not recoverable conditions.
    pub(crate) fn assign(&mut self, key: Key, transition: Transition) {
        assert!(
            (key.state as usize) < self.size && SYMBOLS.contains(&key.symbol),
            "transition key {key:?} outside a {}-state machine",
            self.size
        );
        assert!(
            self.table[key.index()].is_none(),
            "transition for {key:?} is already assigned"
        );

        if let Transition::Move {
            next_state, write, ..
        } = transition
        {
            assert!(
                (next_state as usize) < self.size,
                "next state {next_state} outside a {}-state machine",
                self.size
            );
            assert!(
                next_state <= self.highest_state_used + 1,
                "next state {next_state} skips past unused states (highest used {})",
                self.highest_state_used
            );
            assert!(SYMBOLS.contains(&write), "symbol {write} outside the alphabet");
            self.highest_state_used = self.highest_state_used.max(next_state);
        }

        self.table[key.index()] = Some(transition);
        self.defined += 1;
    }
}

/// Renders the transition table in the underscore-separated form used by busy beaver
/// catalogues, for example `1RB---_0LA???`. Undefined entries print as `???`.
impl fmt::Display for PartialMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in 0..self.size {
            if state > 0 {
                write!(f, "_")?;
            }
            for &symbol in &SYMBOLS {
                let key = Key {
                    state: state as State,
                    symbol,
                };
                match self.transition(key) {
                    Some(transition) => write!(f, "{transition}")?,
                    None => write!(f, "???")?,
                }
            }
        }
        Ok(())
    }
}
