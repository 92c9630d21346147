//! The depth-first search driver.
//!
//! The search visits the implicit tree of all `size`-state machines. A branch is simulated
//! concretely for as long as its table allows, and only split when it reaches an undefined
//! transition. Pending branches are kept on an explicit stack, so the native call stack stays
//! flat however deep the tree goes.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::machine::PartialMachine;
use crate::splitter::expand;
use crate::types::{LazyBeaverError, Step};

/// How many searched machines pass between two progress reports.
pub const PROGRESS_INTERVAL: u64 = 10_000;

/// The outcome of one exhaustive search at a fixed step budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Step counts at which at least one machine was observed to halt.
    pub hit_steps: BTreeSet<u64>,
    /// Number of machines taken off the stack.
    pub machines_searched: u64,
    /// Number of halting machines per halting step count.
    pub halting_machines: BTreeMap<u64, u64>,
    /// Number of machines that reached the budget without halting.
    pub unresolved: u64,
    /// The largest number of pending machines held at once.
    pub peak_stack: usize,
}

impl SearchResult {
    /// Returns the smallest step count in `1..=budget` at which no machine halted, or `None`
    /// if every step count up to the budget was hit and the budget is too small to decide.
    pub fn lazy_beaver(&self, budget: u64) -> Option<u64> {
        let mut expected = 1;
        for &step in self.hit_steps.range(1..=budget) {
            if step != expected {
                return Some(expected);
            }
            expected += 1;
        }
        (expected <= budget).then_some(expected)
    }

    /// Returns the total number of halting machines found.
    pub fn halted(&self) -> u64 {
        self.halting_machines.values().sum()
    }
}

/// Progress information handed to a [`Searcher`] callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub machines_searched: u64,
    pub stack_size: usize,
}

/// A configurable depth-first search over all `size`-state machines.
///
/// ```
/// use lazy_beaver::Searcher;
///
/// let result = Searcher::new(2, 20).unwrap().run();
/// assert_eq!(result.lazy_beaver(20), Some(7));
/// ```
pub struct Searcher<'a> {
    root: PartialMachine,
    budget: u64,
    on_progress: Option<Box<dyn FnMut(Progress) + 'a>>,
}

impl<'a> Searcher<'a> {
    /// Creates a search over `size`-state machines, each simulated for at most `budget` steps.
    ///
    /// # Errors
    ///
    /// * `LazyBeaverError::InvalidSize` if `size` is zero or above `MAX_STATES`.
    /// * `LazyBeaverError::InvalidBudget` if `budget` is zero.
    pub fn new(size: usize, budget: u64) -> Result<Self, LazyBeaverError> {
        let root = PartialMachine::new(size)?;
        if budget == 0 {
            return Err(LazyBeaverError::InvalidBudget(budget));
        }
        Ok(Self {
            root,
            budget,
            on_progress: None,
        })
    }

    /// Registers a callback invoked every `PROGRESS_INTERVAL` searched machines.
    pub fn on_progress(mut self, callback: impl FnMut(Progress) + 'a) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Runs the search to completion.
    pub fn run(mut self) -> SearchResult {
        let mut result = SearchResult::default();
        let mut stack = vec![self.root.clone()];

        while let Some(mut machine) = stack.pop() {
            result.machines_searched += 1;
            if result.machines_searched % PROGRESS_INTERVAL == 0 {
                self.report(result.machines_searched, stack.len());
            }

            while machine.step_count() < self.budget {
                match machine.apply_concrete_step() {
                    Step::Applied => continue,
                    Step::Halted => break,
                    Step::NeedsTransition(_) => {
                        stack.extend(expand(&machine));
                        result.peak_stack = result.peak_stack.max(stack.len());
                        break;
                    }
                }
            }

            if machine.is_halted() {
                let steps = machine.step_count();
                result.hit_steps.insert(steps);
                *result.halting_machines.entry(steps).or_insert(0) += 1;
            } else if machine.step_count() >= self.budget {
                result.unresolved += 1;
            }
        }

        info!(
            "searched {} machines of size {} up to {} steps: {} halted, {} unresolved",
            result.machines_searched,
            self.root.size(),
            self.budget,
            result.halted(),
            result.unresolved
        );
        result
    }

    fn report(&mut self, machines_searched: u64, stack_size: usize) {
        debug!(
            "{} machines searched (stack size: {})",
            machines_searched, stack_size
        );
        if let Some(callback) = self.on_progress.as_mut() {
            callback(Progress {
                machines_searched,
                stack_size,
            });
        }
    }
}

/// Exhaustively searches all `size`-state machines, simulating each for at most `budget`
/// steps.
///
/// # Returns
///
/// * `Ok(SearchResult)` holding the set of halting step counts and the number of machines
///   searched.
/// * `Err(LazyBeaverError)` if `size` or `budget` is out of range.
pub fn search(size: usize, budget: u64) -> Result<SearchResult, LazyBeaverError> {
    Ok(Searcher::new(size, budget)?.run())
}
