//! This crate computes Lazy Beaver values: for a number of states `n`, the smallest positive
//! step count at which no halting `n`-state, two-symbol Turing machine halts.
//!
//! Machines are enumerated lazily. A partially specified machine runs until it needs a
//! transition that has not been chosen, then splits into every distinct continuation. The
//! modules provide the machine, the splitter, the depth-first search, the budget scheduler
//! and line-oriented reporting.

pub mod config;
pub mod distribution;
pub mod loader;
pub mod machine;
pub mod report;
pub mod scheduler;
pub mod search;
pub mod splitter;
pub mod tape;
pub mod types;

/// Re-exports the scheduler configuration.
pub use config::SchedulerConfig;
/// Re-exports the breadth-first halting distribution and Lazy Beaver search.
pub use distribution::{distribution, lazy_beaver_breadth, BreadthSearch, Distribution};
/// Re-exports the `ConfigLoader` struct from the loader module.
pub use loader::ConfigLoader;
/// Re-exports the `PartialMachine` struct from the machine module.
pub use machine::PartialMachine;
/// Re-exports the reporting types.
pub use report::{Format, Reporter};
/// Re-exports the scheduler, its verdicts and the one-shot `lazy_beaver` function.
pub use scheduler::{lazy_beaver, Scheduler, Verdict};
/// Re-exports the depth-first search entry points.
pub use search::{search, SearchResult, Searcher};
/// Re-exports the lazy splitter.
pub use splitter::expand;
/// Re-exports the core types.
pub use types::{Direction, Key, LazyBeaverError, State, Step, Symbol, Transition, MAX_STATES};
