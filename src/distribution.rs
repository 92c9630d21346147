//! Breadth-first exploration.
//!
//! Advances every `size`-state machine in lock step, one step per round. [`distribution`]
//! counts how many machines halt on each step; [`lazy_beaver_breadth`] stops at the first
//! step on which none does. Unlike the depth-first search this keeps the whole frontier in
//! memory, so it suits small sizes and budgets.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::machine::PartialMachine;
use crate::types::LazyBeaverError;

/// Number of machines halting on each step, up to a step limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// Halting machines per step; steps on which nothing halted are absent.
    pub halting: BTreeMap<u64, u64>,
    /// Machines still running after the last step.
    pub running: u64,
    /// The step limit the distribution was computed for.
    pub max_steps: u64,
}

/// Computes the halting distribution of all `size`-state machines over `max_steps` steps.
///
/// # Errors
///
/// * `LazyBeaverError::InvalidSize` if `size` is zero or above `MAX_STATES`.
pub fn distribution(size: usize, max_steps: u64) -> Result<Distribution, LazyBeaverError> {
    let mut machines = vec![PartialMachine::new(size)?];
    let mut result = Distribution {
        max_steps,
        ..Distribution::default()
    };

    for step in 1..=max_steps {
        let stepped: Vec<PartialMachine> = machines
            .into_iter()
            .flat_map(PartialMachine::advance)
            .collect();
        let total = stepped.len();
        machines = stepped
            .into_iter()
            .filter(|machine| !machine.is_halted())
            .collect();

        let halted = (total - machines.len()) as u64;
        if halted > 0 {
            debug!("halting on step {step}: {halted} machines");
            result.halting.insert(step, halted);
        }
        if machines.is_empty() {
            break;
        }
    }

    result.running = machines.len() as u64;
    Ok(result)
}

/// The outcome of a breadth-first Lazy Beaver search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadthSearch {
    pub size: usize,
    /// The first step on which no machine halted, `None` if every step up to `max_steps` saw
    /// a halt.
    pub value: Option<u64>,
    pub max_steps: u64,
    /// The largest number of machines advanced in a single round.
    pub peak_frontier: usize,
    /// Machines dropped because their defined transitions alone keep them running past
    /// `max_steps`.
    pub pruned: u64,
}

/// Finds the Lazy Beaver value of `size`-state machines breadth first, looking at most
/// `max_steps` steps ahead.
///
/// After each round, a machine whose defined transitions already carry it past `max_steps`
/// without halting can no longer halt within the horizon and is dropped from the frontier.
///
/// # Errors
///
/// * `LazyBeaverError::InvalidSize` if `size` is zero or above `MAX_STATES`.
pub fn lazy_beaver_breadth(
    size: usize,
    max_steps: u64,
) -> Result<BreadthSearch, LazyBeaverError> {
    let mut machines = vec![PartialMachine::new(size)?];
    let mut result = BreadthSearch {
        size,
        max_steps,
        ..BreadthSearch::default()
    };

    for step in 1..=max_steps {
        debug!(
            "searching step {step} ({size}-state machines: {})",
            machines.len()
        );
        result.peak_frontier = result.peak_frontier.max(machines.len());

        let remaining = max_steps - step;
        let mut halted = 0;
        let mut running = Vec::new();
        for machine in machines.into_iter().flat_map(PartialMachine::advance) {
            if machine.is_halted() {
                halted += 1;
            } else if machine.runs_at_least(remaining) {
                result.pruned += 1;
            } else {
                running.push(machine);
            }
        }

        if halted == 0 {
            result.value = Some(step);
            break;
        }
        machines = running;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::search;

    #[test]
    fn test_single_state_distribution() {
        let result = distribution(1, 10).unwrap();

        assert_eq!(result.halting, BTreeMap::from([(1, 1)]));
        assert_eq!(result.running, 2);
        assert_eq!(result.max_steps, 10);
    }

    #[test]
    fn test_agrees_with_depth_first_search() {
        let breadth = distribution(2, 12).unwrap();
        let depth = search(2, 12).unwrap();

        assert_eq!(breadth.halting, depth.halting_machines);
        assert_eq!(breadth.running, depth.unresolved);
    }

    #[test]
    fn test_zero_steps() {
        let result = distribution(2, 0).unwrap();
        assert!(result.halting.is_empty());
        assert_eq!(result.running, 1);
    }

    #[test]
    fn test_invalid_size() {
        assert_eq!(distribution(0, 5), Err(LazyBeaverError::InvalidSize(0)));
        assert_eq!(
            lazy_beaver_breadth(0, 5),
            Err(LazyBeaverError::InvalidSize(0))
        );
    }

    #[test]
    fn test_breadth_single_state() {
        let result = lazy_beaver_breadth(1, 10).unwrap();

        assert_eq!(result.value, Some(2));
        // Both right-moving machines loop on (A,0) forever and are dropped after step 1.
        assert_eq!(result.pruned, 2);
        assert_eq!(result.peak_frontier, 1);
    }

    #[test]
    fn test_breadth_agrees_with_depth_first_search() {
        for (size, max_steps) in [(2, 20), (3, 30)] {
            let breadth = lazy_beaver_breadth(size, max_steps).unwrap();
            let depth = search(size, max_steps).unwrap();
            assert_eq!(breadth.value, depth.lazy_beaver(max_steps), "size {size}");
        }
    }

    #[test]
    fn test_breadth_horizon_too_short() {
        let result = lazy_beaver_breadth(2, 5).unwrap();
        assert_eq!(result.value, None);
        assert!(result.peak_frontier > 1);
    }
}
