//! Step-budget scheduling policy.
//!
//! The budget schedule is a heuristic: the scheduler starts each machine size at some budget
//! and multiplies it until a search leaves a gap among the halting step counts. This module
//! holds that policy and the checks that make it usable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{check_size, LazyBeaverError, MAX_STATES};

/// The budget the reference schedule starts from.
pub const DEFAULT_INITIAL_BUDGET: u64 = 100;
/// The reference schedule advances by decimal powers.
pub const DEFAULT_GROWTH_FACTOR: u64 = 10;
/// Sizes above four take hours to days to settle.
pub const DEFAULT_MAX_STATES: usize = 4;

/// Policy for the step-budget scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// The first machine size to settle.
    pub min_states: usize,
    /// The last machine size to settle.
    pub max_states: usize,
    /// The budget used for the first size unless a seed overrides it.
    pub initial_budget: u64,
    /// Multiplier applied to the budget when a search is inconclusive.
    pub growth_factor: u64,
    /// Starting budgets for specific sizes.
    pub seeds: BTreeMap<usize, u64>,
    /// Give up on a size rather than search beyond this budget.
    pub max_budget: Option<u64>,
    /// Start each size at the budget that settled the previous one.
    pub carry_budget: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_states: 1,
            max_states: DEFAULT_MAX_STATES,
            initial_budget: DEFAULT_INITIAL_BUDGET,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            seeds: BTreeMap::new(),
            max_budget: None,
            carry_budget: true,
        }
    }
}

impl SchedulerConfig {
    /// A schedule for a single size, starting from budget 1.
    pub fn for_size(size: usize) -> Self {
        Self {
            min_states: size,
            max_states: size,
            initial_budget: 1,
            ..Self::default()
        }
    }

    /// Returns the budget to start `size` from, given the budget that settled the previous
    /// size (if any).
    pub fn starting_budget(&self, size: usize, previous: Option<u64>) -> u64 {
        if let Some(&seed) = self.seeds.get(&size) {
            return seed;
        }
        match previous {
            Some(budget) if self.carry_budget => budget,
            _ => self.initial_budget,
        }
    }

    /// Returns the budget following `budget`.
    ///
    /// Growth stops at `max_budget`: a step that would pass it lands on it instead, so the
    /// cap itself is always searched once. Returns `None` once `budget` has reached the cap,
    /// or if growth would overflow without a cap.
    pub fn next_budget(&self, budget: u64) -> Option<u64> {
        let grown = budget.checked_mul(self.growth_factor);
        match self.max_budget {
            Some(max) if budget >= max => None,
            Some(max) => Some(grown.map_or(max, |next| next.min(max))),
            None => grown,
        }
    }

    /// Checks the configuration for values the scheduler cannot work with.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the configuration is usable.
    /// * `Err(LazyBeaverError)` describing the first problem found.
    pub fn validate(&self) -> Result<(), LazyBeaverError> {
        [
            check_sizes,
            check_budgets,
            check_growth,
            check_seeds,
        ]
        .iter()
        .try_for_each(|check| check(self))
    }
}

fn check_sizes(config: &SchedulerConfig) -> Result<(), LazyBeaverError> {
    check_size(config.min_states)?;
    check_size(config.max_states)?;
    if config.min_states > config.max_states {
        return Err(LazyBeaverError::ConfigError(format!(
            "min_states ({}) is greater than max_states ({})",
            config.min_states, config.max_states
        )));
    }
    Ok(())
}

fn check_budgets(config: &SchedulerConfig) -> Result<(), LazyBeaverError> {
    if config.initial_budget == 0 {
        return Err(LazyBeaverError::InvalidBudget(0));
    }
    match config.max_budget {
        Some(max) if max < config.initial_budget => Err(LazyBeaverError::ConfigError(format!(
            "max_budget ({}) is below initial_budget ({})",
            max, config.initial_budget
        ))),
        _ => Ok(()),
    }
}

fn check_growth(config: &SchedulerConfig) -> Result<(), LazyBeaverError> {
    if config.growth_factor < 2 {
        return Err(LazyBeaverError::InvalidGrowth(config.growth_factor));
    }
    Ok(())
}

fn check_seeds(config: &SchedulerConfig) -> Result<(), LazyBeaverError> {
    for (&size, &budget) in &config.seeds {
        if size == 0 || size > MAX_STATES {
            return Err(LazyBeaverError::ConfigError(format!(
                "seed given for size {size}, expected 1..={MAX_STATES}"
            )));
        }
        if budget == 0 {
            return Err(LazyBeaverError::ConfigError(format!(
                "seed for size {size} must be at least 1"
            )));
        }
        if let Some(max) = config.max_budget.filter(|&max| budget > max) {
            return Err(LazyBeaverError::ConfigError(format!(
                "seed for size {size} ({budget}) is above max_budget ({max})"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SchedulerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_budget, 100);
        assert_eq!(config.growth_factor, 10);
    }

    #[test]
    fn test_starting_budget() {
        let mut config = SchedulerConfig::default();
        config.seeds.insert(4, 1000);

        assert_eq!(config.starting_budget(1, None), 100);
        assert_eq!(config.starting_budget(2, Some(1000)), 1000);
        assert_eq!(config.starting_budget(4, Some(10)), 1000);

        config.carry_budget = false;
        assert_eq!(config.starting_budget(2, Some(1000)), 100);
    }

    #[test]
    fn test_next_budget() {
        let mut config = SchedulerConfig::default();
        assert_eq!(config.next_budget(100), Some(1000));
        assert_eq!(config.next_budget(u64::MAX), None);

        config.max_budget = Some(1000);
        assert_eq!(config.next_budget(100), Some(1000));
        assert_eq!(config.next_budget(1000), None);
    }

    #[test]
    fn test_next_budget_lands_on_max() {
        let config = SchedulerConfig {
            max_budget: Some(50),
            ..SchedulerConfig::default()
        };
        assert_eq!(config.next_budget(10), Some(50));
        assert_eq!(config.next_budget(49), Some(50));
        assert_eq!(config.next_budget(50), None);

        let config = SchedulerConfig {
            max_budget: Some(u64::MAX),
            ..SchedulerConfig::default()
        };
        assert_eq!(config.next_budget(u64::MAX / 2), Some(u64::MAX));
    }

    #[test]
    fn test_seed_above_max_budget_is_rejected() {
        let mut config = SchedulerConfig {
            initial_budget: 10,
            max_budget: Some(10),
            ..SchedulerConfig::default()
        };
        config.seeds.insert(2, 1000);
        assert!(matches!(
            config.validate(),
            Err(LazyBeaverError::ConfigError(message)) if message.contains("max_budget")
        ));

        config.seeds.insert(2, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let config = SchedulerConfig {
            growth_factor: 1,
            ..SchedulerConfig::default()
        };
        assert_eq!(config.validate(), Err(LazyBeaverError::InvalidGrowth(1)));

        let config = SchedulerConfig {
            initial_budget: 0,
            ..SchedulerConfig::default()
        };
        assert_eq!(config.validate(), Err(LazyBeaverError::InvalidBudget(0)));

        let config = SchedulerConfig {
            min_states: 3,
            max_states: 2,
            ..SchedulerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LazyBeaverError::ConfigError(_))
        ));

        let config = SchedulerConfig {
            max_states: MAX_STATES + 1,
            ..SchedulerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(LazyBeaverError::InvalidSize(MAX_STATES + 1))
        );

        let mut config = SchedulerConfig::default();
        config.seeds.insert(0, 10);
        assert!(config.validate().is_err());

        let config = SchedulerConfig {
            max_budget: Some(10),
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_with_defaults() {
        let config: SchedulerConfig =
            serde_json::from_str(r#"{"max_states": 3, "seeds": {"3": 500}}"#).unwrap();

        assert_eq!(config.max_states, 3);
        assert_eq!(config.seeds.get(&3), Some(&500));
        assert_eq!(config.initial_budget, DEFAULT_INITIAL_BUDGET);
        assert!(config.carry_budget);
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        let result: Result<SchedulerConfig, _> = serde_json::from_str(r#"{"budget": 3}"#);
        assert!(result.is_err());
    }
}
