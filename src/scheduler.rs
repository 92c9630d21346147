//! The step-budget scheduler.
//!
//! For each machine size the scheduler runs the search at increasing budgets. A search whose
//! halting step counts cover every step up to the budget cannot decide the value, so the
//! budget grows and the search restarts from scratch. The first search that leaves a gap
//! settles the size.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::search::search;
use crate::types::LazyBeaverError;

/// The outcome of one scheduling attempt for one machine size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// No machine of this size halts after exactly `value` steps, and every smaller step
    /// count is reached by some machine.
    Confirmed {
        size: usize,
        value: u64,
        budget: u64,
        machines_searched: u64,
    },
    /// Every step count up to `budget` is reached; the search continues with a larger budget.
    Exceeds {
        size: usize,
        budget: u64,
        machines_searched: u64,
    },
    /// Every step count up to `budget` is reached and the schedule allows no larger budget.
    Unresolved {
        size: usize,
        budget: u64,
        machines_searched: u64,
    },
}

impl Verdict {
    /// The machine size this verdict is about.
    pub fn size(&self) -> usize {
        match self {
            Verdict::Confirmed { size, .. }
            | Verdict::Exceeds { size, .. }
            | Verdict::Unresolved { size, .. } => *size,
        }
    }

    /// The number of machines searched for this verdict.
    pub fn machines_searched(&self) -> u64 {
        match self {
            Verdict::Confirmed {
                machines_searched, ..
            }
            | Verdict::Exceeds {
                machines_searched, ..
            }
            | Verdict::Unresolved {
                machines_searched, ..
            } => *machines_searched,
        }
    }

    /// Returns `true` if this verdict ends the work on its size.
    pub fn is_final(&self) -> bool {
        !matches!(self, Verdict::Exceeds { .. })
    }
}

/// Yields one `Verdict` per search, moving through sizes `min_states..=max_states`.
pub struct Scheduler {
    config: SchedulerConfig,
    size: usize,
    budget: u64,
}

impl Scheduler {
    /// Creates a scheduler after validating `config`.
    pub fn new(config: SchedulerConfig) -> Result<Self, LazyBeaverError> {
        config.validate()?;
        let size = config.min_states;
        let budget = config.starting_budget(size, None);
        Ok(Self {
            config,
            size,
            budget,
        })
    }

    fn settle(&mut self, settled_at: u64) {
        self.size += 1;
        self.budget = self.config.starting_budget(self.size, Some(settled_at));
    }
}

impl Iterator for Scheduler {
    type Item = Result<Verdict, LazyBeaverError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.size > self.config.max_states {
            return None;
        }

        let (size, budget) = (self.size, self.budget);
        let result = match search(size, budget) {
            Ok(result) => result,
            Err(e) => {
                self.size = self.config.max_states + 1;
                return Some(Err(e));
            }
        };
        let machines_searched = result.machines_searched;

        let verdict = match result.lazy_beaver(budget) {
            Some(value) => {
                self.settle(budget);
                Verdict::Confirmed {
                    size,
                    value,
                    budget,
                    machines_searched,
                }
            }
            None => match self.config.next_budget(budget) {
                Some(next) => {
                    self.budget = next;
                    Verdict::Exceeds {
                        size,
                        budget,
                        machines_searched,
                    }
                }
                None => {
                    self.settle(budget);
                    Verdict::Unresolved {
                        size,
                        budget,
                        machines_searched,
                    }
                }
            },
        };

        if verdict.is_final() {
            info!("{:?}", verdict);
        } else {
            debug!("{:?}", verdict);
        }
        Some(Ok(verdict))
    }
}

/// Computes the Lazy Beaver value of `size`-state machines, trying budgets 1, 10, 100, ...
///
/// # Errors
///
/// * `LazyBeaverError::InvalidSize` if `size` is zero or above `MAX_STATES`.
/// * `LazyBeaverError::BudgetExhausted` if the budget would overflow before a value is found.
pub fn lazy_beaver(size: usize) -> Result<u64, LazyBeaverError> {
    let mut last_budget = 0;
    for verdict in Scheduler::new(SchedulerConfig::for_size(size))? {
        match verdict? {
            Verdict::Confirmed { value, .. } => return Ok(value),
            Verdict::Exceeds { budget, .. } | Verdict::Unresolved { budget, .. } => {
                last_budget = budget
            }
        }
    }
    Err(LazyBeaverError::BudgetExhausted {
        size,
        budget: last_budget,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_size_from_budget_one() {
        let verdicts: Vec<Verdict> = Scheduler::new(SchedulerConfig::for_size(1))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            verdicts,
            vec![
                Verdict::Exceeds {
                    size: 1,
                    budget: 1,
                    machines_searched: 4,
                },
                Verdict::Confirmed {
                    size: 1,
                    value: 2,
                    budget: 10,
                    machines_searched: 4,
                },
            ]
        );
    }

    #[test]
    fn test_sizes_in_sequence() {
        let config = SchedulerConfig {
            max_states: 2,
            initial_budget: 10,
            ..SchedulerConfig::default()
        };
        let verdicts: Vec<Verdict> = Scheduler::new(config)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        let confirmed: Vec<(usize, u64)> = verdicts
            .iter()
            .filter_map(|verdict| match verdict {
                Verdict::Confirmed { size, value, .. } => Some((*size, *value)),
                _ => None,
            })
            .collect();
        assert_eq!(confirmed, vec![(1, 2), (2, 7)]);
        assert!(verdicts.iter().all(Verdict::is_final));
    }

    #[test]
    fn test_gives_up_at_max_budget() {
        let config = SchedulerConfig {
            min_states: 3,
            max_states: 3,
            initial_budget: 1,
            max_budget: Some(10),
            ..SchedulerConfig::default()
        };
        let verdicts: Vec<Verdict> = Scheduler::new(config)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(verdicts.len(), 2);
        assert!(matches!(verdicts[0], Verdict::Exceeds { budget: 1, .. }));
        assert!(matches!(
            verdicts[1],
            Verdict::Unresolved {
                size: 3,
                budget: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_searches_at_max_budget_before_giving_up() {
        let config = SchedulerConfig {
            min_states: 3,
            max_states: 3,
            initial_budget: 10,
            max_budget: Some(50),
            ..SchedulerConfig::default()
        };
        let verdicts: Vec<Verdict> = Scheduler::new(config)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(verdicts.len(), 2);
        assert!(matches!(verdicts[0], Verdict::Exceeds { budget: 10, .. }));
        assert!(matches!(
            verdicts[1],
            Verdict::Confirmed {
                size: 3,
                value: 22,
                budget: 50,
                ..
            }
        ));
    }

    #[test]
    fn test_never_searches_beyond_max_budget() {
        let mut config = SchedulerConfig {
            max_states: 2,
            initial_budget: 10,
            max_budget: Some(10),
            ..SchedulerConfig::default()
        };
        config.seeds.insert(2, 1000);
        assert!(matches!(
            Scheduler::new(config.clone()),
            Err(LazyBeaverError::ConfigError(_))
        ));

        config.seeds.clear();
        let verdicts: Vec<Verdict> = Scheduler::new(config)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(verdicts.iter().all(|verdict| match verdict {
            Verdict::Confirmed { budget, .. }
            | Verdict::Exceeds { budget, .. }
            | Verdict::Unresolved { budget, .. } => *budget <= 10,
        }));
    }

    #[test]
    fn test_seed_overrides_carried_budget() {
        let mut config = SchedulerConfig {
            max_states: 2,
            initial_budget: 10,
            ..SchedulerConfig::default()
        };
        config.seeds.insert(2, 50);

        let verdicts: Vec<Verdict> = Scheduler::new(config)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(matches!(
            verdicts.last(),
            Some(Verdict::Confirmed {
                size: 2,
                value: 7,
                budget: 50,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SchedulerConfig {
            growth_factor: 0,
            ..SchedulerConfig::default()
        };
        assert!(Scheduler::new(config).is_err());
    }

    #[test]
    fn test_lazy_beaver() {
        assert_eq!(lazy_beaver(1), Ok(2));
        assert_eq!(lazy_beaver(2), Ok(7));
        assert_eq!(lazy_beaver(0), Err(LazyBeaverError::InvalidSize(0)));
    }

    #[test]
    fn test_verdict_json() {
        let verdict = Verdict::Confirmed {
            size: 2,
            value: 7,
            budget: 10,
            machines_searched: 123,
        };
        let json = serde_json::to_string(&verdict).unwrap();

        assert!(json.contains("\"verdict\":\"confirmed\""));
        assert!(json.contains("\"value\":7"));
        assert_eq!(verdict.size(), 2);
        assert_eq!(verdict.machines_searched(), 123);
    }
}
