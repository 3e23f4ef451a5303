//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::models::CapacityPolicy;

/// How long the branch-and-bound search may run.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::search::IterationBudget;
///
/// assert_eq!(IterationBudget::from(0), IterationBudget::Unlimited);
/// assert_eq!(IterationBudget::from(500), IterationBudget::Steps(500));
/// assert_eq!(IterationBudget::from(-1), IterationBudget::FirstSolution);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationBudget {
    /// Explore the whole tree.
    #[default]
    Unlimited,
    /// Stop after this many expansion steps.
    Steps(u64),
    /// Stop as soon as a feasible solution is known.
    FirstSolution,
}

impl From<i64> for IterationBudget {
    /// Maps the integer encoding: `0` unlimited, positive step cap,
    /// negative first solution.
    fn from(budget: i64) -> Self {
        match budget {
            0 => Self::Unlimited,
            n if n > 0 => Self::Steps(n.unsigned_abs()),
            _ => Self::FirstSolution,
        }
    }
}

/// Configuration of the exact search.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::models::CapacityPolicy;
/// use cvrp_bnb::search::{IterationBudget, SolverConfig};
///
/// let config = SolverConfig::new()
///     .with_iteration_budget(IterationBudget::Steps(10_000))
///     .with_capacity_policy(CapacityPolicy::BestFit);
/// assert_eq!(config.iteration_budget, IterationBudget::Steps(10_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Stop rule of the search.
    pub iteration_budget: IterationBudget,
    /// Vehicle chosen for a route that returns to the depot.
    pub capacity_policy: CapacityPolicy,
}

impl SolverConfig {
    /// Unlimited search with best-fit vehicle assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stop rule.
    pub fn with_iteration_budget(mut self, budget: IterationBudget) -> Self {
        self.iteration_budget = budget;
        self
    }

    /// Sets the vehicle assignment policy.
    pub fn with_capacity_policy(mut self, policy: CapacityPolicy) -> Self {
        self.capacity_policy = policy;
        self
    }
}
