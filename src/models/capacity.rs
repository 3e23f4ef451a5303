//! Vehicle capacity multiset.

use serde::{Deserialize, Serialize};

/// Rule used to pick the vehicle that serves a closed route.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::models::{CapacityList, CapacityPolicy};
///
/// let fleet = CapacityList::new([10.0, 20.0, 30.0]);
///
/// let mut best_fit = fleet.duplicate();
/// assert_eq!(best_fit.take(15.0, CapacityPolicy::BestFit), Some(20.0));
///
/// let mut largest = fleet.duplicate();
/// assert_eq!(largest.take(15.0, CapacityPolicy::LargestFirst), Some(30.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// Smallest capacity that still holds the demand.
    #[default]
    BestFit,
    /// Largest remaining capacity, if it holds the demand.
    LargestFirst,
}

/// An ascending multiset of vehicle capacities, one entry per vehicle.
///
/// The search engine shares one list between many decision nodes and
/// only copies it when a node actually consumes a vehicle.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::models::{CapacityList, CapacityPolicy};
///
/// let mut fleet = CapacityList::new([8.0, 3.0, 8.0]);
/// assert_eq!(fleet.as_slice(), &[3.0, 8.0, 8.0]);
/// assert_eq!(fleet.largest(), Some(8.0));
///
/// assert_eq!(fleet.take(4.0, CapacityPolicy::BestFit), Some(8.0));
/// assert_eq!(fleet.take(9.0, CapacityPolicy::BestFit), None);
/// assert_eq!(fleet.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CapacityList {
    capacities: Vec<f64>,
}

impl CapacityList {
    /// Creates a list from capacities in any order.
    pub fn new(capacities: impl IntoIterator<Item = f64>) -> Self {
        let mut capacities: Vec<f64> = capacities.into_iter().collect();
        capacities.sort_by(|a, b| a.total_cmp(b));
        Self { capacities }
    }

    /// Returns a structural copy of this list.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Number of vehicles still available.
    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    /// Returns `true` if no vehicle is left.
    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }

    /// Remaining capacities in ascending order.
    pub fn as_slice(&self) -> &[f64] {
        &self.capacities
    }

    /// Largest remaining capacity.
    pub fn largest(&self) -> Option<f64> {
        self.capacities.last().copied()
    }

    /// Returns `true` if some remaining vehicle can hold `demand`.
    pub fn fits(&self, demand: f64) -> bool {
        self.largest().is_some_and(|c| demand <= c)
    }

    /// Index of the capacity the policy would consume for `demand`.
    pub fn position_for(&self, demand: f64, policy: CapacityPolicy) -> Option<usize> {
        match policy {
            CapacityPolicy::BestFit => {
                let idx = self.capacities.partition_point(|&c| c < demand);
                (idx < self.capacities.len()).then_some(idx)
            }
            CapacityPolicy::LargestFirst => {
                let last = self.capacities.len().checked_sub(1)?;
                (self.capacities[last] >= demand).then_some(last)
            }
        }
    }

    /// Removes the capacity chosen by `policy` for `demand` and returns it.
    ///
    /// Returns `None` and leaves the list untouched when no remaining
    /// vehicle can hold the demand.
    pub fn take(&mut self, demand: f64, policy: CapacityPolicy) -> Option<f64> {
        let idx = self.position_for(demand, policy)?;
        Some(self.capacities.remove(idx))
    }
}

impl FromIterator<f64> for CapacityList {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter)
    }
}
