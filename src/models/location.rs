//! Location type.

use serde::{Deserialize, Serialize};

/// A location (customer or depot) of a routing instance.
///
/// Location 0 is conventionally the depot. The depot's demand is ignored
/// when checking route legality.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::models::Location;
///
/// let depot = Location::depot();
/// assert_eq!(depot.id(), 0);
/// assert_eq!(depot.demand(), 0.0);
///
/// let c = Location::new(3, 12.5);
/// assert_eq!(c.id(), 3);
/// assert_eq!(c.demand(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: usize,
    demand: f64,
}

impl Location {
    /// Creates a new location.
    pub fn new(id: usize, demand: f64) -> Self {
        Self { id, demand }
    }

    /// Creates the conventional depot (id=0, demand=0).
    pub fn depot() -> Self {
        Self::new(0, 0.0)
    }

    /// Location ID, also its index in the graph.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Demand to be served at this location.
    pub fn demand(&self) -> f64 {
        self.demand
    }
}
