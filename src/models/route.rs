//! Route type.

use serde::Serialize;

/// One depot-to-depot trip of a solution.
///
/// A route lists the customers it serves in travel order; the depot at
/// both ends is not stored in `customers`.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::models::Route;
///
/// let route = Route::new(vec![3, 1], 12.0, 7.5);
/// assert_eq!(route.len(), 2);
/// assert_eq!(route.customers(), &[3, 1]);
/// assert_eq!(route.load(), 7.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    customers: Vec<usize>,
    cost: f64,
    load: f64,
}

impl Route {
    /// Creates a route from its customers, travel cost and total demand.
    pub fn new(customers: Vec<usize>, cost: f64, load: f64) -> Self {
        Self {
            customers,
            cost,
            load,
        }
    }

    /// Customers in visit order.
    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    /// Number of customers served.
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Returns `true` if the route serves no customer.
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Travel cost including both depot legs.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Total demand served, i.e. the capacity the assigned vehicle needs.
    pub fn load(&self) -> f64 {
        self.load
    }
}
