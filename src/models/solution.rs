//! Solution and violation types.

use std::fmt;

use serde::Serialize;

use super::Route;
use crate::graph::{DirectedEdge, EdgeId, Graph};

/// A type of constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// The first edge does not leave the depot or the last one does not
    /// return to it.
    NotRootedAtDepot,
    /// Edge `position` does not start where the previous edge ended.
    Disconnected {
        /// Index of the offending edge.
        position: usize,
    },
    /// A customer is entered more than once.
    CustomerRepeated {
        /// Customer ID.
        customer_id: usize,
        /// Number of visits.
        visits: usize,
    },
    /// A customer is never visited.
    CustomerMissing {
        /// Customer ID.
        customer_id: usize,
    },
    /// No unused vehicle can carry the route's load.
    NoVehicleFits {
        /// Route index in the solution.
        route_index: usize,
        /// Load of the route.
        load: f64,
    },
    /// The recorded total differs from the sum of the graph's edge costs.
    CostMismatch {
        /// Cost stored in the solution.
        recorded: f64,
        /// Cost recomputed from the graph.
        computed: f64,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// An ordered sequence of edges forming one or more depot-rooted routes.
///
/// Routes follow each other in travel order: the edge after a return to
/// the depot starts the next route. The total cost is the sum of the edge
/// costs and is fixed at construction.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::graph::DirectedEdge;
/// use cvrp_bnb::models::Solution;
///
/// let sol = Solution::from_edges(vec![
///     DirectedEdge::new(0, 2, 4.0),
///     DirectedEdge::new(2, 0, 4.0),
///     DirectedEdge::new(0, 1, 1.5),
///     DirectedEdge::new(1, 0, 2.5),
/// ]);
/// assert_eq!(sol.cost(), 12.0);
/// assert_eq!(sol.num_routes(), 2);
/// assert_eq!(sol.vertex_path(), vec![0, 2, 0, 1, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    edges: Vec<DirectedEdge>,
    cost: f64,
}

impl Solution {
    /// Builds a solution from edges in travel order.
    pub fn from_edges(edges: Vec<DirectedEdge>) -> Self {
        let cost = edges.iter().map(|e| e.cost()).sum();
        Self { edges, cost }
    }

    /// Builds a solution from graph edge ids in travel order.
    pub fn from_edge_ids(graph: &Graph, ids: impl IntoIterator<Item = EdgeId>) -> Self {
        Self::from_edges(ids.into_iter().map(|id| *graph.edge(id)).collect())
    }

    /// Edges in travel order.
    pub fn edges(&self) -> &[DirectedEdge] {
        &self.edges
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Total cost.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Vertex every route starts from, if the solution has any edge.
    pub fn depot(&self) -> Option<usize> {
        self.edges.first().map(|e| e.origin())
    }

    /// Number of depot-to-depot routes.
    pub fn num_routes(&self) -> usize {
        match self.depot() {
            Some(depot) => self
                .edges
                .iter()
                .filter(|e| e.destination() == depot)
                .count(),
            None => 0,
        }
    }

    /// Visited vertices in order, starting with the depot.
    pub fn vertex_path(&self) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.edges.len() + 1);
        if let Some(depot) = self.depot() {
            path.push(depot);
        }
        path.extend(self.edges.iter().map(|e| e.destination()));
        path
    }

    /// Splits the edges into routes, computing each route's cost and load.
    ///
    /// A trailing route that never returns to the depot is reported as is.
    pub fn routes(&self, graph: &Graph) -> Vec<Route> {
        let Some(depot) = self.depot() else {
            return Vec::new();
        };
        let mut routes = Vec::new();
        let mut customers = Vec::new();
        let mut cost = 0.0;
        let mut load = 0.0;
        for edge in &self.edges {
            cost += edge.cost();
            if edge.destination() == depot {
                routes.push(Route::new(std::mem::take(&mut customers), cost, load));
                cost = 0.0;
                load = 0.0;
            } else {
                customers.push(edge.destination());
                load += graph.demand(edge.destination());
            }
        }
        if !customers.is_empty() {
            routes.push(Route::new(customers, cost, load));
        }
        routes
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution cost: {:.6}", self.cost)?;
        let path: Vec<String> = self.vertex_path().iter().map(|v| v.to_string()).collect();
        write!(f, "Solution path: {}", path.join(" "))
    }
}

/// Formats the outcome of a solve, including the infeasible case.
pub fn report(solution: Option<&Solution>) -> String {
    match solution {
        Some(s) => s.to_string(),
        None => "No solution!".to_string(),
    }
}
