//! Feasibility oracle for edge exclusions.
//!
//! # Algorithm
//!
//! Excluding an edge forbids it for the rest of the search. The exclusion
//! is only worth exploring if the residual instance can still be toured:
//!
//! 1. every unresolved vertex and the depot must be reachable from the
//!    vertex being branched on, and
//! 2. every unresolved vertex must still have a path back to the depot.
//!
//! Resolved vertices (customers already fixed on the path) are never
//! entered. Both checks are necessary conditions, so rejecting an
//! exclusion never cuts off a feasible tour.

use super::{bfs, EdgeId, EdgeSet, Graph};

/// Answers whether excluding one more edge keeps the instance tourable.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::graph::{ConnectivityOracle, CostMatrix, EdgeSet, Graph};
///
/// let costs = CostMatrix::from_off_diagonal(3, vec![1.0; 6]).unwrap();
/// let graph = Graph::from_matrix(&[0.0, 1.0, 1.0], &costs).unwrap();
/// let oracle = ConnectivityOracle::new(&graph, 0);
///
/// let nothing = EdgeSet::new(&graph);
/// let trial = graph.edge_between(0, 1).unwrap();
/// assert!(oracle.is_feasible_exclusion(&nothing, &[false; 3], trial, 0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConnectivityOracle<'a> {
    graph: &'a Graph,
    depot: usize,
}

impl<'a> ConnectivityOracle<'a> {
    /// Creates an oracle over `graph` rooted at `depot`.
    pub fn new(graph: &'a Graph, depot: usize) -> Self {
        Self { graph, depot }
    }

    /// Returns `true` if excluding `trial_edge` on top of `excluded_edges`
    /// still lets a tour leave `from_vertex`, cover every vertex not in
    /// `excluded_vertices` and end at the depot.
    pub fn is_feasible_exclusion(
        &self,
        excluded_edges: &EdgeSet,
        excluded_vertices: &[bool],
        trial_edge: EdgeId,
        from_vertex: usize,
    ) -> bool {
        let n = self.graph.num_locations();
        let depot = self.depot;
        let ignore = |e: EdgeId| e == trial_edge || excluded_edges.contains(e);

        let mut resolved = excluded_vertices.to_vec();
        resolved[depot] = false;
        if from_vertex != depot {
            resolved[from_vertex] = true;
        }

        let forward = bfs(self.graph, from_vertex, &resolved, ignore, None);
        if (0..n).any(|v| !resolved[v] && !forward.reached(v)) {
            return false;
        }

        // Vertices already known to reach the depot.
        let mut closes = vec![false; n];
        closes[depot] = true;
        for v in 0..n {
            if resolved[v] || closes[v] || v == from_vertex {
                continue;
            }
            let back = bfs(self.graph, v, &resolved, ignore, Some(depot));
            match back.path_to(depot) {
                Some(path) => path.into_iter().for_each(|u| closes[u] = true),
                None => return false,
            }
        }
        true
    }
}
