//! Giant-tour encoding of a multi-route solution.
//!
//! A giant tour lists every visited vertex in travel order with the depot
//! acting as route separator: `[0, 1, 2, 0, 3, 0]` is the two routes
//! `0→1→2→0` and `0→3→0`. Any permutation of the interior positions is
//! again a giant tour; decoding it skips empty depot-to-depot legs and
//! hands each route a vehicle.

use crate::graph::Graph;
use crate::models::{CapacityList, CapacityPolicy, Solution};

/// Vertex sequence of a solution, depot first and last.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::graph::{CostMatrix, Graph};
/// use cvrp_bnb::local_search::GiantTour;
/// use cvrp_bnb::models::{CapacityList, CapacityPolicy};
///
/// let costs = CostMatrix::from_off_diagonal(3, vec![1.0; 6]).unwrap();
/// let graph = Graph::from_matrix(&[0.0, 2.0, 2.0], &costs).unwrap();
/// let fleet = CapacityList::new([4.0]);
///
/// let mut tour = GiantTour::from_sequence(vec![0, 1, 0, 2, 0], 0);
/// tour.swap(2, 3);
/// assert_eq!(tour.sequence(), &[0, 1, 2, 0, 0]);
///
/// let merged = tour.to_solution(&graph, &fleet, CapacityPolicy::BestFit).unwrap();
/// assert_eq!(merged.vertex_path(), vec![0, 1, 2, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiantTour {
    sequence: Vec<usize>,
    depot: usize,
}

impl GiantTour {
    /// Wraps a raw sequence. A missing leading or trailing depot is added.
    pub fn from_sequence(mut sequence: Vec<usize>, depot: usize) -> Self {
        if sequence.first() != Some(&depot) {
            sequence.insert(0, depot);
        }
        if sequence.len() < 2 || sequence.last() != Some(&depot) {
            sequence.push(depot);
        }
        Self { sequence, depot }
    }

    /// Linearizes a solution. An empty solution becomes `[depot, depot]`.
    pub fn from_solution(solution: &Solution, depot: usize) -> Self {
        Self::from_sequence(solution.vertex_path(), depot)
    }

    /// Vertices in travel order.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Number of positions, both end depots included.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns `true` if the tour visits no customer.
    pub fn is_empty(&self) -> bool {
        self.sequence.iter().all(|&v| v == self.depot)
    }

    /// The route separator.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Exchanges the vertices at positions `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.sequence.swap(i, j);
    }

    /// Decodes the sequence into a solution.
    ///
    /// Every route takes a vehicle from a fresh copy of `capacities` under
    /// `policy`. Returns `None` if a route finds no vehicle, an edge is
    /// missing from the graph, or the sequence does not end at the depot.
    pub fn to_solution(
        &self,
        graph: &Graph,
        capacities: &CapacityList,
        policy: CapacityPolicy,
    ) -> Option<Solution> {
        let mut fleet = capacities.duplicate();
        let mut edges = Vec::with_capacity(self.sequence.len());
        let mut load = 0.0;
        let mut at = *self.sequence.first()?;
        for &next in &self.sequence[1..] {
            if next == self.depot && at == self.depot {
                continue;
            }
            edges.push(graph.edge_between(at, next)?);
            if next == self.depot {
                fleet.take(load, policy)?;
                load = 0.0;
            } else {
                load += graph.demand(next);
            }
            at = next;
        }
        (at == self.depot).then(|| Solution::from_edge_ids(graph, edges))
    }
}
