//! Pairwise swap improvement on the giant tour.
//!
//! # Algorithm
//!
//! The solution is linearized into a giant tour. For every pair of
//! positions `1 ≤ i < j` before the final depot, the two vertices are
//! exchanged and the tour is decoded again. Swapping a customer with a
//! depot separator moves a route boundary, so the move reshapes routes as
//! well as reordering them. The first cheaper feasible swap is kept and the
//! scan restarts from the accepted solution; a full pass without
//! improvement ends the search.
//!
//! # Complexity
//!
//! O(n²) decodings of O(n) each per pass, where n = tour length.

use log::trace;

use super::GiantTour;
use crate::graph::Graph;
use crate::models::{CapacityList, CapacityPolicy, Solution};

/// Minimum gain for a swap to count as an improvement.
const IMPROVEMENT_EPS: f64 = 1e-10;

/// Improves a solution by pairwise swaps with best-fit vehicle assignment.
///
/// The returned solution never costs more than `solution`, and refining it
/// again returns it unchanged.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::graph::{CostMatrix, Graph};
/// use cvrp_bnb::local_search::{refine, GiantTour};
/// use cvrp_bnb::models::{CapacityList, CapacityPolicy};
///
/// // Depot to customer costs 10, between customers 1.
/// let costs = CostMatrix::from_off_diagonal(3, vec![10.0, 10.0, 10.0, 1.0, 10.0, 1.0]).unwrap();
/// let graph = Graph::from_matrix(&[0.0, 2.0, 2.0], &costs).unwrap();
/// let fleet = CapacityList::new([5.0, 5.0]);
///
/// let star = GiantTour::from_sequence(vec![0, 1, 0, 2, 0], 0)
///     .to_solution(&graph, &fleet, CapacityPolicy::BestFit)
///     .unwrap();
/// assert_eq!(star.cost(), 40.0);
///
/// let refined = refine(&star, &graph, &fleet, 0);
/// assert_eq!(refined.cost(), 21.0);
/// assert_eq!(refined.num_routes(), 1);
/// ```
pub fn refine(
    solution: &Solution,
    graph: &Graph,
    capacities: &CapacityList,
    depot: usize,
) -> Solution {
    refine_with(solution, graph, capacities, depot, CapacityPolicy::default())
}

/// Same as [`refine`] with an explicit vehicle assignment policy.
pub fn refine_with(
    solution: &Solution,
    graph: &Graph,
    capacities: &CapacityList,
    depot: usize,
    policy: CapacityPolicy,
) -> Solution {
    let mut best = solution.clone();
    let mut tour = GiantTour::from_solution(&best, depot);
    let mut accepted = 0usize;

    'scan: loop {
        let last = tour.len() - 1;
        for i in 1..last {
            for j in (i + 1)..last {
                if tour.sequence()[i] == tour.sequence()[j] {
                    continue;
                }
                tour.swap(i, j);
                if let Some(candidate) = tour.to_solution(graph, capacities, policy) {
                    if candidate.cost() < best.cost() - IMPROVEMENT_EPS {
                        trace!(
                            "swap ({}, {}) improves {:.6} -> {:.6}",
                            i,
                            j,
                            best.cost(),
                            candidate.cost()
                        );
                        best = candidate;
                        tour = GiantTour::from_solution(&best, depot);
                        accepted += 1;
                        continue 'scan;
                    }
                }
                tour.swap(i, j);
            }
        }
        break;
    }

    trace!("swap refinement accepted {} moves", accepted);
    best
}
