//! Solution evaluator that recomputes cost and checks feasibility.

use crate::graph::Graph;
use crate::models::{CapacityList, CapacityPolicy, Solution, Violation, ViolationType};

/// Checks a solution against its instance: depot-rooted, connected routes,
/// every customer visited exactly once, and a distinct vehicle able to carry
/// each route's load.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::graph::{CostMatrix, Graph};
/// use cvrp_bnb::models::{CapacityList, Solution};
/// use cvrp_bnb::evaluation::SolutionEvaluator;
///
/// let costs = CostMatrix::from_off_diagonal(3, vec![1.0; 6]).unwrap();
/// let graph = Graph::from_matrix(&[0.0, 4.0, 5.0], &costs).unwrap();
/// let fleet = CapacityList::new([10.0]);
///
/// let ids = [(0, 1), (1, 2), (2, 0)].map(|(a, b)| graph.edge_between(a, b).unwrap());
/// let sol = Solution::from_edge_ids(&graph, ids);
///
/// let evaluator = SolutionEvaluator::new(&graph, &fleet, 0);
/// let (cost, violations) = evaluator.evaluate(&sol);
/// assert_eq!(cost, 3.0);
/// assert!(violations.is_empty());
/// ```
pub struct SolutionEvaluator<'a> {
    graph: &'a Graph,
    capacities: &'a CapacityList,
    depot: usize,
}

impl<'a> SolutionEvaluator<'a> {
    /// Creates a new evaluator for the given instance.
    pub fn new(graph: &'a Graph, capacities: &'a CapacityList, depot: usize) -> Self {
        Self {
            graph,
            capacities,
            depot,
        }
    }

    /// Evaluates a solution, returning `(cost, violations)`.
    ///
    /// The cost is recomputed from the graph's edge costs. A feasible
    /// solution has an empty violations list.
    pub fn evaluate(&self, solution: &Solution) -> (f64, Vec<Violation>) {
        let n = self.graph.num_locations();
        let edges = solution.edges();
        let mut violations = Vec::new();

        let rooted = edges.first().is_some_and(|e| e.origin() == self.depot)
            && edges.last().is_some_and(|e| e.destination() == self.depot);
        if !rooted {
            violations.push(Violation::new(ViolationType::NotRootedAtDepot));
        }

        let mut computed = 0.0;
        let mut visits = vec![0usize; n];
        for (position, edge) in edges.iter().enumerate() {
            if position > 0 && edges[position - 1].destination() != edge.origin() {
                violations.push(Violation::new(ViolationType::Disconnected { position }));
            }
            computed += self
                .graph
                .cost(edge.origin(), edge.destination())
                .unwrap_or(f64::INFINITY);
            visits[edge.destination()] += 1;
        }

        for (customer_id, &count) in visits.iter().enumerate() {
            if customer_id == self.depot {
                continue;
            }
            match count {
                0 => violations.push(Violation::new(ViolationType::CustomerMissing {
                    customer_id,
                })),
                1 => {}
                visits => violations.push(Violation::new(ViolationType::CustomerRepeated {
                    customer_id,
                    visits,
                })),
            }
        }

        // Best-fit in any route order succeeds iff some assignment exists.
        let mut fleet = self.capacities.duplicate();
        for (route_index, route) in solution.routes(self.graph).iter().enumerate() {
            if fleet.take(route.load(), CapacityPolicy::BestFit).is_none() {
                violations.push(Violation::new(ViolationType::NoVehicleFits {
                    route_index,
                    load: route.load(),
                }));
            }
        }

        let tolerance = 1e-9 * computed.abs().max(1.0);
        if (solution.cost() - computed).abs() > tolerance {
            violations.push(Violation::new(ViolationType::CostMismatch {
                recorded: solution.cost(),
                computed,
            }));
        }

        (computed, violations)
    }

    /// Returns `true` if the solution has no violation.
    pub fn is_feasible(&self, solution: &Solution) -> bool {
        self.evaluate(solution).1.is_empty()
    }
}
