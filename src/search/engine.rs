//! Exact depth-first branch-and-bound over edge decisions.
//!
//! # Algorithm
//!
//! Starting from the depot, each step takes the node under the cursor and
//! branches on the cheapest out-edge of its vertex that is still open:
//! one child includes the edge, the other forbids it for the rest of the
//! tour. Children are explored include-first.
//!
//! A node standing on the depot with an open route first takes a vehicle
//! for that route. Once every customer has been visited and the tour is
//! back at the depot, the tour is a candidate solution.
//!
//! Nodes are discarded when their lower bound cannot beat the incumbent,
//! when the open route outgrows every remaining vehicle, or (for exclude
//! children) when the remaining graph can no longer be toured. The upper
//! bound of every kept node is the cost of a concrete completion; beating
//! the incumbent makes that completion the new incumbent.
//!
//! # Complexity
//!
//! Exponential in the worst case. Memory is bounded by the depth of the
//! tree times two, since explored subtrees are released on backtrack.
//!
//! # Reference
//!
//! Little, J.D.C., Murty, K.G., Sweeney, D.W. & Karel, C. (1963). "An
//! Algorithm for the Traveling Salesman Problem", *Operations Research*
//! 11(6), 972-989.

use std::rc::Rc;

use log::{debug, trace};
use serde::Serialize;

use super::bounds::{BoundEstimator, Bounds, Decisions};
use super::config::{IterationBudget, SolverConfig};
use super::tree::{Branch, DecisionNode, DecisionTree, NodeId};
use crate::graph::{ConnectivityOracle, EdgeId, Graph};
use crate::models::{CapacityList, Solution};

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// The whole tree was explored; the solution is optimal.
    Exhausted,
    /// The step budget ran out.
    BudgetSpent,
    /// A feasible solution was found and the budget asked for no more.
    FirstSolution,
}

/// Counters collected during one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes expanded.
    pub steps: u64,
    /// Nodes stored in the tree, the root included.
    pub nodes_created: u64,
    /// Largest number of nodes alive at once.
    pub peak_nodes: usize,
    /// Nodes or children dropped because their bound could not win.
    pub pruned_by_bound: u64,
    /// Children or routes rejected for lack of a large enough vehicle.
    pub capacity_failures: u64,
    /// Exclusions refused by the connectivity check.
    pub exclusions_rejected: u64,
    /// Times the incumbent improved.
    pub incumbent_updates: u64,
    /// Nodes with no edge left to branch on.
    pub dead_ends: u64,
}

/// Result of [`BranchAndBound::solve`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best solution found, `None` if no feasible tour was found.
    pub solution: Option<Solution>,
    /// Why the search stopped.
    pub status: SearchStatus,
    /// Search counters.
    pub stats: SearchStats,
}

/// Best solution known so far.
#[derive(Debug, Default)]
struct Incumbent {
    best: Option<Solution>,
}

impl Incumbent {
    /// Cost every new solution has to beat.
    fn bound(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, Solution::cost)
    }

    /// Keeps `solution` if it is strictly cheaper.
    fn offer(&mut self, solution: Solution, stats: &mut SearchStats) {
        if solution.cost() < self.bound() {
            debug!(
                "new incumbent with cost {:.6} after {} steps",
                solution.cost(),
                stats.steps
            );
            stats.incumbent_updates += 1;
            self.best = Some(solution);
        }
    }
}

/// Exact CVRP solver.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::graph::{CostMatrix, Graph};
/// use cvrp_bnb::models::CapacityList;
/// use cvrp_bnb::search::{BranchAndBound, SearchStatus, SolverConfig};
///
/// // Two customers far apart from each other, one vehicle per customer.
/// let costs = CostMatrix::from_off_diagonal(3, vec![
///     1.0, 1.0,
///     1.0, 9.0,
///     1.0, 9.0,
/// ]).unwrap();
/// let graph = Graph::from_matrix(&[0.0, 3.0, 3.0], &costs).unwrap();
/// let fleet = CapacityList::new([5.0, 5.0]);
///
/// let outcome = BranchAndBound::new(&graph, &fleet, 0, SolverConfig::new()).solve();
/// assert_eq!(outcome.status, SearchStatus::Exhausted);
/// let best = outcome.solution.unwrap();
/// assert_eq!(best.cost(), 4.0);
/// assert_eq!(best.num_routes(), 2);
/// ```
pub struct BranchAndBound<'a> {
    graph: &'a Graph,
    capacities: &'a CapacityList,
    depot: usize,
    config: SolverConfig,
    estimator: BoundEstimator<'a>,
    oracle: ConnectivityOracle<'a>,
}

impl<'a> BranchAndBound<'a> {
    /// Creates a solver for one instance.
    pub fn new(
        graph: &'a Graph,
        capacities: &'a CapacityList,
        depot: usize,
        config: SolverConfig,
    ) -> Self {
        debug_assert!(depot < graph.num_locations());
        Self {
            graph,
            capacities,
            depot,
            config,
            estimator: BoundEstimator::new(graph, depot, config.capacity_policy),
            oracle: ConnectivityOracle::new(graph, depot),
        }
    }

    /// Runs the search until the tree is exhausted or the budget is spent.
    pub fn solve(&self) -> SearchOutcome {
        let mut stats = SearchStats::default();
        let mut incumbent = Incumbent::default();

        let root = DecisionNode::root(self.depot, Rc::new(self.capacities.duplicate()));
        let decisions = Decisions::new(self.graph, self.depot);
        let root = self.bound_node(root, &decisions, &mut incumbent, &mut stats);
        let mut tree = DecisionTree::new(root);
        stats.nodes_created = 1;
        stats.peak_nodes = 1;

        let mut status = SearchStatus::Exhausted;
        let mut cursor = Some(tree.root());
        while let Some(id) = cursor {
            match self.config.iteration_budget {
                IterationBudget::Steps(limit) if stats.steps >= limit => {
                    status = SearchStatus::BudgetSpent;
                    break;
                }
                IterationBudget::FirstSolution if incumbent.best.is_some() => {
                    status = SearchStatus::FirstSolution;
                    break;
                }
                _ => {}
            }
            stats.steps += 1;
            self.step(&mut tree, id, &mut incumbent, &mut stats);
            stats.peak_nodes = stats.peak_nodes.max(tree.len());
            cursor = tree.next_leaf(id);
        }

        debug!(
            "search stopped ({:?}) after {} steps, {} nodes, best cost {:.6}",
            status,
            stats.steps,
            stats.nodes_created,
            incumbent.bound()
        );
        SearchOutcome {
            solution: incumbent.best,
            status,
            stats,
        }
    }

    /// Processes the node under the cursor: depot arrival, pruning, then
    /// branching on the next open edge.
    fn step(
        &self,
        tree: &mut DecisionTree,
        id: NodeId,
        incumbent: &mut Incumbent,
        stats: &mut SearchStats,
    ) {
        let policy = self.config.capacity_policy;
        {
            let node = tree.node_mut(id);
            if node.vertex() == self.depot && node.route_open() {
                if node.close_route(policy).is_none() {
                    stats.capacity_failures += 1;
                    return;
                }
                if node.vertices_visited() + 1 == self.graph.num_locations() {
                    let solution = Solution::from_edge_ids(self.graph, tree.included_edges(id));
                    incumbent.offer(solution, stats);
                    return;
                }
            }
        }

        let node = tree.node(id);
        trace!(
            "step {}: vertex {} depth {} lb {:.3} best {:.3}",
            stats.steps,
            node.vertex(),
            node.depth(),
            node.lower_bound(),
            incumbent.bound()
        );
        if node.lower_bound() >= incumbent.bound() {
            stats.pruned_by_bound += 1;
            return;
        }

        let decisions = Decisions::collect(tree, id, self.graph, self.depot);
        let Some(edge) = self.next_edge(node.vertex(), &decisions) else {
            stats.dead_ends += 1;
            return;
        };

        let include = self.include_child(node, edge, &decisions, incumbent, stats);
        let exclude = self.exclude_child(node, edge, &decisions, incumbent, stats);
        for (branch, child) in [(Branch::Include, include), (Branch::Exclude, exclude)] {
            if let Some(child) = child {
                tree.attach(id, branch, child);
                stats.nodes_created += 1;
            }
        }
    }

    /// Cheapest out-edge of `vertex` that is undecided and does not enter
    /// a customer already on the tour.
    fn next_edge(&self, vertex: usize, decisions: &Decisions) -> Option<EdgeId> {
        self.graph.edges_out(vertex).iter().copied().find(|&e| {
            let entered = self.graph.edge(e).destination();
            !decisions.is_decided(e) && (entered == self.depot || !decisions.is_visited(entered))
        })
    }

    fn include_child(
        &self,
        node: &DecisionNode,
        edge: EdgeId,
        decisions: &Decisions,
        incumbent: &mut Incumbent,
        stats: &mut SearchStats,
    ) -> Option<DecisionNode> {
        if node.cost_so_far() + self.graph.edge(edge).cost() >= incumbent.bound() {
            stats.pruned_by_bound += 1;
            return None;
        }
        let child = DecisionNode::include(node, self.graph, edge, self.depot);
        if !node.capacities().fits(child.demand_so_far()) {
            stats.capacity_failures += 1;
            return None;
        }
        let mut decisions = decisions.clone();
        decisions.push(self.graph, edge, true);
        let child = self.bound_node(child, &decisions, incumbent, stats);
        if child.lower_bound() <= incumbent.bound() {
            Some(child)
        } else {
            stats.pruned_by_bound += 1;
            None
        }
    }

    fn exclude_child(
        &self,
        node: &DecisionNode,
        edge: EdgeId,
        decisions: &Decisions,
        incumbent: &mut Incumbent,
        stats: &mut SearchStats,
    ) -> Option<DecisionNode> {
        let feasible = self.oracle.is_feasible_exclusion(
            decisions.decided(),
            decisions.visited(),
            edge,
            node.vertex(),
        );
        if !feasible {
            stats.exclusions_rejected += 1;
            return None;
        }
        let child = DecisionNode::exclude(node, edge);
        let mut decisions = decisions.clone();
        decisions.push(self.graph, edge, false);
        let child = self.bound_node(child, &decisions, incumbent, stats);
        if child.lower_bound() < incumbent.bound() {
            Some(child)
        } else {
            stats.pruned_by_bound += 1;
            None
        }
    }

    /// Computes both bounds of `node` and adopts its completion if it beats
    /// the incumbent.
    fn bound_node(
        &self,
        node: DecisionNode,
        decisions: &Decisions,
        incumbent: &mut Incumbent,
        stats: &mut SearchStats,
    ) -> DecisionNode {
        let lower = self.estimator.lower_bound(decisions);
        let completion = self.estimator.pessimistic_completion(&node, decisions);
        let upper = completion.as_ref().map_or(f64::INFINITY, |c| c.cost);
        if let Some(completion) = completion.filter(|c| c.cost < incumbent.bound()) {
            let edges = decisions.included().iter().copied().chain(completion.edges);
            incumbent.offer(Solution::from_edge_ids(self.graph, edges), stats);
        }
        node.with_bounds(Bounds { lower, upper })
    }
}

/// Solves a CVRP instance exactly.
///
/// `iteration_budget` uses the integer encoding of [`IterationBudget`]:
/// `0` runs to completion, a positive value caps the number of expansion
/// steps and a negative value stops at the first feasible solution.
/// Returns `None` when no feasible tour exists (or none was found within
/// the budget).
///
/// # Examples
///
/// ```
/// use cvrp_bnb::exact_solve;
/// use cvrp_bnb::graph::{CostMatrix, Graph};
/// use cvrp_bnb::models::CapacityList;
///
/// let costs = CostMatrix::from_off_diagonal(3, vec![1.0; 6]).unwrap();
/// let graph = Graph::from_matrix(&[0.0, 6.0, 6.0], &costs).unwrap();
///
/// assert!(exact_solve(&graph, &CapacityList::new([8.0]), 0, 0).is_none());
/// let best = exact_solve(&graph, &CapacityList::new([12.0]), 0, 0).unwrap();
/// assert_eq!(best.cost(), 3.0);
/// ```
pub fn exact_solve(
    graph: &Graph,
    capacities: &CapacityList,
    depot: usize,
    iteration_budget: i64,
) -> Option<Solution> {
    let config = SolverConfig::new().with_iteration_budget(IterationBudget::from(iteration_budget));
    BranchAndBound::new(graph, capacities, depot, config)
        .solve()
        .solution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::SolutionEvaluator;
    use crate::graph::CostMatrix;
    use crate::models::CapacityPolicy;
    use crate::search::testing::permute;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn graph_from(n: usize, cost: impl Fn(usize, usize) -> f64, demands: &[f64]) -> Graph {
        let mut matrix = CostMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    matrix.set(i, j, cost(i, j));
                }
            }
        }
        Graph::from_matrix(demands, &matrix).expect("valid")
    }

    /// Depot ↔ customer 10, customer ↔ customer 1.
    fn clustered(demands: &[f64]) -> Graph {
        graph_from(
            demands.len(),
            |i, j| if i == 0 || j == 0 { 10.0 } else { 1.0 },
            demands,
        )
    }

    /// Directed cycle 0→1→2→3→0 at cost 10, every other edge 15.
    fn cycle() -> Graph {
        graph_from(
            4,
            |i, j| if j == (i + 1) % 4 { 10.0 } else { 15.0 },
            &[0.0, 1.0, 1.0, 1.0],
        )
    }

    fn run(graph: &Graph, fleet: &[f64], depot: usize, config: SolverConfig) -> SearchOutcome {
        let fleet = CapacityList::new(fleet.iter().copied());
        BranchAndBound::new(graph, &fleet, depot, config).solve()
    }

    fn assert_valid(graph: &Graph, fleet: &[f64], depot: usize, solution: &Solution) {
        let fleet = CapacityList::new(fleet.iter().copied());
        let evaluator = SolutionEvaluator::new(graph, &fleet, depot);
        let (cost, violations) = evaluator.evaluate(solution);
        assert!(violations.is_empty(), "violations: {violations:?}");
        assert_eq!(cost, solution.cost());
    }

    /// Enumerates every customer order and every split into routes.
    fn brute_force(graph: &Graph, fleet: &[f64], depot: usize) -> Option<f64> {
        let customers: Vec<usize> = (0..graph.num_locations()).filter(|&v| v != depot).collect();
        let mut caps = fleet.to_vec();
        caps.sort_by(|a, b| b.total_cmp(a));
        let mut best: Option<f64> = None;
        let mut order = customers.clone();
        permute(&mut order, 0, &mut |perm| {
            let gaps = perm.len() - 1;
            for mask in 0u32..(1 << gaps) {
                let mut loads = Vec::new();
                let mut cost = 0.0;
                let mut load = 0.0;
                let mut at = depot;
                for (k, &c) in perm.iter().enumerate() {
                    cost += graph.cost(at, c).expect("edge");
                    load += graph.demand(c);
                    at = c;
                    if k == gaps || mask & (1 << k) != 0 {
                        cost += graph.cost(c, depot).expect("edge");
                        loads.push(load);
                        load = 0.0;
                        at = depot;
                    }
                }
                loads.sort_by(|a, b| b.total_cmp(a));
                let fits = loads.len() <= caps.len()
                    && loads.iter().zip(&caps).all(|(l, c)| l <= c);
                if fits && best.map_or(true, |b| cost < b) {
                    best = Some(cost);
                }
            }
        });
        best
    }

    #[test]
    fn test_cycle_scenario() {
        let g = cycle();
        let outcome = run(&g, &[10.0], 0, SolverConfig::new());
        assert_eq!(outcome.status, SearchStatus::Exhausted);
        let best = outcome.solution.expect("feasible");
        assert_eq!(best.cost(), 40.0);
        assert_eq!(best.vertex_path(), vec![0, 1, 2, 3, 0]);
        assert_valid(&g, &[10.0], 0, &best);
    }

    #[test]
    fn test_infeasible_fleet() {
        let g = clustered(&[0.0, 6.0, 6.0, 6.0]);
        let outcome = run(&g, &[8.0], 0, SolverConfig::new());
        assert!(outcome.solution.is_none());
        assert_eq!(outcome.status, SearchStatus::Exhausted);
        assert!(outcome.stats.capacity_failures > 0);

        let fleet = CapacityList::new([8.0, 8.0]);
        assert!(exact_solve(&g, &fleet, 0, 0).is_none());
    }

    #[test]
    fn test_one_route_per_customer() {
        let g = clustered(&[0.0, 6.0, 6.0, 6.0]);
        let best = run(&g, &[8.0, 8.0, 8.0], 0, SolverConfig::new())
            .solution
            .expect("feasible");
        assert_eq!(best.cost(), 60.0);
        assert_eq!(best.num_routes(), 3);
        assert_valid(&g, &[8.0, 8.0, 8.0], 0, &best);
    }

    #[test]
    fn test_two_route_split() {
        let g = clustered(&[0.0, 6.0, 6.0, 6.0]);
        let best = run(&g, &[12.0, 12.0], 0, SolverConfig::new())
            .solution
            .expect("feasible");
        assert_eq!(best.cost(), 41.0);
        assert_eq!(best.num_routes(), 2);
        let mut loads: Vec<f64> = best.routes(&g).iter().map(|r| r.load()).collect();
        loads.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(loads, vec![6.0, 12.0]);
        assert_valid(&g, &[12.0, 12.0], 0, &best);
    }

    #[test]
    fn test_single_customer() {
        let g = graph_from(2, |i, _| if i == 0 { 3.0 } else { 4.0 }, &[0.0, 2.0]);
        let best = run(&g, &[2.0], 0, SolverConfig::new()).solution.expect("feasible");
        assert_eq!(best.cost(), 7.0);
        assert!(run(&g, &[1.0], 0, SolverConfig::new()).solution.is_none());
    }

    #[test]
    fn test_depot_other_than_zero() {
        let g = graph_from(4, |i, j| (i * 4 + j) as f64 + 1.0, &[3.0, 2.0, 0.0, 2.0]);
        let outcome = run(&g, &[5.0, 4.0], 2, SolverConfig::new());
        let best = outcome.solution.expect("feasible");
        assert_eq!(best.depot(), Some(2));
        assert_valid(&g, &[5.0, 4.0], 2, &best);
        assert_eq!(Some(best.cost()), brute_force(&g, &[5.0, 4.0], 2));
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..60 {
            let n = rng.random_range(2..=6usize);
            let depot = rng.random_range(0..n);
            let demands: Vec<f64> = (0..n)
                .map(|v| if v == depot { 0.0 } else { rng.random_range(1..=5u32) as f64 })
                .collect();
            let costs: Vec<f64> = (0..n * (n - 1))
                .map(|_| rng.random_range(1..=20u32) as f64)
                .collect();
            let fleet: Vec<f64> = (0..rng.random_range(1..=4usize))
                .map(|_| rng.random_range(4..=12u32) as f64)
                .collect();
            let matrix = CostMatrix::from_off_diagonal(n, costs).expect("valid");
            let g = Graph::from_matrix(&demands, &matrix).expect("valid");

            let expected = brute_force(&g, &fleet, depot);
            for policy in [CapacityPolicy::BestFit, CapacityPolicy::LargestFirst] {
                let config = SolverConfig::new().with_capacity_policy(policy);
                let outcome = run(&g, &fleet, depot, config);
                assert_eq!(outcome.status, SearchStatus::Exhausted);
                match (&outcome.solution, expected) {
                    (Some(found), Some(cost)) => {
                        assert_valid(&g, &fleet, depot, found);
                        if policy == CapacityPolicy::BestFit {
                            assert_eq!(found.cost(), cost);
                        } else {
                            assert!(found.cost() >= cost);
                        }
                    }
                    (None, None) => {}
                    (None, Some(_)) => assert_eq!(policy, CapacityPolicy::LargestFirst),
                    (Some(found), None) => panic!("infeasible instance solved: {found}"),
                }
            }
        }
    }

    #[test]
    fn test_step_budget() {
        let g = clustered(&[0.0, 1.0, 1.0, 1.0, 1.0]);
        let config = SolverConfig::new().with_iteration_budget(IterationBudget::Steps(1));
        let outcome = run(&g, &[10.0; 4], 0, config);
        assert_eq!(outcome.status, SearchStatus::BudgetSpent);
        assert_eq!(outcome.stats.steps, 1);
        let best = outcome.solution.expect("completion known");
        assert_valid(&g, &[10.0; 4], 0, &best);

        let full = run(&g, &[10.0; 4], 0, SolverConfig::new());
        assert!(full.stats.steps > 1);
        assert!(full.solution.expect("feasible").cost() <= best.cost());
    }

    #[test]
    fn test_first_solution_budget() {
        // One vehicle: the first tour is only known deep in the tree.
        let g = cycle();
        let config = SolverConfig::new().with_iteration_budget(IterationBudget::FirstSolution);
        let outcome = run(&g, &[10.0], 0, config);
        assert_eq!(outcome.status, SearchStatus::FirstSolution);
        assert!(outcome.stats.steps >= 3);
        assert_valid(&g, &[10.0], 0, &outcome.solution.expect("feasible"));

        // Enough vehicles for a star: known before the first step.
        let g = clustered(&[0.0, 1.0, 1.0, 1.0]);
        let fleet = CapacityList::new([5.0; 3]);
        let best = exact_solve(&g, &fleet, 0, -1).expect("feasible");
        assert_eq!(best.cost(), 60.0);
    }

    #[test]
    fn test_stats_are_consistent() {
        let g = clustered(&[0.0, 2.0, 2.0, 2.0, 2.0]);
        let outcome = run(&g, &[4.0, 4.0, 8.0], 0, SolverConfig::new());
        let stats = &outcome.stats;
        assert!(stats.nodes_created >= stats.steps);
        assert!(stats.incumbent_updates >= 1);
        assert!(stats.peak_nodes as u64 <= stats.nodes_created);
        let best = outcome.solution.expect("feasible");
        assert_valid(&g, &[4.0, 4.0, 8.0], 0, &best);
        // The largest vehicle carries every customer.
        assert_eq!(best.cost(), 23.0);
        assert_eq!(best.num_routes(), 1);
    }
}
