//! Lower and upper bounds for decision nodes.
//!
//! # Algorithm
//!
//! **Lower bound**: every vertex must be left at least once. A vertex whose
//! outgoing edge is already fixed contributes that edge (the depot
//! contributes all of its fixed departures); any other vertex contributes
//! its cheapest out-edge that has not been decided yet. A vertex with no
//! such edge left makes the node hopeless (`+∞`).
//!
//! **Upper bound**: the cost of a concrete completion. The open route
//! returns straight to the depot and every unvisited customer is then
//! served by its own trip `depot → u → depot`, each route taking a vehicle
//! under the configured policy. If any of those edges has been decided
//! already, or no vehicle is left for a trip, no completion is known and
//! the bound is `+∞`. Because the completion is an actual tour, the search
//! can adopt it as its incumbent.

use super::tree::{DecisionNode, DecisionTree, NodeId};
use crate::graph::{EdgeId, EdgeSet, Graph};
use crate::models::CapacityPolicy;

/// Lower and upper bound of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Admissible estimate of the cheapest tour through the node.
    pub lower: f64,
    /// Cost of a known tour through the node, `+∞` if none.
    pub upper: f64,
}

/// Edge decisions on the path from the root to a node.
#[derive(Debug, Clone)]
pub struct Decisions {
    decided: EdgeSet,
    included: Vec<EdgeId>,
    visited: Vec<bool>,
    depot: usize,
}

impl Decisions {
    /// No decision taken yet.
    pub fn new(graph: &Graph, depot: usize) -> Self {
        Self {
            decided: EdgeSet::new(graph),
            included: Vec::new(),
            visited: vec![false; graph.num_locations()],
            depot,
        }
    }

    /// Gathers the decisions on the path from the root to `id`.
    pub fn collect(tree: &DecisionTree, id: NodeId, graph: &Graph, depot: usize) -> Self {
        let mut path: Vec<(EdgeId, bool)> = tree
            .ancestry(id)
            .filter_map(|node| node.edge().map(|e| (e, node.included())))
            .collect();
        path.reverse();

        let mut decisions = Self::new(graph, depot);
        for (edge, included) in path {
            decisions.push(graph, edge, included);
        }
        decisions
    }

    /// Records one more decision below the current path.
    pub fn push(&mut self, graph: &Graph, edge: EdgeId, included: bool) {
        self.decided.insert(edge);
        if included {
            self.included.push(edge);
            let entered = graph.edge(edge).destination();
            if entered != self.depot {
                self.visited[entered] = true;
            }
        }
    }

    /// Every decided edge, included or excluded.
    pub fn decided(&self) -> &EdgeSet {
        &self.decided
    }

    /// Returns `true` if `edge` has been decided either way.
    pub fn is_decided(&self, edge: EdgeId) -> bool {
        self.decided.contains(edge)
    }

    /// Included edges in travel order.
    pub fn included(&self) -> &[EdgeId] {
        &self.included
    }

    /// Flag per vertex, set for customers already on the tour.
    pub fn visited(&self) -> &[bool] {
        &self.visited
    }

    /// Returns `true` if customer `vertex` is already on the tour.
    pub fn is_visited(&self, vertex: usize) -> bool {
        self.visited[vertex]
    }
}

/// Edges that extend a node's path to a complete tour, with the total cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Edges to append after the node's included edges.
    pub edges: Vec<EdgeId>,
    /// Cost of the whole tour, path included.
    pub cost: f64,
}

/// Computes node bounds for one instance.
#[derive(Debug, Clone, Copy)]
pub struct BoundEstimator<'a> {
    graph: &'a Graph,
    depot: usize,
    policy: CapacityPolicy,
}

impl<'a> BoundEstimator<'a> {
    /// Creates an estimator; `policy` picks the vehicles of the completion.
    pub fn new(graph: &'a Graph, depot: usize, policy: CapacityPolicy) -> Self {
        Self {
            graph,
            depot,
            policy,
        }
    }

    /// Both bounds of `node`.
    pub fn estimate(&self, node: &DecisionNode, decisions: &Decisions) -> Bounds {
        Bounds {
            lower: self.lower_bound(decisions),
            upper: self.upper_bound(node, decisions),
        }
    }

    /// Admissible lower bound for the given path decisions.
    pub fn lower_bound(&self, decisions: &Decisions) -> f64 {
        let n = self.graph.num_locations();
        let mut fixed: Vec<Option<f64>> = vec![None; n];
        for &id in decisions.included() {
            let edge = self.graph.edge(id);
            let slot = &mut fixed[edge.origin()];
            *slot = Some(slot.unwrap_or(0.0) + edge.cost());
        }

        let mut total = 0.0;
        for (vertex, fixed) in fixed.into_iter().enumerate() {
            total += match fixed {
                Some(cost) => cost,
                None => {
                    // Out-edges are sorted by cost.
                    let cheapest = self
                        .graph
                        .edges_out(vertex)
                        .iter()
                        .find(|&&e| !decisions.is_decided(e));
                    match cheapest {
                        Some(&e) => self.graph.edge(e).cost(),
                        None => return f64::INFINITY,
                    }
                }
            };
        }
        total
    }

    /// Cost of the pessimistic completion of `node`, `+∞` if there is none.
    pub fn upper_bound(&self, node: &DecisionNode, decisions: &Decisions) -> f64 {
        self.pessimistic_completion(node, decisions)
            .map_or(f64::INFINITY, |c| c.cost)
    }

    /// Closes the open route and serves every remaining customer alone.
    pub fn pessimistic_completion(
        &self,
        node: &DecisionNode,
        decisions: &Decisions,
    ) -> Option<Completion> {
        let mut fleet = node.capacities().duplicate();
        let mut edges = Vec::new();
        let mut cost = node.cost_so_far();

        if node.route_open() {
            if node.vertex() != self.depot {
                let home = self.usable(node.vertex(), self.depot, decisions)?;
                cost += self.graph.edge(home).cost();
                edges.push(home);
            }
            fleet.take(node.demand_so_far(), self.policy)?;
        }

        for customer in 0..self.graph.num_locations() {
            if customer == self.depot || decisions.is_visited(customer) {
                continue;
            }
            let out = self.usable(self.depot, customer, decisions)?;
            let back = self.usable(customer, self.depot, decisions)?;
            fleet.take(self.graph.demand(customer), self.policy)?;
            cost += self.graph.edge(out).cost() + self.graph.edge(back).cost();
            edges.extend([out, back]);
        }

        Some(Completion { edges, cost })
    }

    fn usable(&self, from: usize, to: usize, decisions: &Decisions) -> Option<EdgeId> {
        self.graph
            .edge_between(from, to)
            .filter(|&e| !decisions.is_decided(e))
    }
}
