//! Complete directed cost graph.

use serde::Serialize;

use super::CostMatrix;
use crate::error::{non_negative, InstanceError};
use crate::models::Location;

/// Index of an edge in the graph's edge arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Position of the edge in [`Graph::edges`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed edge between two distinct locations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectedEdge {
    origin: usize,
    destination: usize,
    cost: f64,
}

impl DirectedEdge {
    /// Creates an edge from `origin` to `destination`.
    pub fn new(origin: usize, destination: usize, cost: f64) -> Self {
        Self {
            origin,
            destination,
            cost,
        }
    }

    /// Location the edge leaves.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Location the edge enters.
    pub fn destination(&self) -> usize {
        self.destination
    }

    /// Travel cost of the edge.
    pub fn cost(&self) -> f64 {
        self.cost
    }
}

/// Immutable complete digraph over the locations of an instance.
///
/// Every location keeps its outgoing edges sorted by ascending cost (ties
/// broken by destination id), which is the order the search branches in.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::graph::{CostMatrix, Graph};
///
/// let costs = CostMatrix::from_off_diagonal(3, vec![4.0, 1.0, 2.0, 3.0, 5.0, 6.0]).unwrap();
/// let graph = Graph::from_matrix(&[0.0, 2.0, 3.0], &costs).unwrap();
///
/// assert_eq!(graph.num_locations(), 3);
/// let cheapest = graph.edges_out(0)[0];
/// assert_eq!(graph.edge(cheapest).destination(), 2);
/// assert_eq!(graph.cost(1, 0), Some(2.0));
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    locations: Vec<Location>,
    edges: Vec<DirectedEdge>,
    out: Vec<Vec<EdgeId>>,
    lookup: Vec<Option<EdgeId>>,
}

impl Graph {
    /// Builds the complete graph from per-location demands and a cost matrix.
    ///
    /// Location `i` gets demand `demands[i]`. Every off-diagonal entry of
    /// `costs` becomes an edge.
    pub fn from_matrix(demands: &[f64], costs: &CostMatrix) -> Result<Self, InstanceError> {
        let n = demands.len();
        if n < 2 {
            return Err(InstanceError::TooFewLocations(n));
        }
        if costs.size() != n {
            return Err(InstanceError::MatrixSize {
                expected: n * n,
                got: costs.size() * costs.size(),
            });
        }

        let mut locations = Vec::with_capacity(n);
        for (id, &demand) in demands.iter().enumerate() {
            locations.push(Location::new(id, non_negative("demand", demand)?));
        }

        let mut edges = Vec::with_capacity(n * (n - 1));
        let mut out = vec![Vec::with_capacity(n - 1); n];
        let mut lookup = vec![None; n * n];
        for (from, adjacent) in out.iter_mut().enumerate() {
            for to in (0..n).filter(|&to| to != from) {
                let cost = non_negative("cost", costs.get(from, to))?;
                let id = EdgeId(edges.len());
                edges.push(DirectedEdge::new(from, to, cost));
                adjacent.push(id);
                lookup[from * n + to] = Some(id);
            }
            adjacent.sort_by(|&a, &b| {
                let (ea, eb) = (&edges[a.0], &edges[b.0]);
                ea.cost
                    .total_cmp(&eb.cost)
                    .then(ea.destination.cmp(&eb.destination))
            });
        }

        Ok(Self {
            locations,
            edges,
            out,
            lookup,
        })
    }

    /// Number of locations, depot included.
    pub fn num_locations(&self) -> usize {
        self.locations.len()
    }

    /// Number of directed edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// All locations, indexed by id.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Demand at location `id`.
    pub fn demand(&self, id: usize) -> f64 {
        self.locations[id].demand()
    }

    /// All edges of the arena.
    pub fn edges(&self) -> &[DirectedEdge] {
        &self.edges
    }

    /// The edge behind an id.
    pub fn edge(&self, id: EdgeId) -> &DirectedEdge {
        &self.edges[id.0]
    }

    /// Outgoing edges of `vertex`, cheapest first.
    pub fn edges_out(&self, vertex: usize) -> &[EdgeId] {
        &self.out[vertex]
    }

    /// Out-degree of `vertex`.
    pub fn degree_out(&self, vertex: usize) -> usize {
        self.out[vertex].len()
    }

    /// The edge from `from` to `to`, if both are distinct valid locations.
    pub fn edge_between(&self, from: usize, to: usize) -> Option<EdgeId> {
        let n = self.num_locations();
        if from >= n || to >= n {
            return None;
        }
        self.lookup[from * n + to]
    }

    /// Cost of the edge from `from` to `to`.
    pub fn cost(&self, from: usize, to: usize) -> Option<f64> {
        self.edge_between(from, to).map(|id| self.edge(id).cost)
    }
}

/// A set of edges of one graph, stored as a flag per edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSet {
    flags: Vec<bool>,
}

impl EdgeSet {
    /// Creates an empty set sized for `graph`.
    pub fn new(graph: &Graph) -> Self {
        Self {
            flags: vec![false; graph.num_edges()],
        }
    }

    /// Adds an edge to the set.
    pub fn insert(&mut self, id: EdgeId) {
        self.flags[id.0] = true;
    }

    /// Returns `true` if the edge is in the set.
    pub fn contains(&self, id: EdgeId) -> bool {
        self.flags[id.0]
    }

    /// Number of edges in the set.
    pub fn len(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Returns `true` if the set holds no edge.
    pub fn is_empty(&self) -> bool {
        !self.flags.iter().any(|&f| f)
    }
}
