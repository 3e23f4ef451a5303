//! Cost graph and reachability queries.
//!
//! Provides the immutable complete digraph the search runs on, a dense
//! cost matrix to build it from, and the connectivity oracle that gates
//! every edge exclusion.

mod bfs;
mod connectivity;
mod cost_graph;
mod matrix;

pub use bfs::{bfs, path_exists, Traversal};
pub use connectivity::ConnectivityOracle;
pub use cost_graph::{DirectedEdge, EdgeId, EdgeSet, Graph};
pub use matrix::CostMatrix;
