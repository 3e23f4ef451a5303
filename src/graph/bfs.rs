//! Queue-based breadth-first traversal.

use std::collections::VecDeque;

use super::{EdgeId, Graph};

/// Result of a breadth-first traversal: the predecessor of every reached
/// vertex on a shortest-hop path from the origin.
#[derive(Debug, Clone)]
pub struct Traversal {
    origin: usize,
    parent: Vec<Option<usize>>,
    reached: Vec<bool>,
}

impl Traversal {
    /// Vertex the traversal started from.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Returns `true` if `vertex` was reached.
    pub fn reached(&self, vertex: usize) -> bool {
        self.reached[vertex]
    }

    /// Vertices on the path from the origin to `target`, both included.
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        if !self.reached[target] {
            return None;
        }
        let mut path = vec![target];
        let mut current = target;
        while let Some(prev) = self.parent[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

/// Breadth-first traversal of `graph` from `origin`.
///
/// Edges for which `ignore` returns `true` are not followed and vertices
/// flagged in `blocked` are never entered (the origin itself is always
/// visited). When `target` is given the traversal stops as soon as that
/// vertex is reached.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::graph::{bfs, CostMatrix, Graph};
///
/// let costs = CostMatrix::from_off_diagonal(3, vec![1.0; 6]).unwrap();
/// let graph = Graph::from_matrix(&[0.0, 1.0, 1.0], &costs).unwrap();
/// let direct = graph.edge_between(1, 0).unwrap();
///
/// let t = bfs(&graph, 1, &[false; 3], |e| e == direct, Some(0));
/// assert_eq!(t.path_to(0), Some(vec![1, 2, 0]));
/// ```
pub fn bfs<F>(
    graph: &Graph,
    origin: usize,
    blocked: &[bool],
    ignore: F,
    target: Option<usize>,
) -> Traversal
where
    F: Fn(EdgeId) -> bool,
{
    let n = graph.num_locations();
    let mut parent = vec![None; n];
    let mut reached = vec![false; n];
    reached[origin] = true;

    let mut queue = VecDeque::from([origin]);
    'search: while let Some(current) = queue.pop_front() {
        for &id in graph.edges_out(current) {
            let next = graph.edge(id).destination();
            if reached[next] || blocked[next] || ignore(id) {
                continue;
            }
            reached[next] = true;
            parent[next] = Some(current);
            if target == Some(next) {
                break 'search;
            }
            queue.push_back(next);
        }
    }

    Traversal {
        origin,
        parent,
        reached,
    }
}

/// Returns `true` if `to` can be reached from `from`.
pub fn path_exists<F>(graph: &Graph, from: usize, to: usize, blocked: &[bool], ignore: F) -> bool
where
    F: Fn(EdgeId) -> bool,
{
    from == to || bfs(graph, from, blocked, ignore, Some(to)).reached(to)
}
