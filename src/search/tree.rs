//! Binary decision tree of the branch-and-bound search.
//!
//! Every node fixes one edge: an include node travels along it, an exclude
//! node forbids it for good and stays where it was. Nodes live in an index
//! arena; a node owns the slots of its two children and keeps a plain id of
//! its parent for navigation. Slots are released bottom-up, iteratively, as
//! the search backtracks.

use std::rc::Rc;

use super::Bounds;
use crate::graph::{EdgeId, Graph};
use crate::models::{CapacityList, CapacityPolicy};

/// Identifier of a node: its slot in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Which child slot of a node a decision goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// The decided edge is part of the tour.
    Include,
    /// The decided edge is never used.
    Exclude,
}

/// One node of the search tree.
#[derive(Debug, Clone)]
pub struct DecisionNode {
    /// Vertex the tour stands on after this decision.
    vertex: usize,
    /// Edge this node decides on; `None` only for the root.
    edge: Option<EdgeId>,
    included: bool,
    parent: Option<NodeId>,
    include_child: Option<NodeId>,
    exclude_child: Option<NodeId>,
    depth: usize,
    /// Number of included edges on the root path.
    edges_committed: usize,
    /// Number of distinct customers entered so far.
    vertices_visited: usize,
    /// Cost of every included edge on the root path.
    cost_so_far: f64,
    /// Demand of the route that is currently open.
    demand_so_far: f64,
    /// Whether an edge was included since the last vehicle was taken.
    route_open: bool,
    /// Vehicles still available. Shared with the ancestors until this node
    /// takes one.
    capacities: Rc<CapacityList>,
    lower_bound: f64,
    upper_bound: f64,
}

impl DecisionNode {
    /// Creates the root: standing on the depot with the full fleet.
    pub fn root(depot: usize, capacities: Rc<CapacityList>) -> Self {
        Self {
            vertex: depot,
            edge: None,
            included: false,
            parent: None,
            include_child: None,
            exclude_child: None,
            depth: 0,
            edges_committed: 0,
            vertices_visited: 0,
            cost_so_far: 0.0,
            demand_so_far: 0.0,
            route_open: false,
            capacities,
            lower_bound: 0.0,
            upper_bound: f64::INFINITY,
        }
    }

    /// Child that travels along `edge`, which must leave `parent`'s vertex.
    pub fn include(parent: &DecisionNode, graph: &Graph, edge: EdgeId, depot: usize) -> Self {
        let e = graph.edge(edge);
        debug_assert_eq!(e.origin(), parent.vertex);
        let entered = e.destination();
        let customer = entered != depot;
        Self {
            vertex: entered,
            edge: Some(edge),
            included: true,
            depth: parent.depth + 1,
            edges_committed: parent.edges_committed + 1,
            vertices_visited: parent.vertices_visited + usize::from(customer),
            cost_so_far: parent.cost_so_far + e.cost(),
            demand_so_far: if customer {
                parent.demand_so_far + graph.demand(entered)
            } else {
                parent.demand_so_far
            },
            route_open: true,
            ..parent.successor()
        }
    }

    /// Child that forbids `edge` and stays on `parent`'s vertex.
    pub fn exclude(parent: &DecisionNode, edge: EdgeId) -> Self {
        Self {
            edge: Some(edge),
            included: false,
            depth: parent.depth + 1,
            ..parent.successor()
        }
    }

    /// Copy of the path state, detached from the tree.
    fn successor(&self) -> Self {
        Self {
            parent: None,
            include_child: None,
            exclude_child: None,
            capacities: Rc::clone(&self.capacities),
            lower_bound: 0.0,
            upper_bound: f64::INFINITY,
            ..*self
        }
    }

    /// Sets the bounds computed for this node.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.lower_bound = bounds.lower;
        self.upper_bound = bounds.upper;
        self
    }

    /// Takes a vehicle for the open route and closes it.
    ///
    /// The capacity list is copied first if another node still shares it.
    /// Returns the capacity taken, or `None` (leaving the node untouched)
    /// if no vehicle can carry the route's demand.
    pub fn close_route(&mut self, policy: CapacityPolicy) -> Option<f64> {
        self.capacities.position_for(self.demand_so_far, policy)?;
        let taken = Rc::make_mut(&mut self.capacities).take(self.demand_so_far, policy)?;
        self.demand_so_far = 0.0;
        self.route_open = false;
        Some(taken)
    }

    /// Vertex the tour stands on.
    pub fn vertex(&self) -> usize {
        self.vertex
    }

    /// Edge decided by this node.
    pub fn edge(&self) -> Option<EdgeId> {
        self.edge
    }

    /// Whether the decided edge is part of the tour.
    pub fn included(&self) -> bool {
        self.included
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child that includes the next edge.
    pub fn include_child(&self) -> Option<NodeId> {
        self.include_child
    }

    /// Child that excludes the next edge.
    pub fn exclude_child(&self) -> Option<NodeId> {
        self.exclude_child
    }

    /// Distance from the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of edges on the tour so far.
    pub fn edges_committed(&self) -> usize {
        self.edges_committed
    }

    /// Number of customers entered so far.
    pub fn vertices_visited(&self) -> usize {
        self.vertices_visited
    }

    /// Cost of the tour so far.
    pub fn cost_so_far(&self) -> f64 {
        self.cost_so_far
    }

    /// Demand of the open route.
    pub fn demand_so_far(&self) -> f64 {
        self.demand_so_far
    }

    /// Whether the current route still needs a vehicle.
    pub fn route_open(&self) -> bool {
        self.route_open
    }

    /// Vehicles still available on this branch.
    pub fn capacities(&self) -> &CapacityList {
        &self.capacities
    }

    /// Returns `true` if another live node uses the same capacity list.
    pub fn shares_capacities(&self) -> bool {
        Rc::strong_count(&self.capacities) > 1
    }

    /// Admissible lower bound on any tour through this node.
    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    /// Cost of a known tour through this node, `+∞` if none is known.
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }
}

/// Arena holding the live part of the search tree.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use cvrp_bnb::graph::{CostMatrix, Graph};
/// use cvrp_bnb::models::CapacityList;
/// use cvrp_bnb::search::{Branch, DecisionNode, DecisionTree};
///
/// let costs = CostMatrix::from_off_diagonal(2, vec![1.0, 1.0]).unwrap();
/// let graph = Graph::from_matrix(&[0.0, 1.0], &costs).unwrap();
/// let root = DecisionNode::root(0, Rc::new(CapacityList::new([5.0])));
/// let mut tree = DecisionTree::new(root);
///
/// let edge = graph.edge_between(0, 1).unwrap();
/// let child = DecisionNode::include(tree.node(tree.root()), &graph, edge, 0);
/// let id = tree.attach(tree.root(), Branch::Include, child);
/// assert_eq!(tree.len(), 2);
///
/// // The child is a leaf: backtracking frees it and then the root.
/// assert_eq!(tree.next_leaf(id), None);
/// assert!(tree.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct DecisionTree {
    slots: Vec<Option<DecisionNode>>,
    vacant: Vec<usize>,
    root: NodeId,
    live: usize,
}

impl DecisionTree {
    /// Creates a tree holding only `root`.
    pub fn new(root: DecisionNode) -> Self {
        Self {
            slots: vec![Some(root)],
            vacant: Vec::new(),
            root: NodeId(0),
            live: 1,
        }
    }

    /// Id of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` once every node has been released.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns the live node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if the node has already been released.
    pub fn node(&self, id: NodeId) -> &DecisionNode {
        match &self.slots[id.0] {
            Some(node) => node,
            None => panic!("decision node {} was released", id.0),
        }
    }

    /// Mutable access to the live node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if the node has already been released.
    pub fn node_mut(&mut self, id: NodeId) -> &mut DecisionNode {
        match &mut self.slots[id.0] {
            Some(node) => node,
            None => panic!("decision node {} was released", id.0),
        }
    }

    /// Stores `child` under `parent` in the given branch slot.
    pub fn attach(&mut self, parent: NodeId, branch: Branch, mut child: DecisionNode) -> NodeId {
        child.parent = Some(parent);
        let id = match self.vacant.pop() {
            Some(slot) => {
                self.slots[slot] = Some(child);
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(child));
                NodeId(self.slots.len() - 1)
            }
        };
        self.live += 1;
        let parent = self.node_mut(parent);
        let slot = match branch {
            Branch::Include => &mut parent.include_child,
            Branch::Exclude => &mut parent.exclude_child,
        };
        debug_assert!(slot.is_none());
        *slot = Some(id);
        id
    }

    /// Iterates from `id` up to the root, both included.
    pub fn ancestry(&self, id: NodeId) -> Ancestry<'_> {
        Ancestry {
            tree: self,
            next: Some(id),
        }
    }

    /// Included edges on the path from the root to `id`, in travel order.
    pub fn included_edges(&self, id: NodeId) -> Vec<EdgeId> {
        let mut edges: Vec<EdgeId> = self
            .ancestry(id)
            .filter(|node| node.included)
            .filter_map(|node| node.edge)
            .collect();
        edges.reverse();
        edges
    }

    /// Moves the cursor to the next node to explore.
    ///
    /// Descends into a child of `current` if it has one. Otherwise releases
    /// `current` and every ancestor left without children, then descends
    /// into the first ancestor's remaining child. Returns `None` once the
    /// root itself has been released.
    pub fn next_leaf(&mut self, current: NodeId) -> Option<NodeId> {
        let mut cursor = Some(current);
        while let Some(id) = cursor {
            let node = self.node(id);
            if let Some(child) = node.include_child.or(node.exclude_child) {
                return Some(child);
            }
            let parent = node.parent;
            if let Some(parent) = parent {
                let parent = self.node_mut(parent);
                if parent.include_child == Some(id) {
                    parent.include_child = None;
                } else if parent.exclude_child == Some(id) {
                    parent.exclude_child = None;
                }
            }
            self.release(id);
            cursor = parent;
        }
        None
    }

    fn release(&mut self, id: NodeId) {
        if self.slots[id.0].take().is_some() {
            self.vacant.push(id.0);
            self.live -= 1;
        }
    }
}

/// Iterator over a node and its ancestors, see [`DecisionTree::ancestry`].
pub struct Ancestry<'a> {
    tree: &'a DecisionTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a DecisionNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.node(self.next?);
        self.next = node.parent;
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CostMatrix;

    fn line_graph() -> Graph {
        // 0 ↔ 1 ↔ 2 cost 1, everything else cost 5.
        let mut costs = CostMatrix::new(3);
        for i in 0..3usize {
            for j in 0..3usize {
                if i != j {
                    let c = if i.abs_diff(j) == 1 { 1.0 } else { 5.0 };
                    costs.set(i, j, c);
                }
            }
        }
        Graph::from_matrix(&[0.0, 2.0, 3.0], &costs).expect("valid")
    }

    fn edge(g: &Graph, from: usize, to: usize) -> EdgeId {
        g.edge_between(from, to).expect("edge")
    }

    #[test]
    fn test_include_updates_path_state() {
        let g = line_graph();
        let root = DecisionNode::root(0, Rc::new(CapacityList::new([10.0])));
        let a = DecisionNode::include(&root, &g, edge(&g, 0, 1), 0);
        let b = DecisionNode::include(&a, &g, edge(&g, 1, 2), 0);
        assert_eq!(b.vertex(), 2);
        assert_eq!(b.depth(), 2);
        assert_eq!(b.edges_committed(), 2);
        assert_eq!(b.vertices_visited(), 2);
        assert_eq!(b.cost_so_far(), 2.0);
        assert_eq!(b.demand_so_far(), 5.0);
        assert!(b.route_open());
        assert!(b.included());

        let back = DecisionNode::include(&b, &g, edge(&g, 2, 0), 0);
        assert_eq!(back.vertex(), 0);
        assert_eq!(back.vertices_visited(), 2);
        assert_eq!(back.demand_so_far(), 5.0);
    }

    #[test]
    fn test_exclude_keeps_position() {
        let g = line_graph();
        let root = DecisionNode::root(0, Rc::new(CapacityList::new([10.0])));
        let a = DecisionNode::include(&root, &g, edge(&g, 0, 1), 0);
        let x = DecisionNode::exclude(&a, edge(&g, 1, 2));
        assert_eq!(x.vertex(), 1);
        assert!(!x.included());
        assert_eq!(x.depth(), 2);
        assert_eq!(x.edges_committed(), 1);
        assert_eq!(x.cost_so_far(), a.cost_so_far());
        assert_eq!(x.demand_so_far(), a.demand_so_far());
        assert_eq!(x.edge(), Some(edge(&g, 1, 2)));
    }

    #[test]
    fn test_close_route_copies_shared_capacities() {
        let g = line_graph();
        let root = DecisionNode::root(0, Rc::new(CapacityList::new([4.0, 10.0])));
        let a = DecisionNode::include(&root, &g, edge(&g, 0, 1), 0);
        let mut back = DecisionNode::include(&a, &g, edge(&g, 1, 0), 0);
        assert!(back.shares_capacities());

        assert_eq!(back.close_route(CapacityPolicy::BestFit), Some(4.0));
        assert!(!back.shares_capacities());
        assert!(!back.route_open());
        assert_eq!(back.demand_so_far(), 0.0);
        assert_eq!(back.capacities().as_slice(), &[10.0]);
        // Ancestors still see the full fleet.
        assert_eq!(root.capacities().len(), 2);
        assert_eq!(a.capacities().len(), 2);

        // Descendants inherit the private copy.
        let next = DecisionNode::include(&back, &g, edge(&g, 0, 2), 0);
        assert_eq!(next.capacities().as_slice(), &[10.0]);
        assert!(back.shares_capacities());
    }

    #[test]
    fn test_close_route_failure_leaves_node_untouched() {
        let g = line_graph();
        let root = DecisionNode::root(0, Rc::new(CapacityList::new([1.0])));
        let a = DecisionNode::include(&root, &g, edge(&g, 0, 2), 0);
        let mut back = DecisionNode::include(&a, &g, edge(&g, 2, 0), 0);
        assert_eq!(back.close_route(CapacityPolicy::BestFit), None);
        assert!(back.route_open());
        assert!(back.shares_capacities());
        assert_eq!(back.demand_so_far(), 3.0);
    }

    #[test]
    fn test_traversal_order_and_release() {
        let g = line_graph();
        let mut tree = DecisionTree::new(DecisionNode::root(0, Rc::new(CapacityList::new([9.0]))));
        let root = tree.root();
        let e01 = edge(&g, 0, 1);

        let inc = DecisionNode::include(tree.node(root), &g, e01, 0);
        let exc = DecisionNode::exclude(tree.node(root), e01);
        let inc = tree.attach(root, Branch::Include, inc);
        let exc = tree.attach(root, Branch::Exclude, exc);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.node(inc).parent(), Some(root));

        // Root descends include-first.
        assert_eq!(tree.next_leaf(root), Some(inc));
        // The include leaf is released, the exclude sibling comes next.
        assert_eq!(tree.next_leaf(inc), Some(exc));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.node(root).include_child(), None);
        assert_eq!(tree.node(root).exclude_child(), Some(exc));

        let deeper = DecisionNode::include(tree.node(exc), &g, edge(&g, 0, 2), 0);
        let deeper = tree.attach(exc, Branch::Include, deeper);
        assert_eq!(tree.next_leaf(exc), Some(deeper));
        assert_eq!(tree.next_leaf(deeper), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_slots_are_reused() {
        let g = line_graph();
        let mut tree = DecisionTree::new(DecisionNode::root(0, Rc::new(CapacityList::new([9.0]))));
        let root = tree.root();
        let a = DecisionNode::include(tree.node(root), &g, edge(&g, 0, 1), 0);
        let a = tree.attach(root, Branch::Include, a);
        let b = DecisionNode::exclude(tree.node(root), edge(&g, 0, 1));
        tree.attach(root, Branch::Exclude, b);
        tree.next_leaf(a);
        let c = DecisionNode::include(tree.node(root), &g, edge(&g, 0, 2), 0);
        let c = tree.attach(root, Branch::Include, c);
        assert_eq!(c, a);
    }

    #[test]
    fn test_ancestry_and_included_edges() {
        let g = line_graph();
        let mut tree = DecisionTree::new(DecisionNode::root(0, Rc::new(CapacityList::new([9.0]))));
        let root = tree.root();
        let x = DecisionNode::exclude(tree.node(root), edge(&g, 0, 1));
        let x = tree.attach(root, Branch::Exclude, x);
        let a = DecisionNode::include(tree.node(x), &g, edge(&g, 0, 2), 0);
        let a = tree.attach(x, Branch::Include, a);
        let b = DecisionNode::include(tree.node(a), &g, edge(&g, 2, 1), 0);
        let b = tree.attach(a, Branch::Include, b);

        let depths: Vec<usize> = tree.ancestry(b).map(|n| n.depth()).collect();
        assert_eq!(depths, vec![3, 2, 1, 0]);
        assert_eq!(tree.included_edges(b), vec![edge(&g, 0, 2), edge(&g, 2, 1)]);
    }
}
