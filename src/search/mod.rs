//! Exact branch-and-bound search.
//!
//! - [`BranchAndBound`], [`exact_solve`]: the search engine
//! - [`DecisionTree`], [`DecisionNode`]: the include/exclude decision tree
//! - [`BoundEstimator`]: lower and upper bounds of a node
//! - [`SolverConfig`], [`IterationBudget`]: search configuration

mod bounds;
mod config;
mod engine;
#[cfg(test)]
mod testing;
mod tree;

pub use bounds::{BoundEstimator, Bounds, Completion, Decisions};
pub use config::{IterationBudget, SolverConfig};
pub use engine::{exact_solve, BranchAndBound, SearchOutcome, SearchStats, SearchStatus};
pub use tree::{Ancestry, Branch, DecisionNode, DecisionTree, NodeId};
