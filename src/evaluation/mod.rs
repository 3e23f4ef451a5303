//! Feasibility checking and cost evaluation of finished solutions.

mod evaluator;

pub use evaluator::SolutionEvaluator;
