//! Local search applied to the solution of the exact search.
//!
//! - [`GiantTour`]: Depot-separated vertex sequence of a solution
//! - [`refine`]: Pairwise swap improvement on the giant tour

mod giant_tour;
mod swap;

pub use giant_tour::GiantTour;
pub use swap::{refine, refine_with};
