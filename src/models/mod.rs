//! Domain model types for capacitated vehicle routing.
//!
//! Provides locations with demands, the vehicle capacity multiset the
//! search consumes from, routes, and solutions as ordered edge sequences.

mod capacity;
mod location;
mod route;
mod solution;

pub use capacity::{CapacityList, CapacityPolicy};
pub use location::Location;
pub use route::Route;
pub use solution::{report, Solution, Violation, ViolationType};
