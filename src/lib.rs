//! # cvrp-bnb
//!
//! Exact solver for the capacitated vehicle routing problem on complete
//! directed graphs, with a swap-based local search to polish its result.
//!
//! ## Modules
//!
//! - [`models`]: Domain model types (Location, CapacityList, Route, Solution)
//! - [`graph`]: Cost matrix, cost graph and the connectivity oracle
//! - [`search`]: Branch-and-bound engine, decision tree and bounds
//! - [`local_search`]: Giant-tour swap refinement
//! - [`evaluation`]: Solution feasibility checking and cost evaluation
//! - [`instance`]: Instance validation and text format
//! - [`error`]: Instance errors
//!
//! ## Example
//!
//! ```
//! use cvrp_bnb::instance::Instance;
//! use cvrp_bnb::{exact_solve, refine};
//!
//! let instance: Instance = "4  0 1 1 1  10 15 15  15 10 15  15 15 10  10 15 15  10"
//!     .parse()
//!     .unwrap();
//! let graph = instance.graph();
//! let best = exact_solve(graph, instance.capacities(), instance.depot(), 0).unwrap();
//! assert_eq!(best.cost(), 40.0);
//!
//! let refined = refine(&best, graph, instance.capacities(), instance.depot());
//! assert_eq!(refined, best);
//! println!("{refined}");
//! ```

pub mod error;
pub mod evaluation;
pub mod graph;
pub mod instance;
pub mod local_search;
pub mod models;
pub mod search;

pub use local_search::refine;
pub use search::exact_solve;
