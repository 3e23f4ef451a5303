//! CVRP instances: validation and the plain-text file format.

mod loader;

pub use loader::Instance;
