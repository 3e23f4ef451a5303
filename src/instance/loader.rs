//! Instance construction and the plain-text instance format.
//!
//! The text format is a stream of whitespace-separated numbers:
//!
//! 1. the number of locations `n`, depot included;
//! 2. `n` demands, one per location;
//! 3. `n·(n−1)` travel costs, row by row, each row skipping its diagonal;
//! 4. one capacity per vehicle, up to the end of the input.

use std::fs;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use crate::error::{non_negative, InstanceError};
use crate::graph::{CostMatrix, Graph};
use crate::models::CapacityList;
use crate::search::{BranchAndBound, SearchOutcome, SolverConfig};

/// A validated CVRP instance: graph, fleet and depot.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::instance::Instance;
/// use cvrp_bnb::search::SolverConfig;
///
/// let text = "3\n0 4 5\n1 1\n1 9\n1 9\n8 8\n";
/// let instance: Instance = text.parse().unwrap();
/// assert_eq!(instance.num_locations(), 3);
/// assert_eq!(instance.capacities().as_slice(), &[8.0, 8.0]);
///
/// let best = instance.solve(SolverConfig::new()).solution.unwrap();
/// assert_eq!(best.cost(), 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    graph: Graph,
    capacities: CapacityList,
    depot: usize,
}

impl Instance {
    /// Builds an instance with the depot at location 0.
    pub fn new(
        demands: &[f64],
        costs: &CostMatrix,
        capacities: impl IntoIterator<Item = f64>,
    ) -> Result<Self, InstanceError> {
        if demands.len() != costs.size() {
            return Err(InstanceError::DemandCount {
                demands: demands.len(),
                locations: costs.size(),
            });
        }
        let graph = Graph::from_matrix(demands, costs)?;
        let capacities = capacities
            .into_iter()
            .map(|c| non_negative("capacity", c))
            .collect::<Result<CapacityList, _>>()?;
        if capacities.is_empty() {
            return Err(InstanceError::NoVehicles);
        }
        Ok(Self {
            graph,
            capacities,
            depot: 0,
        })
    }

    /// Builds an instance with Euclidean travel costs between `points`.
    pub fn from_coordinates(
        points: &[(f64, f64)],
        demands: &[f64],
        capacities: impl IntoIterator<Item = f64>,
    ) -> Result<Self, InstanceError> {
        Self::new(demands, &CostMatrix::from_points(points), capacities)
    }

    /// Parses the text format described in the module docs.
    pub fn parse(text: &str) -> Result<Self, InstanceError> {
        let mut tokens = text.split_whitespace();
        let n: usize = next_token(&mut tokens, "location count")?.parse()?;
        if n < 2 {
            return Err(InstanceError::TooFewLocations(n));
        }
        let demands = (0..n)
            .map(|_| Ok(next_token(&mut tokens, "demands")?.parse::<f64>()?))
            .collect::<Result<Vec<_>, InstanceError>>()?;
        let costs = (0..n * (n - 1))
            .map(|_| Ok(next_token(&mut tokens, "costs")?.parse::<f64>()?))
            .collect::<Result<Vec<_>, InstanceError>>()?;
        let capacities = tokens
            .map(|t| t.parse::<f64>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&demands, &CostMatrix::from_off_diagonal(n, costs)?, capacities)
    }

    /// Reads and parses an instance file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Moves the depot to another location.
    pub fn with_depot(mut self, depot: usize) -> Result<Self, InstanceError> {
        let locations = self.graph.num_locations();
        if depot >= locations {
            return Err(InstanceError::DepotOutOfRange { depot, locations });
        }
        self.depot = depot;
        Ok(self)
    }

    /// The cost graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The fleet.
    pub fn capacities(&self) -> &CapacityList {
        &self.capacities
    }

    /// The depot location.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Number of locations, depot included.
    pub fn num_locations(&self) -> usize {
        self.graph.num_locations()
    }

    /// Runs the exact search on this instance.
    pub fn solve(&self, config: SolverConfig) -> SearchOutcome {
        BranchAndBound::new(&self.graph, &self.capacities, self.depot, config).solve()
    }
}

impl FromStr for Instance {
    type Err = InstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn next_token<'a>(
    tokens: &mut SplitWhitespace<'a>,
    what: &'static str,
) -> Result<&'a str, InstanceError> {
    tokens.next().ok_or(InstanceError::UnexpectedEnd(what))
}
