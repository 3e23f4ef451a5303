//! Errors raised while building an instance.
//!
//! Infeasibility is not an error: the solver reports it as `None`.

use std::num::{ParseFloatError, ParseIntError};

/// An instance that cannot be handed to the solver.
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    /// The instance file could not be read.
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// A count is not an unsigned integer.
    #[error("parse int {0}")]
    ParseInt(#[from] ParseIntError),
    /// A demand, cost or capacity is not a number.
    #[error("parse float {0}")]
    ParseFloat(#[from] ParseFloatError),
    /// The input stopped before the named section was complete.
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEnd(&'static str),
    /// A demand, cost or capacity is negative or not finite.
    #[error("{what} must be finite and non-negative, got {value}")]
    InvalidValue {
        /// Name of the offending quantity.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Fewer than a depot and one customer.
    #[error("an instance needs at least 2 locations, got {0}")]
    TooFewLocations(usize),
    /// The fleet is empty.
    #[error("no vehicle capacity given")]
    NoVehicles,
    /// The cost matrix does not match the location count.
    #[error("cost matrix holds {got} values, expected {expected}")]
    MatrixSize {
        /// Values required by the location count.
        expected: usize,
        /// Values supplied.
        got: usize,
    },
    /// The demand list does not match the location count.
    #[error("{demands} demands given for {locations} locations")]
    DemandCount {
        /// Demands supplied.
        demands: usize,
        /// Locations of the instance.
        locations: usize,
    },
    /// The depot is not one of the locations.
    #[error("depot {depot} out of range for {locations} locations")]
    DepotOutOfRange {
        /// Requested depot index.
        depot: usize,
        /// Locations of the instance.
        locations: usize,
    },
}

/// Checks that `value` is a finite, non-negative number.
pub(crate) fn non_negative(what: &'static str, value: f64) -> Result<f64, InstanceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InstanceError::InvalidValue { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative("cost", 3.5).expect("valid"), 3.5);
        assert_eq!(non_negative("cost", 0.0).expect("valid"), 0.0);
        assert!(non_negative("cost", -1.0).is_err());
        assert!(non_negative("cost", f64::NAN).is_err());
        assert!(non_negative("cost", f64::INFINITY).is_err());
    }

    #[test]
    fn test_messages() {
        let err = InstanceError::DepotOutOfRange {
            depot: 7,
            locations: 4,
        };
        assert_eq!(err.to_string(), "depot 7 out of range for 4 locations");
        let err = InstanceError::InvalidValue {
            what: "demand",
            value: -2.0,
        };
        assert_eq!(err.to_string(), "demand must be finite and non-negative, got -2");
        let err = InstanceError::MatrixSize {
            expected: 6,
            got: 5,
        };
        assert_eq!(err.to_string(), "cost matrix holds 5 values, expected 6");
        let err = InstanceError::DemandCount {
            demands: 3,
            locations: 4,
        };
        assert_eq!(err.to_string(), "3 demands given for 4 locations");
        assert_eq!(
            InstanceError::TooFewLocations(1).to_string(),
            "an instance needs at least 2 locations, got 1"
        );
        assert_eq!(InstanceError::NoVehicles.to_string(), "no vehicle capacity given");
        assert_eq!(
            InstanceError::UnexpectedEnd("demands").to_string(),
            "unexpected end of input while reading demands"
        );
    }
}
