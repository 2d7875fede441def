//! Error types for network construction.
//!
//! Everything here is a shape or range problem found while turning
//! flattened caller buffers into typed inputs. The simulation itself
//! trusts its inputs and has its own error type in `hopnet-engine`.

use std::error::Error;
use std::fmt;

/// Errors detected while assembling a [`Network`](crate::Network),
/// [`HoppingParams`](crate::HoppingParams) or
/// [`ChargeState`](crate::ChargeState).
#[derive(Clone, Debug, PartialEq)]
pub enum NetworkError {
    /// A flattened buffer has the wrong number of elements.
    LengthMismatch {
        /// Which input was wrong.
        what: &'static str,
        /// Required element count.
        expected: usize,
        /// Element count supplied.
        actual: usize,
    },
    /// Nested rows did not form a square matrix.
    RaggedRows {
        /// Index of the first row with the wrong length.
        row: usize,
        /// Required row length.
        expected: usize,
        /// Length found.
        actual: usize,
    },
    /// A parameter is outside its documented range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                what,
                expected,
                actual,
            } => write!(f, "{what}: expected {expected} elements, got {actual}"),
            Self::RaggedRows {
                row,
                expected,
                actual,
            } => write!(f, "row {row} has {actual} columns, expected {expected}"),
            Self::InvalidParameter { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for NetworkError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_input() {
        let err = NetworkError::LengthMismatch {
            what: "distances",
            expected: 9,
            actual: 8,
        };
        assert_eq!(err.to_string(), "distances: expected 9 elements, got 8");
    }

    #[test]
    fn invalid_parameter_display() {
        let err = NetworkError::InvalidParameter {
            name: "kT",
            value: 0.0,
        };
        assert!(err.to_string().contains("kT"));
    }
}
