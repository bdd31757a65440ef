//! Error taxonomy shared by units, scalars, and containers.
//!
//! Every fallible operation in the crate reports through [`ValueError`] at
//! the call that detects the problem. Operations never partially apply: on
//! error, every operand is left exactly as it was.

use std::fmt;

/// Errors raised by unit construction, value conversion, and container
/// arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Operand containers have different sizes in an elementwise operation.
    ShapeMismatch {
        /// Shape of the left operand ("5" for vectors, "3x4" for matrices).
        left: String,
        /// Shape of the right operand.
        right: String,
    },
    /// A cell index lies outside the container bounds.
    IndexOutOfRange {
        /// The offending index ("7" or "(2,5)").
        index: String,
        /// The valid bound ("5" or "3x4").
        bound: String,
    },
    /// Two SI dimensional signatures that must agree do not.
    DimensionalIncompatibility {
        /// Signature of the left/expected side.
        left: String,
        /// Signature of the right/actual side.
        right: String,
    },
    /// The operation is undefined for the given data, e.g. normalizing a
    /// zero-sum container or taking the determinant of a non-square matrix.
    DegenerateOperation(String),
    /// Malformed construction input: empty value arrays, ragged matrix rows,
    /// duplicate or out-of-range sparse indices, unparseable text.
    Construction(String),
}

impl ValueError {
    pub(crate) fn shape(left: impl fmt::Display, right: impl fmt::Display) -> Self {
        ValueError::ShapeMismatch {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub(crate) fn index(index: impl fmt::Display, bound: impl fmt::Display) -> Self {
        ValueError::IndexOutOfRange {
            index: index.to_string(),
            bound: bound.to_string(),
        }
    }

    pub(crate) fn dimensions(left: impl fmt::Display, right: impl fmt::Display) -> Self {
        ValueError::DimensionalIncompatibility {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::ShapeMismatch { left, right } => {
                write!(f, "shape mismatch between operands: {left} vs {right}")
            }
            ValueError::IndexOutOfRange { index, bound } => {
                write!(f, "index {index} out of range for size {bound}")
            }
            ValueError::DimensionalIncompatibility { left, right } => {
                write!(f, "incompatible SI dimensions: {left} vs {right}")
            }
            ValueError::DegenerateOperation(msg) => write!(f, "degenerate operation: {msg}"),
            ValueError::Construction(msg) => write!(f, "construction failed: {msg}"),
        }
    }
}

impl std::error::Error for ValueError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = ValueError::shape(5, "3x4");
        assert_eq!(
            err.to_string(),
            "shape mismatch between operands: 5 vs 3x4"
        );
    }

    #[test]
    fn test_degenerate_message() {
        let err = ValueError::DegenerateOperation("zSum is 0; cannot normalize".to_string());
        assert_eq!(
            err.to_string(),
            "degenerate operation: zSum is 0; cannot normalize"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        fn takes_error(_e: &dyn std::error::Error) {}
        takes_error(&ValueError::Construction("empty".to_string()));
    }
}
