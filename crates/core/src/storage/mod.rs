//! Unit-free dense/sparse storage engine for vectors and matrices.
//!
//! The engine holds standard-unit magnitudes only; units live in the typed
//! container layer. Each rank is one enum ([`VectorData`], [`MatrixData`])
//! with a `Dense` and a `Sparse` variant. Binary elementwise operations
//! compute the full dense result, data-parallel from
//! [`PARALLEL_THRESHOLD`] cells up, and then compress per the storage-type
//! promotion rule:
//!
//! - plus/minus: sparse only when both operands are sparse
//! - times/divide: dense only when both operands are dense
//!
//! Sparse invariant: indices are strictly ascending and unique, and every
//! stored value is non-zero at the time it is stored. A cell later
//! overwritten with 0.0 through `set_si` keeps its slot; `cardinality()`
//! counts non-zero values in both representations.

pub mod matrix;
pub mod vector;

pub use matrix::MatrixData;
pub use vector::VectorData;

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Requested or actual representation of container data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageType {
    /// Full contiguous array.
    Dense,
    /// Compressed non-zero storage.
    Sparse,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Dense => f.write_str("Dense"),
            StorageType::Sparse => f.write_str("Sparse"),
        }
    }
}

/// Cell count from which dense elementwise kernels run data-parallel.
pub const PARALLEL_THRESHOLD: usize = 1000;

/// Elementwise combination of two equal-length dense slices.
pub(crate) fn combine<F>(left: &[f64], right: &[f64], op: F) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    if left.len() >= PARALLEL_THRESHOLD {
        tracing::trace!(cells = left.len(), "elementwise kernel: parallel");
        left.par_iter()
            .zip(right.par_iter())
            .map(|(&a, &b)| op(a, b))
            .collect()
    } else {
        tracing::trace!(cells = left.len(), "elementwise kernel: serial");
        left.iter().zip(right.iter()).map(|(&a, &b)| op(a, b)).collect()
    }
}

/// In-place unary transform of a dense slice.
pub(crate) fn apply<F>(values: &mut [f64], op: F)
where
    F: Fn(f64) -> f64 + Sync,
{
    if values.len() >= PARALLEL_THRESHOLD {
        tracing::trace!(cells = values.len(), "unary kernel: parallel");
        values.par_iter_mut().for_each(|v| *v = op(*v));
    } else {
        tracing::trace!(cells = values.len(), "unary kernel: serial");
        for v in &mut *values {
            *v = op(*v);
        }
    }
}

/// Promotion rule for plus/minus: sparse only when both operands are sparse.
pub(crate) fn additive_result(left: StorageType, right: StorageType) -> StorageType {
    if left == StorageType::Sparse && right == StorageType::Sparse {
        StorageType::Sparse
    } else {
        StorageType::Dense
    }
}

/// Promotion rule for times/divide: dense only when both operands are dense.
pub(crate) fn multiplicative_result(left: StorageType, right: StorageType) -> StorageType {
    if left == StorageType::Dense && right == StorageType::Dense {
        StorageType::Dense
    } else {
        StorageType::Sparse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_labels() {
        assert_eq!(StorageType::Dense.to_string(), "Dense");
        assert_eq!(StorageType::Sparse.to_string(), "Sparse");
    }

    #[test]
    fn test_promotion_rules() {
        use StorageType::{Dense, Sparse};
        assert_eq!(additive_result(Sparse, Sparse), Sparse);
        assert_eq!(additive_result(Sparse, Dense), Dense);
        assert_eq!(additive_result(Dense, Sparse), Dense);
        assert_eq!(additive_result(Dense, Dense), Dense);
        assert_eq!(multiplicative_result(Dense, Dense), Dense);
        assert_eq!(multiplicative_result(Sparse, Dense), Sparse);
        assert_eq!(multiplicative_result(Dense, Sparse), Sparse);
        assert_eq!(multiplicative_result(Sparse, Sparse), Sparse);
    }

    #[test]
    fn test_combine_serial_and_parallel_agree() {
        let a: Vec<f64> = (0..2048).map(f64::from).collect();
        let b: Vec<f64> = (0..2048).map(|i| f64::from(i) * 0.5).collect();
        let big = combine(&a, &b, |x, y| x + y);
        let small = combine(&a[..10], &b[..10], |x, y| x + y);
        assert_eq!(big[7], small[7]);
        assert_eq!(big[2047], 2047.0 * 1.5);
    }

    #[test]
    fn test_apply_transforms_every_cell() {
        let mut values = vec![1.0, -2.0, 3.0];
        apply(&mut values, f64::abs);
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }
}
