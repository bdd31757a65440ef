//! Dense/sparse storage for 1-D collections of standard-unit magnitudes.

use serde::{Deserialize, Serialize};

use super::{additive_result, apply, combine, multiplicative_result, StorageType};
use crate::error::ValueError;

/// Backing data of a typed vector: standard-unit magnitudes, no unit.
///
/// The `Sparse` variant stores non-zero entries as parallel index/value
/// arrays; indices are strictly ascending and unique. Constructors uphold
/// the invariant; code building variants directly must do the same.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VectorData {
    /// Full contiguous array of every cell.
    Dense {
        /// Cell magnitudes.
        values: Vec<f64>,
    },
    /// Compressed storage of the non-zero cells.
    Sparse {
        /// Ascending, unique cell indices.
        indices: Vec<usize>,
        /// Magnitudes parallel to `indices`.
        values: Vec<f64>,
        /// Logical cell count.
        size: usize,
    },
}

impl VectorData {
    /// Store `values` in the requested representation.
    ///
    /// # Errors
    /// Returns [`ValueError::Construction`] when `values` is empty.
    pub fn instantiate(values: &[f64], storage: StorageType) -> Result<VectorData, ValueError> {
        if values.is_empty() {
            return Err(ValueError::Construction(
                "cannot create a vector from an empty array".to_string(),
            ));
        }
        Ok(match storage {
            StorageType::Dense => VectorData::Dense {
                values: values.to_vec(),
            },
            StorageType::Sparse => VectorData::compress(values.to_vec()),
        })
    }

    /// Sparse vector from (index, value) pairs and a logical size. Pairs may
    /// arrive in any order; zero values are dropped.
    ///
    /// # Errors
    /// Returns [`ValueError::Construction`] when `size` is zero, an index
    /// falls outside `0..size`, or an index occurs twice.
    pub fn from_sparse_pairs(pairs: &[(usize, f64)], size: usize) -> Result<VectorData, ValueError> {
        if size == 0 {
            return Err(ValueError::Construction(
                "cannot create a vector of size 0".to_string(),
            ));
        }
        let mut entries: Vec<(usize, f64)> =
            pairs.iter().filter(|&&(_, value)| value != 0.0).copied().collect();
        entries.sort_unstable_by_key(|&(index, _)| index);
        let mut indices = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            if index >= size {
                return Err(ValueError::Construction(format!(
                    "sparse index {index} out of range for size {size}"
                )));
            }
            if indices.last() == Some(&index) {
                return Err(ValueError::Construction(format!(
                    "duplicate sparse index {index}"
                )));
            }
            indices.push(index);
            values.push(value);
        }
        Ok(VectorData::Sparse {
            indices,
            values,
            size,
        })
    }

    /// Compress dense values into sparse form, dropping exact zeros.
    pub(crate) fn compress(values: Vec<f64>) -> VectorData {
        let size = values.len();
        let mut indices = Vec::new();
        let mut kept = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            if value != 0.0 {
                indices.push(index);
                kept.push(value);
            }
        }
        VectorData::Sparse {
            indices,
            values: kept,
            size,
        }
    }

    /// Logical cell count.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            VectorData::Dense { values } => values.len(),
            VectorData::Sparse { size, .. } => *size,
        }
    }

    /// Current representation.
    #[must_use]
    pub fn storage_type(&self) -> StorageType {
        match self {
            VectorData::Dense { .. } => StorageType::Dense,
            VectorData::Sparse { .. } => StorageType::Sparse,
        }
    }

    /// Magnitude at `index`. Panics when `index` is out of bounds; the typed
    /// containers bounds-check before calling.
    #[must_use]
    pub fn get_si(&self, index: usize) -> f64 {
        match self {
            VectorData::Dense { values } => values[index],
            VectorData::Sparse {
                indices,
                values,
                size,
            } => {
                assert!(index < *size, "index {index} out of range for size {size}");
                match indices.binary_search(&index) {
                    Ok(pos) => values[pos],
                    Err(_) => 0.0,
                }
            }
        }
    }

    /// Overwrite the magnitude at `index`. A sparse write to an absent index
    /// performs an ordered insert; writing 0.0 over an existing sparse slot
    /// keeps the slot (no pruning). Panics when `index` is out of bounds.
    pub fn set_si(&mut self, index: usize, value: f64) {
        match self {
            VectorData::Dense { values } => values[index] = value,
            VectorData::Sparse {
                indices,
                values,
                size,
            } => {
                assert!(index < *size, "index {index} out of range for size {size}");
                match indices.binary_search(&index) {
                    Ok(pos) => values[pos] = value,
                    Err(pos) => {
                        if value != 0.0 {
                            indices.insert(pos, index);
                            values.insert(pos, value);
                        }
                    }
                }
            }
        }
    }

    /// Every cell magnitude as a fresh dense vector.
    #[must_use]
    pub fn dense_values(&self) -> Vec<f64> {
        match self {
            VectorData::Dense { values } => values.clone(),
            VectorData::Sparse {
                indices,
                values,
                size,
            } => {
                let mut out = vec![0.0; *size];
                for (index, value) in indices.iter().zip(values) {
                    out[*index] = *value;
                }
                out
            }
        }
    }

    /// Dense rendition of the data; a no-op move when already dense.
    #[must_use]
    pub fn to_dense(self) -> VectorData {
        match self {
            VectorData::Dense { .. } => self,
            VectorData::Sparse { .. } => VectorData::Dense {
                values: self.dense_values(),
            },
        }
    }

    /// Sparse rendition of the data; a no-op move when already sparse.
    #[must_use]
    pub fn to_sparse(self) -> VectorData {
        match self {
            VectorData::Sparse { .. } => self,
            VectorData::Dense { values } => VectorData::compress(values),
        }
    }

    fn check_sizes(&self, other: &VectorData) -> Result<(), ValueError> {
        if self.size() != other.size() {
            return Err(ValueError::shape(self.size(), other.size()));
        }
        Ok(())
    }

    fn binary<F>(
        &self,
        other: &VectorData,
        op: F,
        promote: fn(StorageType, StorageType) -> StorageType,
    ) -> Result<VectorData, ValueError>
    where
        F: Fn(f64, f64) -> f64 + Sync,
    {
        self.check_sizes(other)?;
        let result = combine(&self.dense_values(), &other.dense_values(), op);
        let storage = promote(self.storage_type(), other.storage_type());
        tracing::trace!(
            left = %self.storage_type(),
            right = %other.storage_type(),
            result = %storage,
            "vector storage promotion"
        );
        Ok(match storage {
            StorageType::Dense => VectorData::Dense { values: result },
            StorageType::Sparse => VectorData::compress(result),
        })
    }

    /// Elementwise sum; sparse when both operands are sparse.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ; no cell
    /// is computed in that case.
    pub fn plus(&self, other: &VectorData) -> Result<VectorData, ValueError> {
        self.binary(other, |a, b| a + b, additive_result)
    }

    /// Elementwise difference; sparse when both operands are sparse.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ.
    pub fn minus(&self, other: &VectorData) -> Result<VectorData, ValueError> {
        self.binary(other, |a, b| a - b, additive_result)
    }

    /// Elementwise product; dense only when both operands are dense.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ.
    pub fn times(&self, other: &VectorData) -> Result<VectorData, ValueError> {
        self.binary(other, |a, b| a * b, multiplicative_result)
    }

    /// Elementwise quotient; dense only when both operands are dense. Zero
    /// divisors follow IEEE semantics (infinities and NaN propagate).
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ.
    pub fn divide(&self, other: &VectorData) -> Result<VectorData, ValueError> {
        self.binary(other, |a, b| a / b, multiplicative_result)
    }

    fn stored_values_mut(&mut self) -> &mut [f64] {
        match self {
            VectorData::Dense { values } | VectorData::Sparse { values, .. } => values,
        }
    }

    fn stored_values(&self) -> &[f64] {
        match self {
            VectorData::Dense { values } | VectorData::Sparse { values, .. } => values,
        }
    }

    /// Scale every stored magnitude in place. Absent sparse cells stay zero,
    /// so the representation is unchanged.
    pub fn multiply_by(&mut self, factor: f64) {
        apply(self.stored_values_mut(), |v| v * factor);
    }

    /// Divide every stored magnitude in place. Absent sparse cells stay
    /// zero, so the representation is unchanged.
    pub fn divide_by(&mut self, divisor: f64) {
        apply(self.stored_values_mut(), |v| v / divisor);
    }

    /// Apply `op` to every cell. Operates on a dense copy (the transform of
    /// an implicit zero may be non-zero) and leaves the data dense.
    pub fn assign<F>(&mut self, op: F)
    where
        F: Fn(f64) -> f64 + Sync,
    {
        if self.storage_type() == StorageType::Sparse {
            tracing::debug!(size = self.size(), "assign promotes sparse vector data dense");
        }
        let mut values = self.dense_values();
        apply(&mut values, op);
        *self = VectorData::Dense { values };
    }

    /// Sum of all magnitudes.
    #[must_use]
    pub fn zsum(&self) -> f64 {
        self.stored_values().iter().sum()
    }

    /// Count of cells holding a non-zero magnitude.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.stored_values().iter().filter(|&&v| v != 0.0).count()
    }
}

/// Logical cell equality across representations: dense `[0, 5]` equals
/// sparse `{1 -> 5}` of size 2.
impl PartialEq for VectorData {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && (0..self.size()).all(|i| self.get_si(i) == other.get_si(i))
    }
}
