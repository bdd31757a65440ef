//! Dense/sparse storage for 2-D collections of standard-unit magnitudes.
//!
//! Cells are addressed row-major: the flattened index of `(row, col)` is
//! `row * cols + col`. The sparse variant keeps flattened indices.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::{additive_result, apply, combine, multiplicative_result, StorageType};
use crate::error::ValueError;

/// Backing data of a typed matrix: standard-unit magnitudes, no unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatrixData {
    /// Full row-major array of every cell.
    Dense {
        /// Cell magnitudes, row-major.
        values: Vec<f64>,
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },
    /// Compressed storage of the non-zero cells.
    Sparse {
        /// Ascending, unique flattened row-major indices.
        indices: Vec<usize>,
        /// Magnitudes parallel to `indices`.
        values: Vec<f64>,
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },
}

impl MatrixData {
    /// Store a row-of-rows layout in the requested representation.
    ///
    /// # Errors
    /// Returns [`ValueError::Construction`] when `rows_data` or its first
    /// row is empty, or when rows have unequal lengths.
    pub fn instantiate(rows_data: &[Vec<f64>], storage: StorageType) -> Result<MatrixData, ValueError> {
        if rows_data.is_empty() || rows_data[0].is_empty() {
            return Err(ValueError::Construction(
                "cannot create a matrix from an empty array".to_string(),
            ));
        }
        let cols = rows_data[0].len();
        let mut values = Vec::with_capacity(rows_data.len() * cols);
        for row in rows_data {
            if row.len() != cols {
                return Err(ValueError::Construction(format!(
                    "matrix rows have unequal lengths: {} vs {}",
                    cols,
                    row.len()
                )));
            }
            values.extend_from_slice(row);
        }
        Self::from_flat(&values, rows_data.len(), cols, storage)
    }

    /// Store an already-flattened row-major array.
    ///
    /// # Errors
    /// Returns [`ValueError::Construction`] when either dimension is zero or
    /// `values.len()` is not `rows * cols`.
    pub fn from_flat(
        values: &[f64],
        rows: usize,
        cols: usize,
        storage: StorageType,
    ) -> Result<MatrixData, ValueError> {
        if rows == 0 || cols == 0 {
            return Err(ValueError::Construction(
                "cannot create a matrix with a zero dimension".to_string(),
            ));
        }
        if values.len() != rows * cols {
            return Err(ValueError::Construction(format!(
                "expected {} values for a {rows}x{cols} matrix, got {}",
                rows * cols,
                values.len()
            )));
        }
        Ok(match storage {
            StorageType::Dense => MatrixData::Dense {
                values: values.to_vec(),
                rows,
                cols,
            },
            StorageType::Sparse => MatrixData::compress(values.to_vec(), rows, cols),
        })
    }

    /// Sparse matrix from (row, col, value) triples. Triples may arrive in
    /// any order; zero values are dropped.
    ///
    /// # Errors
    /// Returns [`ValueError::Construction`] when either dimension is zero, a
    /// coordinate falls outside the shape, or a cell occurs twice.
    pub fn from_sparse_triples(
        triples: &[(usize, usize, f64)],
        rows: usize,
        cols: usize,
    ) -> Result<MatrixData, ValueError> {
        if rows == 0 || cols == 0 {
            return Err(ValueError::Construction(
                "cannot create a matrix with a zero dimension".to_string(),
            ));
        }
        let mut entries = Vec::with_capacity(triples.len());
        for &(row, col, value) in triples {
            if row >= rows || col >= cols {
                return Err(ValueError::Construction(format!(
                    "sparse cell ({row}, {col}) out of range for a {rows}x{cols} matrix"
                )));
            }
            if value != 0.0 {
                entries.push((row * cols + col, value));
            }
        }
        entries.sort_unstable_by_key(|&(index, _)| index);
        let mut indices = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            if indices.last() == Some(&index) {
                return Err(ValueError::Construction(format!(
                    "duplicate sparse cell ({}, {})",
                    index / cols,
                    index % cols
                )));
            }
            indices.push(index);
            values.push(value);
        }
        Ok(MatrixData::Sparse {
            indices,
            values,
            rows,
            cols,
        })
    }

    /// Compress flattened dense values into sparse form, dropping zeros.
    pub(crate) fn compress(values: Vec<f64>, rows: usize, cols: usize) -> MatrixData {
        let mut indices = Vec::new();
        let mut kept = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            if value != 0.0 {
                indices.push(index);
                kept.push(value);
            }
        }
        MatrixData::Sparse {
            indices,
            values: kept,
            rows,
            cols,
        }
    }

    /// Row count.
    #[must_use]
    pub fn rows(&self) -> usize {
        match self {
            MatrixData::Dense { rows, .. } | MatrixData::Sparse { rows, .. } => *rows,
        }
    }

    /// Column count.
    #[must_use]
    pub fn cols(&self) -> usize {
        match self {
            MatrixData::Dense { cols, .. } | MatrixData::Sparse { cols, .. } => *cols,
        }
    }

    /// Current representation.
    #[must_use]
    pub fn storage_type(&self) -> StorageType {
        match self {
            MatrixData::Dense { .. } => StorageType::Dense,
            MatrixData::Sparse { .. } => StorageType::Sparse,
        }
    }

    fn shape_string(&self) -> String {
        format!("{}x{}", self.rows(), self.cols())
    }

    /// Magnitude at `(row, col)`. Panics when the cell is out of bounds; the
    /// typed containers bounds-check before calling.
    #[must_use]
    pub fn get_si(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.rows() && col < self.cols(),
            "cell ({row}, {col}) out of range for a {} matrix",
            self.shape_string()
        );
        let flat = row * self.cols() + col;
        match self {
            MatrixData::Dense { values, .. } => values[flat],
            MatrixData::Sparse { indices, values, .. } => match indices.binary_search(&flat) {
                Ok(pos) => values[pos],
                Err(_) => 0.0,
            },
        }
    }

    /// Overwrite the magnitude at `(row, col)`. A sparse write to an absent
    /// cell performs an ordered insert; writing 0.0 over an existing sparse
    /// slot keeps the slot. Panics when the cell is out of bounds.
    pub fn set_si(&mut self, row: usize, col: usize, value: f64) {
        assert!(
            row < self.rows() && col < self.cols(),
            "cell ({row}, {col}) out of range for a {} matrix",
            self.shape_string()
        );
        let flat = row * self.cols() + col;
        match self {
            MatrixData::Dense { values, .. } => values[flat] = value,
            MatrixData::Sparse { indices, values, .. } => match indices.binary_search(&flat) {
                Ok(pos) => values[pos] = value,
                Err(pos) => {
                    if value != 0.0 {
                        indices.insert(pos, flat);
                        values.insert(pos, value);
                    }
                }
            },
        }
    }

    /// Every cell magnitude as a fresh flattened row-major vector.
    #[must_use]
    pub fn dense_values(&self) -> Vec<f64> {
        match self {
            MatrixData::Dense { values, .. } => values.clone(),
            MatrixData::Sparse {
                indices,
                values,
                rows,
                cols,
            } => {
                let mut out = vec![0.0; rows * cols];
                for (index, value) in indices.iter().zip(values) {
                    out[*index] = *value;
                }
                out
            }
        }
    }

    /// Dense rendition of the data; a no-op move when already dense.
    #[must_use]
    pub fn to_dense(self) -> MatrixData {
        match self {
            MatrixData::Dense { .. } => self,
            MatrixData::Sparse { rows, cols, .. } => MatrixData::Dense {
                values: self.dense_values(),
                rows,
                cols,
            },
        }
    }

    /// Sparse rendition of the data; a no-op move when already sparse.
    #[must_use]
    pub fn to_sparse(self) -> MatrixData {
        match self {
            MatrixData::Sparse { .. } => self,
            MatrixData::Dense { values, rows, cols } => MatrixData::compress(values, rows, cols),
        }
    }

    fn check_shapes(&self, other: &MatrixData) -> Result<(), ValueError> {
        if self.rows() != other.rows() || self.cols() != other.cols() {
            return Err(ValueError::shape(self.shape_string(), other.shape_string()));
        }
        Ok(())
    }

    fn binary<F>(
        &self,
        other: &MatrixData,
        op: F,
        promote: fn(StorageType, StorageType) -> StorageType,
    ) -> Result<MatrixData, ValueError>
    where
        F: Fn(f64, f64) -> f64 + Sync,
    {
        self.check_shapes(other)?;
        let result = combine(&self.dense_values(), &other.dense_values(), op);
        let storage = promote(self.storage_type(), other.storage_type());
        tracing::trace!(
            left = %self.storage_type(),
            right = %other.storage_type(),
            result = %storage,
            "matrix storage promotion"
        );
        Ok(match storage {
            StorageType::Dense => MatrixData::Dense {
                values: result,
                rows: self.rows(),
                cols: self.cols(),
            },
            StorageType::Sparse => MatrixData::compress(result, self.rows(), self.cols()),
        })
    }

    /// Cellwise sum; sparse when both operands are sparse.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ; no cell
    /// is computed in that case.
    pub fn plus(&self, other: &MatrixData) -> Result<MatrixData, ValueError> {
        self.binary(other, |a, b| a + b, additive_result)
    }

    /// Cellwise difference; sparse when both operands are sparse.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
    pub fn minus(&self, other: &MatrixData) -> Result<MatrixData, ValueError> {
        self.binary(other, |a, b| a - b, additive_result)
    }

    /// Cellwise (Hadamard) product; dense only when both operands are dense.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
    pub fn times(&self, other: &MatrixData) -> Result<MatrixData, ValueError> {
        self.binary(other, |a, b| a * b, multiplicative_result)
    }

    /// Cellwise quotient; dense only when both operands are dense. Zero
    /// divisors follow IEEE semantics.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
    pub fn divide(&self, other: &MatrixData) -> Result<MatrixData, ValueError> {
        self.binary(other, |a, b| a / b, multiplicative_result)
    }

    fn stored_values_mut(&mut self) -> &mut [f64] {
        match self {
            MatrixData::Dense { values, .. } | MatrixData::Sparse { values, .. } => values,
        }
    }

    fn stored_values(&self) -> &[f64] {
        match self {
            MatrixData::Dense { values, .. } | MatrixData::Sparse { values, .. } => values,
        }
    }

    /// Scale every stored magnitude in place; the representation is
    /// unchanged.
    pub fn multiply_by(&mut self, factor: f64) {
        apply(self.stored_values_mut(), |v| v * factor);
    }

    /// Divide every stored magnitude in place; the representation is
    /// unchanged.
    pub fn divide_by(&mut self, divisor: f64) {
        apply(self.stored_values_mut(), |v| v / divisor);
    }

    /// Apply `op` to every cell on a dense copy; leaves the data dense.
    pub fn assign<F>(&mut self, op: F)
    where
        F: Fn(f64) -> f64 + Sync,
    {
        if self.storage_type() == StorageType::Sparse {
            tracing::debug!(
                rows = self.rows(),
                cols = self.cols(),
                "assign promotes sparse matrix data dense"
            );
        }
        let mut values = self.dense_values();
        apply(&mut values, op);
        *self = MatrixData::Dense {
            values,
            rows: self.rows(),
            cols: self.cols(),
        };
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

    /// Determinant of the magnitudes, via LU decomposition.
    ///
    /// # Errors
    /// Returns [`ValueError::DegenerateOperation`] when the matrix is not
    /// square; the decomposition is not attempted in that case.
    pub fn determinant(&self) -> Result<f64, ValueError> {
        if self.rows() != self.cols() {
            return Err(ValueError::DegenerateOperation(format!(
                "cannot take the determinant of a {} matrix",
                self.shape_string()
            )));
        }
        let m = DMatrix::from_row_slice(self.rows(), self.cols(), &self.dense_values());
        Ok(m.determinant())
    }
}

/// Logical cell equality across representations.
impl PartialEq for MatrixData {
    fn eq(&self, other: &Self) -> bool {
        self.rows() == other.rows()
            && self.cols() == other.cols()
            && self.dense_values() == other.dense_values()
    }
}
