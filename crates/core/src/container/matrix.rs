//! Typed matrices: engine data plus a display unit.
//!
//! Mirrors the vector containers ([`super::vector`]) at rank 2: cells are
//! addressed `(row, col)`, dumps render rows separated by `;`, and the
//! determinant is exposed on every flavor.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{abs_result_unit, result_unit};
use crate::error::ValueError;
use crate::format;
use crate::scalar::{Abs, Rel};
use crate::storage::{MatrixData, StorageType};
use crate::units::{AbsoluteUnit, Unit, UnitDivide, UnitTimes};

/// Immutable matrix of relative quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RelMatrix<U: Unit> {
    data: Arc<MatrixData>,
    unit: U,
}

/// Immutable matrix of absolute quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct AbsMatrix<AU: AbsoluteUnit> {
    data: Arc<MatrixData>,
    unit: AU,
}

/// Mutable matrix of relative quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MutableRelMatrix<U: Unit> {
    data: Arc<MatrixData>,
    unit: U,
}

/// Mutable matrix of absolute quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MutableAbsMatrix<AU: AbsoluteUnit> {
    data: Arc<MatrixData>,
    unit: AU,
}

/// Stamps the shared read surface of one matrix container type.
macro_rules! matrix_read_api {
    ($container:ident, $scalar:ident, $bound:ident, $prefix:literal) => {
        impl<U: $bound> $container<U> {
            /// Matrix from nested rows of magnitudes expressed in `unit`.
            ///
            /// # Errors
            /// Returns [`ValueError::Construction`] when `rows_data` is
            /// empty or ragged.
            pub fn new(
                rows_data: &[Vec<f64>],
                unit: U,
                storage: StorageType,
            ) -> Result<Self, ValueError> {
                let si: Vec<Vec<f64>> = rows_data
                    .iter()
                    .map(|row| row.iter().map(|v| unit.to_standard(*v)).collect())
                    .collect();
                Ok(Self {
                    data: Arc::new(MatrixData::instantiate(&si, storage)?),
                    unit,
                })
            }

            /// Matrix from a flattened row-major array of magnitudes
            /// expressed in `unit`.
            ///
            /// # Errors
            /// Returns [`ValueError::Construction`] when a dimension is
            /// zero or `values.len()` is not `rows * cols`.
            pub fn from_flat(
                values: &[f64],
                rows: usize,
                cols: usize,
                unit: U,
                storage: StorageType,
            ) -> Result<Self, ValueError> {
                let si: Vec<f64> = values.iter().map(|v| unit.to_standard(*v)).collect();
                Ok(Self {
                    data: Arc::new(MatrixData::from_flat(&si, rows, cols, storage)?),
                    unit,
                })
            }

            /// Matrix from nested rows of typed scalars; the display unit
            /// is the first scalar's unit.
            ///
            /// # Errors
            /// Returns [`ValueError::Construction`] when `rows_data` is
            /// empty or ragged.
            pub fn from_scalars(
                rows_data: &[Vec<$scalar<U>>],
                storage: StorageType,
            ) -> Result<Self, ValueError> {
                let Some(first) = rows_data.first().and_then(|row| row.first()) else {
                    return Err(ValueError::Construction(
                        "cannot create a matrix from an empty array".to_string(),
                    ));
                };
                let si: Vec<Vec<f64>> = rows_data
                    .iter()
                    .map(|row| row.iter().map(|s| s.si()).collect())
                    .collect();
                Ok(Self {
                    data: Arc::new(MatrixData::instantiate(&si, storage)?),
                    unit: first.unit(),
                })
            }

            /// Zero-copy wrapper around engine data already in standard
            /// units.
            pub(crate) fn from_data(data: Arc<MatrixData>, unit: U) -> Self {
                Self { data, unit }
            }

            fn check_cell(&self, row: usize, col: usize) -> Result<(), ValueError> {
                if row >= self.data.rows() || col >= self.data.cols() {
                    return Err(ValueError::index(
                        format!("({row}, {col})"),
                        format!("{}x{}", self.data.rows(), self.data.cols()),
                    ));
                }
                Ok(())
            }

            /// Row count.
            #[must_use]
            pub fn rows(&self) -> usize {
                self.data.rows()
            }

            /// Column count.
            #[must_use]
            pub fn cols(&self) -> usize {
                self.data.cols()
            }

            /// Current backing representation.
            #[must_use]
            pub fn storage_type(&self) -> StorageType {
                self.data.storage_type()
            }

            /// Display unit.
            #[must_use]
            pub fn unit(&self) -> U {
                self.unit
            }

            /// Typed scalar at `(row, col)`, in the display unit.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when the cell is out
            /// of bounds.
            pub fn get(&self, row: usize, col: usize) -> Result<$scalar<U>, ValueError> {
                self.check_cell(row, col)?;
                Ok($scalar::from_si_in(self.data.get_si(row, col), self.unit))
            }

            /// Standard-unit magnitude at `(row, col)`.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when the cell is out
            /// of bounds.
            pub fn get_si(&self, row: usize, col: usize) -> Result<f64, ValueError> {
                self.check_cell(row, col)?;
                Ok(self.data.get_si(row, col))
            }

            /// Magnitude at `(row, col)` in the display unit.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when the cell is out
            /// of bounds.
            pub fn get_in_unit(&self, row: usize, col: usize) -> Result<f64, ValueError> {
                Ok(self.unit.from_standard(self.get_si(row, col)?))
            }

            /// Magnitude at `(row, col)` in `target`.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when the cell is out
            /// of bounds.
            pub fn get_in_unit_of(
                &self,
                row: usize,
                col: usize,
                target: U,
            ) -> Result<f64, ValueError> {
                Ok(target.from_standard(self.get_si(row, col)?))
            }

            /// Every magnitude in standard units, flattened row-major.
            #[must_use]
            pub fn values_si(&self) -> Vec<f64> {
                self.data.dense_values()
            }

            /// Every magnitude in the display unit, flattened row-major.
            #[must_use]
            pub fn values_in_unit(&self) -> Vec<f64> {
                self.values_in_unit_of(self.unit)
            }

            /// Every magnitude in `target`, flattened row-major.
            #[must_use]
            pub fn values_in_unit_of(&self, target: U) -> Vec<f64> {
                self.data
                    .dense_values()
                    .into_iter()
                    .map(|si| target.from_standard(si))
                    .collect()
            }

            /// Typed scalars in row-major order.
            pub fn iter(&self) -> impl Iterator<Item = $scalar<U>> + '_ {
                let unit = self.unit;
                let cols = self.data.cols();
                (0..self.data.rows() * cols).map(move |flat| {
                    $scalar::from_si_in(self.data.get_si(flat / cols, flat % cols), unit)
                })
            }

            /// Sum of all cells, as a typed scalar in the display unit.
            #[must_use]
            pub fn zsum(&self) -> $scalar<U> {
                $scalar::from_si_in(self.data.zsum(), self.unit)
            }

            /// Count of cells holding a non-zero magnitude.
            #[must_use]
            pub fn cardinality(&self) -> usize {
                self.data.cardinality()
            }

            /// Determinant of the standard-unit magnitudes.
            ///
            /// # Errors
            /// Returns [`ValueError::DegenerateOperation`] when the matrix
            /// is not square.
            pub fn determinant(&self) -> Result<f64, ValueError> {
                self.data.determinant()
            }

            /// Dense rendition; keeps the backing buffer when already
            /// dense.
            #[must_use]
            pub fn to_dense(self) -> Self {
                if self.data.storage_type() == StorageType::Dense {
                    return self;
                }
                Self {
                    data: Arc::new(MatrixData::Dense {
                        values: self.data.dense_values(),
                        rows: self.data.rows(),
                        cols: self.data.cols(),
                    }),
                    unit: self.unit,
                }
            }

            /// Sparse rendition; keeps the backing buffer when already
            /// sparse.
            #[must_use]
            pub fn to_sparse(self) -> Self {
                if self.data.storage_type() == StorageType::Sparse {
                    return self;
                }
                Self {
                    data: Arc::new(MatrixData::compress(
                        self.data.dense_values(),
                        self.data.rows(),
                        self.data.cols(),
                    )),
                    unit: self.unit,
                }
            }

            /// Fixed-width dump in `unit`: rows separated by `;`, cells by
            /// spaces. `verbose` prepends
            #[doc = concat!("\"", $prefix, "Dense \" or \"", $prefix, "Sparse \";")]
            /// `with_unit` appends the abbreviation.
            #[must_use]
            pub fn to_text(&self, unit: U, verbose: bool, with_unit: bool) -> String {
                let mut buf = String::new();
                if verbose {
                    buf.push_str($prefix);
                    buf.push_str(&self.data.storage_type().to_string());
                    buf.push(' ');
                }
                buf.push('[');
                let cols = self.data.cols();
                for (flat, value) in self.values_in_unit_of(unit).into_iter().enumerate() {
                    if flat > 0 {
                        buf.push_str(if flat % cols == 0 { "; " } else { " " });
                    }
                    buf.push_str(&format::format_f64(value));
                }
                buf.push(']');
                if with_unit {
                    buf.push(' ');
                    buf.push_str(unit.abbreviation());
                }
                buf
            }
        }

        impl<U: $bound> fmt::Display for $container<U> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_text(self.unit, false, true))
            }
        }

        /// Logical cell equality across representations; the display unit
        /// does not participate.
        impl<U: $bound> PartialEq for $container<U> {
            fn eq(&self, other: &Self) -> bool {
                self.data == other.data
            }
        }
    };
}

/// Stamps the cell-level write surface of one mutable matrix type. Every
/// write passes the copy-on-write guard.
macro_rules! matrix_write_api {
    ($container:ident, $scalar:ident, $bound:ident) => {
        impl<U: $bound> $container<U> {
            /// Copy-on-write guard: materializes a private copy when the
            /// buffer is shared, then hands out the exclusive reference.
            fn write(&mut self) -> &mut MatrixData {
                if Arc::strong_count(&self.data) > 1 {
                    tracing::debug!(
                        rows = self.data.rows(),
                        cols = self.data.cols(),
                        "materializing private copy of shared matrix data"
                    );
                }
                Arc::make_mut(&mut self.data)
            }

            /// Overwrite the cell at `(row, col)` with a typed scalar.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when the cell is out
            /// of bounds.
            pub fn set(
                &mut self,
                row: usize,
                col: usize,
                value: $scalar<U>,
            ) -> Result<(), ValueError> {
                self.set_si(row, col, value.si())
            }

            /// Overwrite the standard-unit magnitude at `(row, col)`.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when the cell is out
            /// of bounds.
            pub fn set_si(&mut self, row: usize, col: usize, si: f64) -> Result<(), ValueError> {
                self.check_cell(row, col)?;
                self.write().set_si(row, col, si);
                Ok(())
            }

            /// Overwrite the cell at `(row, col)` with a magnitude
            /// expressed in the display unit.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when the cell is out
            /// of bounds.
            pub fn set_in_unit(
                &mut self,
                row: usize,
                col: usize,
                value: f64,
            ) -> Result<(), ValueError> {
                self.set_si(row, col, self.unit.to_standard(value))
            }

            /// Scale every cell in place; the representation is unchanged.
            pub fn multiply_by(&mut self, factor: f64) {
                self.write().multiply_by(factor);
            }

            /// Divide every cell in place; the representation is unchanged.
            pub fn divide_by(&mut self, divisor: f64) {
                self.write().divide_by(divisor);
            }

            /// Apply `op` to every standard-unit magnitude; the result is
            /// dense.
            pub fn assign<F>(&mut self, op: F)
            where
                F: Fn(f64) -> f64 + Sync,
            {
                self.write().assign(op);
            }
        }
    };
}

matrix_read_api!(RelMatrix, Rel, Unit, "Rel ");
matrix_read_api!(AbsMatrix, Abs, AbsoluteUnit, "Abs ");
matrix_read_api!(MutableRelMatrix, Rel, Unit, "Mutable Rel ");
matrix_read_api!(MutableAbsMatrix, Abs, AbsoluteUnit, "Mutable Abs ");

matrix_write_api!(MutableRelMatrix, Rel, Unit);
matrix_write_api!(MutableAbsMatrix, Abs, AbsoluteUnit);

impl<U: Unit> RelMatrix<U> {
    /// Mutable handle sharing this matrix's buffer until its first write.
    #[must_use]
    pub fn mutable(&self) -> MutableRelMatrix<U> {
        MutableRelMatrix::from_data(Arc::clone(&self.data), self.unit)
    }

    /// Cellwise sum. A shared display unit is kept, otherwise the result is
    /// expressed in the family standard.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
    pub fn plus(&self, other: &RelMatrix<U>) -> Result<RelMatrix<U>, ValueError> {
        let data = self.data.plus(&other.data)?;
        Ok(RelMatrix::from_data(
            Arc::new(data),
            result_unit(self.unit, other.unit),
        ))
    }

    /// Cellwise difference, with the same unit tie-break as [`plus`].
    ///
    /// [`plus`]: RelMatrix::plus
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
    pub fn minus(&self, other: &RelMatrix<U>) -> Result<RelMatrix<U>, ValueError> {
        let data = self.data.minus(&other.data)?;
        Ok(RelMatrix::from_data(
            Arc::new(data),
            result_unit(self.unit, other.unit),
        ))
    }

    /// Cellwise sum with an absolute matrix of the paired family.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
    pub fn plus_abs<AU>(&self, other: &AbsMatrix<AU>) -> Result<AbsMatrix<AU>, ValueError>
    where
        AU: AbsoluteUnit<Relative = U>,
    {
        other.plus(self)
    }

    /// Cellwise product with a matrix of another family; the result is
    /// expressed in the standard unit of the product family.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
    pub fn times<V>(&self, other: &RelMatrix<V>) -> Result<RelMatrix<U::Output>, ValueError>
    where
        V: Unit,
        U: UnitTimes<V>,
    {
        let data = self.data.times(&other.data)?;
        Ok(RelMatrix::from_data(Arc::new(data), <U as UnitTimes<V>>::Output::STANDARD))
    }

    /// Cellwise quotient with a matrix of another family; the result is
    /// expressed in the standard unit of the quotient family.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
    pub fn divide<V>(&self, other: &RelMatrix<V>) -> Result<RelMatrix<U::Output>, ValueError>
    where
        V: Unit,
        U: UnitDivide<V>,
    {
        let data = self.data.divide(&other.data)?;
        Ok(RelMatrix::from_data(Arc::new(data), <U as UnitDivide<V>>::Output::STANDARD))
    }
}

impl<AU: AbsoluteUnit> AbsMatrix<AU> {
    /// Mutable handle sharing this matrix's buffer until its first write.
    #[must_use]
    pub fn mutable(&self) -> MutableAbsMatrix<AU> {
        MutableAbsMatrix::from_data(Arc::clone(&self.data), self.unit)
    }

    /// Cellwise sum with a relative matrix of the paired family. The
    /// display unit is kept when its paired relative unit matches the
    /// argument's, otherwise the result uses the family standard.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
    pub fn plus(&self, other: &RelMatrix<AU::Relative>) -> Result<AbsMatrix<AU>, ValueError> {
        let data = self.data.plus(&other.data)?;
        Ok(AbsMatrix::from_data(
            Arc::new(data),
            abs_result_unit(self.unit, other.unit),
        ))
    }

    /// Cellwise difference with a relative matrix of the paired family,
    /// with the same unit rule as [`plus`].
    ///
    /// [`plus`]: AbsMatrix::plus
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
    pub fn minus(&self, other: &RelMatrix<AU::Relative>) -> Result<AbsMatrix<AU>, ValueError> {
        let data = self.data.minus(&other.data)?;
        Ok(AbsMatrix::from_data(
            Arc::new(data),
            abs_result_unit(self.unit, other.unit),
        ))
    }

    /// Cellwise difference of two absolute matrices, yielding relative
    /// quantities. A shared display unit maps to its relative counterpart,
    /// otherwise the result uses the relative family standard.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ.
    pub fn minus_abs(&self, other: &AbsMatrix<AU>) -> Result<RelMatrix<AU::Relative>, ValueError> {
        let data = self.data.minus(&other.data)?;
        let unit = if self.unit == other.unit {
            self.unit.relative()
        } else {
            <AU::Relative as Unit>::STANDARD
        };
        Ok(RelMatrix::from_data(Arc::new(data), unit))
    }
}

impl<U: Unit> MutableRelMatrix<U> {
    /// Immutable handle sharing this matrix's buffer.
    #[must_use]
    pub fn immutable(&self) -> RelMatrix<U> {
        RelMatrix::from_data(Arc::clone(&self.data), self.unit)
    }

    /// Add `other` cellwise in place. The display unit stays the
    /// receiver's; the representation follows the promotion law.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ; the
    /// receiver is unchanged in that case.
    pub fn increment_by(&mut self, other: &RelMatrix<U>) -> Result<(), ValueError> {
        self.data = Arc::new(self.data.plus(&other.data)?);
        Ok(())
    }

    /// Subtract `other` cellwise in place. The display unit stays the
    /// receiver's; the representation follows the promotion law.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ; the
    /// receiver is unchanged in that case.
    pub fn decrement_by(&mut self, other: &RelMatrix<U>) -> Result<(), ValueError> {
        self.data = Arc::new(self.data.minus(&other.data)?);
        Ok(())
    }

    /// Divide every cell by the matrix's sum, making the sum 1.
    ///
    /// # Errors
    /// Returns [`ValueError::DegenerateOperation`] when the sum is exactly
    /// zero; the receiver is unchanged and no division is attempted.
    pub fn normalize(&mut self) -> Result<(), ValueError> {
        let sum = self.data.zsum();
        if sum == 0.0 {
            return Err(ValueError::DegenerateOperation(
                "zSum is 0; cannot normalize".to_string(),
            ));
        }
        self.write().divide_by(sum);
        Ok(())
    }
}

impl<AU: AbsoluteUnit> MutableAbsMatrix<AU> {
    /// Immutable handle sharing this matrix's buffer.
    #[must_use]
    pub fn immutable(&self) -> AbsMatrix<AU> {
        AbsMatrix::from_data(Arc::clone(&self.data), self.unit)
    }

    /// Add a relative matrix of the paired family cellwise in place. The
    /// display unit stays the receiver's.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ; the
    /// receiver is unchanged in that case.
    pub fn increment_by(&mut self, other: &RelMatrix<AU::Relative>) -> Result<(), ValueError> {
        self.data = Arc::new(self.data.plus(&other.data)?);
        Ok(())
    }

    /// Subtract a relative matrix of the paired family cellwise in place.
    /// The display unit stays the receiver's.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the shapes differ; the
    /// receiver is unchanged in that case.
    pub fn decrement_by(&mut self, other: &RelMatrix<AU::Relative>) -> Result<(), ValueError> {
        self.data = Arc::new(self.data.minus(&other.data)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::catalog::{LengthUnit, PositionUnit, PressureUnit};
    use approx::assert_relative_eq;

    fn meters(rows: &[Vec<f64>], storage: StorageType) -> RelMatrix<LengthUnit> {
        RelMatrix::new(rows, LengthUnit::METER, storage).unwrap()
    }

    #[test]
    fn test_new_and_cell_accessors() {
        let m = RelMatrix::new(
            &[vec![1.0, 2.0], vec![3.0, 4.0]],
            LengthUnit::KILOMETER,
            StorageType::Dense,
        )
        .unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 2);
        assert_eq!(m.get_si(1, 0).unwrap(), 3000.0);
        assert_eq!(m.get_in_unit(1, 0).unwrap(), 3.0);
        let s = m.get(0, 1).unwrap();
        assert_eq!(s.unit(), LengthUnit::KILOMETER);
        assert_eq!(s.in_unit(), 2.0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = RelMatrix::new(
            &[vec![1.0, 2.0], vec![3.0]],
            LengthUnit::METER,
            StorageType::Dense,
        )
        .unwrap_err();
        assert!(matches!(err, ValueError::Construction(_)));
    }

    #[test]
    fn test_cell_out_of_range_message() {
        let m = meters(&[vec![1.0, 2.0], vec![3.0, 4.0]], StorageType::Dense);
        let err = m.get(2, 0).unwrap_err();
        assert_eq!(err.to_string(), "index (2, 0) out of range for size 2x2");
    }

    #[test]
    fn test_determinant_in_standard_units() {
        let m = RelMatrix::new(
            &[vec![3.0, 8.0], vec![4.0, 6.0]],
            PressureUnit::PASCAL,
            StorageType::Dense,
        )
        .unwrap();
        assert_relative_eq!(m.determinant().unwrap(), -14.0, max_relative = 1e-12);
        let wide = RelMatrix::from_flat(
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            2,
            3,
            PressureUnit::PASCAL,
            StorageType::Dense,
        )
        .unwrap();
        assert!(matches!(
            wide.determinant(),
            Err(ValueError::DegenerateOperation(_))
        ));
    }

    #[test]
    fn test_mutable_shares_until_first_write() {
        let a = meters(&[vec![1.0, 2.0], vec![3.0, 4.0]], StorageType::Dense);
        let mut b = a.mutable();
        assert!(Arc::ptr_eq(&a.data, &b.data));
        b.set_si(0, 0, 9.0).unwrap();
        assert!(!Arc::ptr_eq(&a.data, &b.data));
        assert_eq!(a.get_si(0, 0).unwrap(), 1.0);
        assert_eq!(b.get_si(0, 0).unwrap(), 9.0);
    }

    #[test]
    fn test_increment_by_promotes_and_keeps_unit() {
        let mut m = RelMatrix::new(
            &[vec![0.0, 5.0], vec![0.0, 0.0]],
            LengthUnit::KILOMETER,
            StorageType::Sparse,
        )
        .unwrap()
        .mutable();
        let ones = meters(&[vec![1.0, 1.0], vec![1.0, 1.0]], StorageType::Dense);
        m.increment_by(&ones).unwrap();
        assert_eq!(m.storage_type(), StorageType::Dense);
        assert_eq!(m.unit(), LengthUnit::KILOMETER);
        assert_eq!(m.values_si(), vec![1.0, 5001.0, 1.0, 1.0]);
    }

    #[test]
    fn test_abs_minus_abs() {
        let a = AbsMatrix::new(
            &[vec![10.0, 20.0]],
            PositionUnit::METER,
            StorageType::Dense,
        )
        .unwrap();
        let b = AbsMatrix::new(&[vec![3.0, 4.0]], PositionUnit::METER, StorageType::Dense)
            .unwrap();
        let gap = a.minus_abs(&b).unwrap();
        assert_eq!(gap.unit(), LengthUnit::METER);
        assert_eq!(gap.values_si(), vec![7.0, 16.0]);
    }

    #[test]
    fn test_to_text_golden() {
        let m = meters(&[vec![1.5, 2.5], vec![3.5, 4.5]], StorageType::Dense);
        assert_eq!(
            m.to_text(LengthUnit::METER, true, true),
            "Rel Dense [     1.500      2.500;      3.500      4.500] m"
        );
    }

    #[test]
    fn test_normalize_zero_sum_untouched() {
        let mut m = meters(&[vec![1.0, -1.0]], StorageType::Dense).mutable();
        assert!(m.normalize().is_err());
        assert_eq!(m.values_si(), vec![1.0, -1.0]);
        let mut ok = meters(&[vec![1.0, 3.0]], StorageType::Dense).mutable();
        ok.normalize().unwrap();
        assert_eq!(ok.values_si(), vec![0.25, 0.75]);
    }

    #[test]
    fn test_equality_and_serde() {
        let d = meters(&[vec![0.0, 5.0]], StorageType::Dense);
        let s = meters(&[vec![0.0, 5.0]], StorageType::Sparse);
        assert_eq!(d, s);
        let json = serde_json::to_string(&s).unwrap();
        let back: RelMatrix<LengthUnit> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.storage_type(), StorageType::Sparse);
        assert_eq!(back, d);
    }

    #[test]
    fn test_from_scalars_and_iter() {
        let rows = vec![
            vec![Rel::new(1.0, LengthUnit::MILE), Rel::new(2.0, LengthUnit::MILE)],
        ];
        let m = RelMatrix::from_scalars(&rows, StorageType::Dense).unwrap();
        assert_eq!(m.unit(), LengthUnit::MILE);
        let in_miles: Vec<f64> = m.iter().map(|s| s.in_unit()).collect();
        assert_relative_eq!(in_miles[0], 1.0, max_relative = 1e-12);
        assert_relative_eq!(in_miles[1], 2.0, max_relative = 1e-12);
    }
}
