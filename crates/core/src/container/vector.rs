//! Typed vectors: engine data plus a display unit.
//!
//! [`RelVector`] and [`AbsVector`] are immutable. [`MutableRelVector`] and
//! [`MutableAbsVector`] add the in-place surface; they are obtained through
//! `mutable()` and share the backing buffer until the first write.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{abs_result_unit, result_unit};
use crate::error::ValueError;
use crate::format;
use crate::scalar::{Abs, Rel};
use crate::storage::{StorageType, VectorData};
use crate::units::{AbsoluteUnit, Unit, UnitDivide, UnitTimes};

/// Immutable vector of relative quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RelVector<U: Unit> {
    data: Arc<VectorData>,
    unit: U,
}

/// Immutable vector of absolute quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct AbsVector<AU: AbsoluteUnit> {
    data: Arc<VectorData>,
    unit: AU,
}

/// Mutable vector of relative quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MutableRelVector<U: Unit> {
    data: Arc<VectorData>,
    unit: U,
}

/// Mutable vector of absolute quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MutableAbsVector<AU: AbsoluteUnit> {
    data: Arc<VectorData>,
    unit: AU,
}

/// Stamps the shared read surface of one vector container type.
macro_rules! vector_read_api {
    ($container:ident, $scalar:ident, $bound:ident, $prefix:literal) => {
        impl<U: $bound> $container<U> {
            /// Vector from magnitudes expressed in `unit`.
            ///
            /// # Errors
            /// Returns [`ValueError::Construction`] when `values` is empty.
            pub fn new(values: &[f64], unit: U, storage: StorageType) -> Result<Self, ValueError> {
                let si: Vec<f64> = values.iter().map(|v| unit.to_standard(*v)).collect();
                Ok(Self {
                    data: Arc::new(VectorData::instantiate(&si, storage)?),
                    unit,
                })
            }

            /// Vector from typed scalars; the display unit is the first
            /// scalar's unit.
            ///
            /// # Errors
            /// Returns [`ValueError::Construction`] when `scalars` is empty.
            pub fn from_scalars(
                scalars: &[$scalar<U>],
                storage: StorageType,
            ) -> Result<Self, ValueError> {
                let Some(first) = scalars.first() else {
                    return Err(ValueError::Construction(
                        "cannot create a vector from an empty array".to_string(),
                    ));
                };
                let si: Vec<f64> = scalars.iter().map(|s| s.si()).collect();
                Ok(Self {
                    data: Arc::new(VectorData::instantiate(&si, storage)?),
                    unit: first.unit(),
                })
            }

            /// Zero-copy wrapper around engine data already in standard
            /// units.
            pub(crate) fn from_data(data: Arc<VectorData>, unit: U) -> Self {
                Self { data, unit }
            }

            fn check_index(&self, index: usize) -> Result<(), ValueError> {
                if index >= self.data.size() {
                    return Err(ValueError::index(index, self.data.size()));
                }
                Ok(())
            }

            /// Cell count.
            #[must_use]
            pub fn size(&self) -> usize {
                self.data.size()
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

            /// Typed scalar at `index`, in the display unit.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when `index` is out
            /// of bounds.
            pub fn get(&self, index: usize) -> Result<$scalar<U>, ValueError> {
                self.check_index(index)?;
                Ok($scalar::from_si_in(self.data.get_si(index), self.unit))
            }

            /// Standard-unit magnitude at `index`.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when `index` is out
            /// of bounds.
            pub fn get_si(&self, index: usize) -> Result<f64, ValueError> {
                self.check_index(index)?;
                Ok(self.data.get_si(index))
            }

            /// Magnitude at `index` in the display unit.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when `index` is out
            /// of bounds.
            pub fn get_in_unit(&self, index: usize) -> Result<f64, ValueError> {
                Ok(self.unit.from_standard(self.get_si(index)?))
            }

            /// Magnitude at `index` in `target`.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when `index` is out
            /// of bounds.
            pub fn get_in_unit_of(&self, index: usize, target: U) -> Result<f64, ValueError> {
                Ok(target.from_standard(self.get_si(index)?))
            }

            /// Every magnitude in standard units.
            #[must_use]
            pub fn values_si(&self) -> Vec<f64> {
                self.data.dense_values()
            }

            /// Every magnitude in the display unit.
            #[must_use]
            pub fn values_in_unit(&self) -> Vec<f64> {
                self.values_in_unit_of(self.unit)
            }

            /// Every magnitude in `target`.
            #[must_use]
            pub fn values_in_unit_of(&self, target: U) -> Vec<f64> {
                self.data
                    .dense_values()
                    .into_iter()
                    .map(|si| target.from_standard(si))
                    .collect()
            }

            /// Typed scalars in cell order.
            pub fn iter(&self) -> impl Iterator<Item = $scalar<U>> + '_ {
                let unit = self.unit;
                (0..self.data.size()).map(move |i| $scalar::from_si_in(self.data.get_si(i), unit))
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

            /// Dense rendition; keeps the backing buffer when already
            /// dense.
            #[must_use]
            pub fn to_dense(self) -> Self {
                if self.data.storage_type() == StorageType::Dense {
                    return self;
                }
                Self {
                    data: Arc::new(VectorData::Dense {
                        values: self.data.dense_values(),
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
                    data: Arc::new(VectorData::compress(self.data.dense_values())),
                    unit: self.unit,
                }
            }

            /// Fixed-width dump of every cell in `unit`. `verbose` prepends
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
                for (i, value) in self.values_in_unit_of(unit).into_iter().enumerate() {
                    if i > 0 {
                        buf.push(' ');
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

/// Stamps the cell-level write surface of one mutable vector type. Every
/// write passes the copy-on-write guard.
macro_rules! vector_write_api {
    ($container:ident, $scalar:ident, $bound:ident) => {
        impl<U: $bound> $container<U> {
            /// Copy-on-write guard: materializes a private copy when the
            /// buffer is shared, then hands out the exclusive reference.
            fn write(&mut self) -> &mut VectorData {
                if Arc::strong_count(&self.data) > 1 {
                    tracing::debug!(
                        size = self.data.size(),
                        "materializing private copy of shared vector data"
                    );
                }
                Arc::make_mut(&mut self.data)
            }

            /// Overwrite the cell at `index` with a typed scalar.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when `index` is out
            /// of bounds.
            pub fn set(&mut self, index: usize, value: $scalar<U>) -> Result<(), ValueError> {
                self.set_si(index, value.si())
            }

            /// Overwrite the standard-unit magnitude at `index`.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when `index` is out
            /// of bounds.
            pub fn set_si(&mut self, index: usize, si: f64) -> Result<(), ValueError> {
                self.check_index(index)?;
                self.write().set_si(index, si);
                Ok(())
            }

            /// Overwrite the cell at `index` with a magnitude expressed in
            /// the display unit.
            ///
            /// # Errors
            /// Returns [`ValueError::IndexOutOfRange`] when `index` is out
            /// of bounds.
            pub fn set_in_unit(&mut self, index: usize, value: f64) -> Result<(), ValueError> {
                self.set_si(index, self.unit.to_standard(value))
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

vector_read_api!(RelVector, Rel, Unit, "Rel ");
vector_read_api!(AbsVector, Abs, AbsoluteUnit, "Abs ");
vector_read_api!(MutableRelVector, Rel, Unit, "Mutable Rel ");
vector_read_api!(MutableAbsVector, Abs, AbsoluteUnit, "Mutable Abs ");

vector_write_api!(MutableRelVector, Rel, Unit);
vector_write_api!(MutableAbsVector, Abs, AbsoluteUnit);

impl<U: Unit> RelVector<U> {
    /// Mutable handle sharing this vector's buffer until its first write.
    #[must_use]
    pub fn mutable(&self) -> MutableRelVector<U> {
        MutableRelVector::from_data(Arc::clone(&self.data), self.unit)
    }

    /// Elementwise sum. A shared display unit is kept, otherwise the result
    /// is expressed in the family standard.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ.
    pub fn plus(&self, other: &RelVector<U>) -> Result<RelVector<U>, ValueError> {
        let data = self.data.plus(&other.data)?;
        Ok(RelVector::from_data(
            Arc::new(data),
            result_unit(self.unit, other.unit),
        ))
    }

    /// Elementwise difference, with the same unit tie-break as [`plus`].
    ///
    /// [`plus`]: RelVector::plus
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ.
    pub fn minus(&self, other: &RelVector<U>) -> Result<RelVector<U>, ValueError> {
        let data = self.data.minus(&other.data)?;
        Ok(RelVector::from_data(
            Arc::new(data),
            result_unit(self.unit, other.unit),
        ))
    }

    /// Elementwise sum with an absolute vector of the paired family.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ.
    pub fn plus_abs<AU>(&self, other: &AbsVector<AU>) -> Result<AbsVector<AU>, ValueError>
    where
        AU: AbsoluteUnit<Relative = U>,
    {
        other.plus(self)
    }

    /// Elementwise product with a vector of another family; the result is
    /// expressed in the standard unit of the product family.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ.
    pub fn times<V>(&self, other: &RelVector<V>) -> Result<RelVector<U::Output>, ValueError>
    where
        V: Unit,
        U: UnitTimes<V>,
    {
        let data = self.data.times(&other.data)?;
        Ok(RelVector::from_data(Arc::new(data), <U as UnitTimes<V>>::Output::STANDARD))
    }

    /// Elementwise quotient with a vector of another family; the result is
    /// expressed in the standard unit of the quotient family.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ.
    pub fn divide<V>(&self, other: &RelVector<V>) -> Result<RelVector<U::Output>, ValueError>
    where
        V: Unit,
        U: UnitDivide<V>,
    {
        let data = self.data.divide(&other.data)?;
        Ok(RelVector::from_data(Arc::new(data), <U as UnitDivide<V>>::Output::STANDARD))
    }
}

impl<AU: AbsoluteUnit> AbsVector<AU> {
    /// Mutable handle sharing this vector's buffer until its first write.
    #[must_use]
    pub fn mutable(&self) -> MutableAbsVector<AU> {
        MutableAbsVector::from_data(Arc::clone(&self.data), self.unit)
    }

    /// Elementwise sum with a relative vector of the paired family. The
    /// display unit is kept when its paired relative unit matches the
    /// argument's, otherwise the result uses the family standard.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ.
    pub fn plus(&self, other: &RelVector<AU::Relative>) -> Result<AbsVector<AU>, ValueError> {
        let data = self.data.plus(&other.data)?;
        Ok(AbsVector::from_data(
            Arc::new(data),
            abs_result_unit(self.unit, other.unit),
        ))
    }

    /// Elementwise difference with a relative vector of the paired family,
    /// with the same unit rule as [`plus`].
    ///
    /// [`plus`]: AbsVector::plus
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ.
    pub fn minus(&self, other: &RelVector<AU::Relative>) -> Result<AbsVector<AU>, ValueError> {
        let data = self.data.minus(&other.data)?;
        Ok(AbsVector::from_data(
            Arc::new(data),
            abs_result_unit(self.unit, other.unit),
        ))
    }

    /// Elementwise difference of two absolute vectors, yielding relative
    /// quantities. A shared display unit maps to its relative counterpart,
    /// otherwise the result uses the relative family standard.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ.
    pub fn minus_abs(&self, other: &AbsVector<AU>) -> Result<RelVector<AU::Relative>, ValueError> {
        let data = self.data.minus(&other.data)?;
        let unit = if self.unit == other.unit {
            self.unit.relative()
        } else {
            <AU::Relative as Unit>::STANDARD
        };
        Ok(RelVector::from_data(Arc::new(data), unit))
    }
}

impl<U: Unit> MutableRelVector<U> {
    /// Immutable handle sharing this vector's buffer.
    #[must_use]
    pub fn immutable(&self) -> RelVector<U> {
        RelVector::from_data(Arc::clone(&self.data), self.unit)
    }

    /// Add `other` cellwise in place. The display unit stays the
    /// receiver's; the representation follows the promotion law.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ; the
    /// receiver is unchanged in that case.
    pub fn increment_by(&mut self, other: &RelVector<U>) -> Result<(), ValueError> {
        self.data = Arc::new(self.data.plus(&other.data)?);
        Ok(())
    }

    /// Subtract `other` cellwise in place. The display unit stays the
    /// receiver's; the representation follows the promotion law.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ; the
    /// receiver is unchanged in that case.
    pub fn decrement_by(&mut self, other: &RelVector<U>) -> Result<(), ValueError> {
        self.data = Arc::new(self.data.minus(&other.data)?);
        Ok(())
    }

    /// Divide every cell by the vector's sum, making the sum 1.
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

impl<AU: AbsoluteUnit> MutableAbsVector<AU> {
    /// Immutable handle sharing this vector's buffer.
    #[must_use]
    pub fn immutable(&self) -> AbsVector<AU> {
        AbsVector::from_data(Arc::clone(&self.data), self.unit)
    }

    /// Add a relative vector of the paired family cellwise in place. The
    /// display unit stays the receiver's.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ; the
    /// receiver is unchanged in that case.
    pub fn increment_by(&mut self, other: &RelVector<AU::Relative>) -> Result<(), ValueError> {
        self.data = Arc::new(self.data.plus(&other.data)?);
        Ok(())
    }

    /// Subtract a relative vector of the paired family cellwise in place.
    /// The display unit stays the receiver's.
    ///
    /// # Errors
    /// Returns [`ValueError::ShapeMismatch`] when the sizes differ; the
    /// receiver is unchanged in that case.
    pub fn decrement_by(&mut self, other: &RelVector<AU::Relative>) -> Result<(), ValueError> {
        self.data = Arc::new(self.data.minus(&other.data)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::catalog::{
        DurationUnit, LengthUnit, PositionUnit, SpeedUnit,
    };
    use approx::assert_relative_eq;

    fn meters(values: &[f64], storage: StorageType) -> RelVector<LengthUnit> {
        RelVector::new(values, LengthUnit::METER, storage).unwrap()
    }

    #[test]
    fn test_new_converts_display_values_to_standard() {
        let v = RelVector::new(&[1.0, 2.0], LengthUnit::KILOMETER, StorageType::Dense).unwrap();
        assert_eq!(v.values_si(), vec![1000.0, 2000.0]);
        assert_eq!(v.values_in_unit(), vec![1.0, 2.0]);
        assert_eq!(v.unit(), LengthUnit::KILOMETER);
    }

    #[test]
    fn test_get_returns_scalar_in_display_unit() {
        let v = RelVector::new(&[3.0], LengthUnit::KILOMETER, StorageType::Dense).unwrap();
        let s = v.get(0).unwrap();
        assert_eq!(s.unit(), LengthUnit::KILOMETER);
        assert_eq!(s.in_unit(), 3.0);
        assert_eq!(s.si(), 3000.0);
        assert_relative_eq!(
            v.get_in_unit_of(0, LengthUnit::METER).unwrap(),
            3000.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_get_out_of_range() {
        let v = meters(&[1.0, 2.0], StorageType::Dense);
        let err = v.get(2).unwrap_err();
        assert_eq!(err.to_string(), "index 2 out of range for size 2");
    }

    #[test]
    fn test_from_scalars_uses_first_unit() {
        let scalars = [
            Rel::new(1.0, LengthUnit::MILE),
            Rel::new(2.0, LengthUnit::MILE),
        ];
        let v = RelVector::from_scalars(&scalars, StorageType::Dense).unwrap();
        assert_eq!(v.unit(), LengthUnit::MILE);
        assert_eq!(v.values_in_unit(), vec![1.0, 2.0]);
        assert!(matches!(
            RelVector::<LengthUnit>::from_scalars(&[], StorageType::Dense),
            Err(ValueError::Construction(_))
        ));
    }

    #[test]
    fn test_plus_keeps_shared_unit() {
        let a = RelVector::new(&[1.0], LengthUnit::MILE, StorageType::Dense).unwrap();
        let b = RelVector::new(&[2.0], LengthUnit::MILE, StorageType::Dense).unwrap();
        let sum = a.plus(&b).unwrap();
        assert_eq!(sum.unit(), LengthUnit::MILE);
        assert_relative_eq!(sum.get_in_unit(0).unwrap(), 3.0, max_relative = 1e-12);
    }

    #[test]
    fn test_plus_falls_back_to_standard_unit() {
        let a = RelVector::new(&[1.0], LengthUnit::MILE, StorageType::Dense).unwrap();
        let b = RelVector::new(&[1.0], LengthUnit::FOOT, StorageType::Dense).unwrap();
        let sum = a.plus(&b).unwrap();
        assert_eq!(sum.unit(), LengthUnit::METER);
        assert_relative_eq!(sum.get_si(0).unwrap(), 1609.344 + 0.3048, max_relative = 1e-12);
    }

    #[test]
    fn test_times_and_divide_derive_family() {
        let lengths = meters(&[10.0, 20.0], StorageType::Dense);
        let durations =
            RelVector::new(&[2.0, 4.0], DurationUnit::SECOND, StorageType::Dense).unwrap();
        let speeds = lengths.divide(&durations).unwrap();
        assert_eq!(speeds.unit(), SpeedUnit::METER_PER_SECOND);
        assert_eq!(speeds.values_si(), vec![5.0, 5.0]);
        let back = speeds.times(&durations).unwrap();
        assert_eq!(back.unit(), LengthUnit::METER);
        assert_eq!(back.values_si(), vec![10.0, 20.0]);
    }

    #[test]
    fn test_abs_minus_abs_gives_relative_counterpart() {
        let here = AbsVector::new(&[10.0], PositionUnit::METER, StorageType::Dense).unwrap();
        let there = AbsVector::new(&[3.0], PositionUnit::METER, StorageType::Dense).unwrap();
        let gap = here.minus_abs(&there).unwrap();
        assert_eq!(gap.unit(), LengthUnit::METER);
        assert_eq!(gap.values_si(), vec![7.0]);
    }

    #[test]
    fn test_abs_plus_rel_unit_rule() {
        let pos = AbsVector::new(&[1.0], PositionUnit::KILOMETER, StorageType::Dense).unwrap();
        let paired =
            RelVector::new(&[500.0], LengthUnit::KILOMETER, StorageType::Dense).unwrap();
        assert_eq!(pos.plus(&paired).unwrap().unit(), PositionUnit::KILOMETER);
        let other = meters(&[500.0], StorageType::Dense);
        assert_eq!(pos.plus(&other).unwrap().unit(), PositionUnit::METER);
        assert_eq!(paired.plus_abs(&pos).unwrap().unit(), PositionUnit::KILOMETER);
    }

    #[test]
    fn test_mutable_shares_until_first_write() {
        let a = meters(&[1.0, 2.0, 3.0], StorageType::Dense);
        let mut b = a.mutable();
        assert!(Arc::ptr_eq(&a.data, &b.data), "mutable() must not copy");
        b.set_si(0, 9.0).unwrap();
        assert!(!Arc::ptr_eq(&a.data, &b.data), "first write must copy");
        assert_eq!(a.values_si(), vec![1.0, 2.0, 3.0]);
        assert_eq!(b.values_si(), vec![9.0, 2.0, 3.0]);

        let private = Arc::as_ptr(&b.data);
        b.set_si(1, 8.0).unwrap();
        assert_eq!(Arc::as_ptr(&b.data), private, "later writes must not re-copy");
    }

    #[test]
    fn test_unshared_mutable_writes_in_place() {
        let mut m = meters(&[1.0, 2.0], StorageType::Dense).mutable();
        let before = Arc::as_ptr(&m.data);
        m.set_si(0, 5.0).unwrap();
        assert_eq!(Arc::as_ptr(&m.data), before);
    }

    #[test]
    fn test_increment_by_leaves_sharers_untouched() {
        let a = meters(&[1.0, 1.0], StorageType::Dense);
        let mut b = a.mutable();
        b.increment_by(&meters(&[1.0, 2.0], StorageType::Dense)).unwrap();
        assert_eq!(a.values_si(), vec![1.0, 1.0]);
        assert_eq!(b.values_si(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_increment_by_follows_promotion_law() {
        let mut v = meters(&[0.0, 0.0, 5.0, 0.0, 3.0], StorageType::Sparse).mutable();
        assert_eq!(v.storage_type(), StorageType::Sparse);
        v.increment_by(&meters(&[1.0, 1.0, 1.0, 1.0, 1.0], StorageType::Dense))
            .unwrap();
        assert_eq!(v.storage_type(), StorageType::Dense);
        assert_eq!(v.values_si(), vec![1.0, 1.0, 6.0, 1.0, 4.0]);
    }

    #[test]
    fn test_increment_keeps_receiver_unit() {
        let mut v =
            RelVector::new(&[1.0], LengthUnit::KILOMETER, StorageType::Dense).unwrap().mutable();
        v.increment_by(&meters(&[500.0], StorageType::Dense)).unwrap();
        assert_eq!(v.unit(), LengthUnit::KILOMETER);
        assert_relative_eq!(v.get_in_unit(0).unwrap(), 1.5, max_relative = 1e-12);
    }

    #[test]
    fn test_shape_mismatch_leaves_receiver_unchanged() {
        let mut v = meters(&[1.0, 2.0], StorageType::Dense).mutable();
        let err = v.increment_by(&meters(&[1.0], StorageType::Dense)).unwrap_err();
        assert!(matches!(err, ValueError::ShapeMismatch { .. }));
        assert_eq!(v.values_si(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_normalize() {
        let mut v = meters(&[1.0, 3.0], StorageType::Dense).mutable();
        v.normalize().unwrap();
        assert_eq!(v.values_si(), vec![0.25, 0.75]);
    }

    #[test]
    fn test_normalize_zero_sum_is_degenerate_and_untouched() {
        let mut v = meters(&[2.0, -2.0], StorageType::Dense).mutable();
        let err = v.normalize().unwrap_err();
        assert_eq!(
            err.to_string(),
            "degenerate operation: zSum is 0; cannot normalize"
        );
        assert_eq!(v.values_si(), vec![2.0, -2.0]);
    }

    #[test]
    fn test_set_in_unit_and_assign() {
        let mut v =
            RelVector::new(&[1.0, 2.0], LengthUnit::KILOMETER, StorageType::Sparse).unwrap().mutable();
        v.set_in_unit(0, 5.0).unwrap();
        assert_eq!(v.get_si(0).unwrap(), 5000.0);
        v.assign(|si| si / 1000.0);
        assert_eq!(v.storage_type(), StorageType::Dense);
        assert_eq!(v.values_si(), vec![5.0, 2.0]);
    }

    #[test]
    fn test_to_dense_keeps_buffer_when_already_dense() {
        let v = meters(&[1.0, 2.0], StorageType::Dense);
        let shared = Arc::as_ptr(&v.data);
        let same = v.to_dense();
        assert_eq!(Arc::as_ptr(&same.data), shared);
        let sparse = same.to_sparse();
        assert_eq!(sparse.storage_type(), StorageType::Sparse);
    }

    #[test]
    fn test_zsum_and_iter() {
        let v = RelVector::new(&[1.0, 2.0], LengthUnit::KILOMETER, StorageType::Dense).unwrap();
        let total = v.zsum();
        assert_eq!(total.unit(), LengthUnit::KILOMETER);
        assert_relative_eq!(total.in_unit(), 3.0, max_relative = 1e-12);
        let collected: Vec<f64> = v.iter().map(|s| s.in_unit()).collect();
        assert_eq!(collected, vec![1.0, 2.0]);
    }

    #[test]
    fn test_to_text_golden() {
        let v = meters(&[1.5, 2.5], StorageType::Dense);
        assert_eq!(
            v.to_text(LengthUnit::METER, true, true),
            "Rel Dense [     1.500      2.500] m"
        );
        assert_eq!(v.to_string(), "[     1.500      2.500] m");
        let m = v.mutable();
        assert_eq!(
            m.to_text(LengthUnit::METER, true, false),
            "Mutable Rel Dense [     1.500      2.500]"
        );
    }

    #[test]
    fn test_equality_ignores_unit_and_representation() {
        let a = meters(&[0.0, 5.0], StorageType::Dense);
        let b = RelVector::new(&[0.0, 0.005], LengthUnit::KILOMETER, StorageType::Sparse).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_round_trip() {
        let v = RelVector::new(&[0.0, 5.0], LengthUnit::KILOMETER, StorageType::Sparse).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        let back: RelVector<LengthUnit> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.unit(), LengthUnit::KILOMETER);
        assert_eq!(back.storage_type(), StorageType::Sparse);
        assert_eq!(back, v);
    }
}
