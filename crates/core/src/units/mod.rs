//! Unit model: linear scales, SI signatures, unit families, and the
//! shipped catalog.
//!
//! A unit family (length, duration, speed, …) is a small `Copy` type
//! implementing [`Unit`]; its built-in units are `const` items on the type.
//! All units of a family convert through the family's standard unit, which
//! carries the identity scale. Absolute families ([`AbsoluteUnit`]) pair
//! each of their units with a relative counterpart and may carry an origin
//! offset (degree Celsius vs kelvin).
//!
//! Families are stamped from declarative tables by [`unit_family!`], and
//! the legal cross-family products/quotients by [`quantity_ops!`]; see
//! [`catalog`] for everything that ships with the crate.
//!
//! [`unit_family!`]: crate::unit_family
//! [`quantity_ops!`]: crate::quantity_ops

pub mod catalog;
pub mod declare;
pub mod scale;
pub mod si;

pub use catalog::*;
pub use scale::LinearScale;
pub use si::SiDimensions;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ValueError;

/// Classification tag carried by every unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UnitSystem {
    /// SI base unit (meter, kilogram, second, …).
    SiBase,
    /// SI derived unit (newton, pascal, watt, …).
    SiDerived,
    /// Non-SI unit accepted for use with the SI (hour, liter, degree, …).
    SiAccepted,
    /// British imperial unit.
    Imperial,
    /// United States customary unit.
    UsCustomary,
    /// Anything else (furlongs, fortnights, …).
    Other,
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UnitSystem::SiBase => "SI base",
            UnitSystem::SiDerived => "SI derived",
            UnitSystem::SiAccepted => "SI accepted",
            UnitSystem::Imperial => "imperial",
            UnitSystem::UsCustomary => "US customary",
            UnitSystem::Other => "other",
        };
        f.write_str(label)
    }
}

/// Identity and scale payload shared by every unit value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDef {
    abbreviation: &'static str,
    name: &'static str,
    system: UnitSystem,
    scale: LinearScale,
}

impl UnitDef {
    /// Unit converting by a pure factor.
    #[must_use]
    pub const fn new(
        abbreviation: &'static str,
        name: &'static str,
        system: UnitSystem,
        factor: f64,
    ) -> Self {
        UnitDef {
            abbreviation,
            name,
            system,
            scale: LinearScale::new(factor),
        }
    }

    /// Unit converting by factor plus origin offset (absolute units only).
    #[must_use]
    pub const fn with_offset(
        abbreviation: &'static str,
        name: &'static str,
        system: UnitSystem,
        factor: f64,
        offset: f64,
    ) -> Self {
        UnitDef {
            abbreviation,
            name,
            system,
            scale: LinearScale::with_offset(factor, offset),
        }
    }

    /// Short display form, e.g. "km/h".
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        self.abbreviation
    }

    /// Full name, e.g. "kilometer per hour".
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Unit-system classification.
    #[must_use]
    pub const fn system(self) -> UnitSystem {
        self.system
    }

    /// Conversion to the family's standard unit.
    #[must_use]
    pub const fn scale(self) -> LinearScale {
        self.scale
    }
}

/// A family of interchangeable units over one physical dimension.
///
/// Implementations are stamped by [`unit_family!`](crate::unit_family);
/// every family designates one standard unit with the identity scale, and
/// `value_in_unit * factor + offset` converts any member to it.
pub trait Unit:
    Copy + PartialEq + fmt::Debug + fmt::Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Dimensional signature shared by every unit of the family.
    const SI: SiDimensions;

    /// The family's standard unit (`scale factor 1, offset 0`).
    const STANDARD: Self;

    /// Built-in units of the family, used for abbreviation lookup.
    const BUILT_IN: &'static [Self];

    /// Conversion of this unit to the standard unit.
    fn scale(self) -> LinearScale;

    /// Short display form, e.g. "fur".
    fn abbreviation(self) -> &'static str;

    /// Full name, e.g. "furlong".
    fn name(self) -> &'static str;

    /// Unit-system classification.
    fn system(self) -> UnitSystem;

    /// Resolve a built-in unit from its abbreviation.
    fn by_abbreviation(abbreviation: &str) -> Option<Self>;

    /// Convert a value in this unit to the standard unit.
    #[inline]
    fn to_standard(self, value: f64) -> f64 {
        self.scale().to_standard(value)
    }

    /// Convert a value in the standard unit to this unit.
    #[inline]
    fn from_standard(self, standard_value: f64) -> f64 {
        self.scale().from_standard(standard_value)
    }

    /// True for the family's standard unit.
    #[inline]
    fn is_standard(self) -> bool {
        self.scale().is_standard()
    }
}

/// A unit family whose quantities have a meaningful fixed origin.
///
/// Every absolute unit resolves to exactly one relative unit with the same
/// SI signature: position to length, time to duration, absolute temperature
/// to temperature difference. The offset (if any) lives on the absolute
/// side; the relative counterpart always has offset zero.
pub trait AbsoluteUnit: Unit {
    /// The relative family this absolute family is built on.
    type Relative: Unit;

    /// The relative counterpart of this specific unit.
    fn relative(self) -> Self::Relative;
}

/// Declares that quantities of `Self` multiplied by quantities of `Rhs`
/// yield quantities of the `Output` family.
///
/// Implementations come from the [`quantity_ops!`](crate::quantity_ops)
/// table; the result is always expressed in `Output`'s standard unit.
pub trait UnitTimes<Rhs: Unit>: Unit {
    /// Family of the product.
    type Output: Unit;
}

/// Declares that quantities of `Self` divided by quantities of `Rhs`
/// yield quantities of the `Output` family.
pub trait UnitDivide<Rhs: Unit>: Unit {
    /// Family of the quotient.
    type Output: Unit;
}

/// One constituent of a compound unit: an existing unit raised to a power.
///
/// Build constituents with [`constituent`] and combine them with
/// [`compose`]; offsets of constituent units are ignored (composition is
/// purely multiplicative).
#[derive(Debug, Clone, Copy)]
pub struct Constituent {
    factor: f64,
    dimensions: SiDimensions,
    exponent: i8,
}

/// Capture a unit and exponent for compound-unit composition.
#[must_use]
pub fn constituent<U: Unit>(unit: U, exponent: i8) -> Constituent {
    Constituent {
        factor: unit.scale().factor(),
        dimensions: U::SI,
        exponent,
    }
}

impl Constituent {
    fn combined_factor(self) -> f64 {
        self.factor.powi(i32::from(self.exponent))
    }

    fn combined_dimensions(self) -> SiDimensions {
        self.dimensions.powi(self.exponent)
    }
}

/// Derive the scale of a compound unit from its constituents.
///
/// The scale factor is the product of each constituent's factor raised to
/// its exponent. The combined SI signature must equal `target` — building
/// "furlongs per fortnight" as a speed unit from unrelated constituents is
/// a [`ValueError::DimensionalIncompatibility`].
///
/// # Errors
/// Returns [`ValueError::DimensionalIncompatibility`] when the combined
/// signature of `parts` differs from `target`.
pub fn compose(target: SiDimensions, parts: &[Constituent]) -> Result<LinearScale, ValueError> {
    let mut dimensions = SiDimensions::NONE;
    let mut factor = 1.0;
    for part in parts {
        dimensions = dimensions.multiply(part.combined_dimensions());
        factor *= part.combined_factor();
    }
    if dimensions != target {
        return Err(ValueError::dimensions(target, dimensions));
    }
    Ok(LinearScale::new(factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_speed_from_length_and_duration() {
        let target = SiDimensions {
            m: 1,
            s: -1,
            ..SiDimensions::NONE
        };
        let scale = compose(
            target,
            &[
                constituent(catalog::LengthUnit::FURLONG, 1),
                constituent(catalog::DurationUnit::FORTNIGHT, -1),
            ],
        )
        .unwrap();
        approx::assert_relative_eq!(scale.factor(), 201.168 / 1_209_600.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compose_rejects_wrong_dimensions() {
        let target = SiDimensions {
            m: 1,
            s: -1,
            ..SiDimensions::NONE
        };
        let err = compose(target, &[constituent(catalog::MassUnit::KILOGRAM, 1)]).unwrap_err();
        assert!(matches!(err, ValueError::DimensionalIncompatibility { .. }));
    }

    #[test]
    fn test_unit_system_labels() {
        assert_eq!(UnitSystem::SiBase.to_string(), "SI base");
        assert_eq!(UnitSystem::Other.to_string(), "other");
    }
}
