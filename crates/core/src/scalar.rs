//! Typed scalar quantities.
//!
//! Two generic value types cover every quantity: [`Rel`] for relative
//! quantities (length, duration, temperature difference) and [`Abs`] for
//! absolute ones (position, time, absolute temperature). Both are immutable
//! triples of (value in display unit, display unit, cached SI magnitude).
//!
//! Combination rules:
//!
//! - `rel + rel -> rel`, `rel - rel -> rel`
//! - `abs + rel -> abs`, `abs - rel -> abs`, `rel + abs -> abs`
//! - `abs - abs -> rel`; `abs + abs` is not implemented and will not compile
//!
//! Result unit tie-break: when both operands carry the exact same unit the
//! arithmetic happens on the in-unit magnitudes and the result keeps that
//! unit; otherwise it happens on the SI magnitudes and the result carries the
//! standard unit. Cross-family products and quotients are declared by the
//! [`quantity_ops!`](crate::quantity_ops) table and always produce the result
//! family's standard unit.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::format;
use crate::units::catalog::{
    AbsoluteTemperatureUnit, AccelerationUnit, AngleUnit, AreaUnit, DensityUnit,
    DimensionlessUnit, DurationUnit, ElectricCurrentUnit, ElectricPotentialUnit, EnergyUnit,
    ForceUnit, FrequencyUnit, LengthUnit, MassUnit, PositionUnit, PowerUnit, PressureUnit,
    SpeedUnit, TemperatureUnit, TimeUnit, VolumeUnit,
};
use crate::units::{AbsoluteUnit, Unit, UnitDivide, UnitTimes};

// ============================================================================
// RELATIVE SCALAR
// ============================================================================

/// A relative quantity: magnitude plus display unit, no fixed origin.
///
/// Relative quantities are closed under addition and subtraction and carry
/// the cross-family multiplication/division rules.
#[derive(Debug, Clone, Copy)]
pub struct Rel<U: Unit> {
    value: f64,
    unit: U,
    si: f64,
}

impl<U: Unit> Rel<U> {
    /// Quantity of `value` expressed in `unit`.
    #[must_use]
    pub fn new(value: f64, unit: U) -> Self {
        Rel {
            value,
            unit,
            si: unit.to_standard(value),
        }
    }

    /// Quantity of `si` expressed in the family's standard unit.
    #[must_use]
    pub fn new_si(si: f64) -> Self {
        Rel {
            value: si,
            unit: U::STANDARD,
            si,
        }
    }

    /// Exact-SI constructor used by containers: keeps `si` untouched and
    /// derives the display value from it.
    pub(crate) fn from_si_in(si: f64, unit: U) -> Self {
        Rel {
            value: unit.from_standard(si),
            unit,
            si,
        }
    }

    /// Magnitude in the standard unit.
    #[must_use]
    pub fn si(self) -> f64 {
        self.si
    }

    /// Magnitude in the display unit.
    #[must_use]
    pub fn in_unit(self) -> f64 {
        self.value
    }

    /// Magnitude expressed in `target` (same family, so always legal).
    #[must_use]
    pub fn in_unit_of(self, target: U) -> f64 {
        target.from_standard(self.si)
    }

    /// The display unit.
    #[must_use]
    pub fn unit(self) -> U {
        self.unit
    }

    /// The larger of the two by SI magnitude.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self.si >= other.si {
            self
        } else {
            other
        }
    }

    /// The smaller of the two by SI magnitude.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.si <= other.si {
            self
        } else {
            other
        }
    }

    /// Linear interpolation between `zero` (ratio 0) and `one` (ratio 1),
    /// expressed in `zero`'s display unit.
    #[must_use]
    pub fn interpolate(zero: Self, one: Self, ratio: f64) -> Self {
        Rel::new(
            zero.value * (1.0 - ratio) + one.in_unit_of(zero.unit) * ratio,
            zero.unit,
        )
    }

    /// Absolute value of the display-unit magnitude.
    #[must_use]
    pub fn abs(self) -> Self {
        Rel::new(self.value.abs(), self.unit)
    }

    /// Display-unit magnitude rounded up.
    #[must_use]
    pub fn ceil(self) -> Self {
        Rel::new(self.value.ceil(), self.unit)
    }

    /// Display-unit magnitude rounded down.
    #[must_use]
    pub fn floor(self) -> Self {
        Rel::new(self.value.floor(), self.unit)
    }

    /// Display-unit magnitude rounded to the nearest integer, ties to even.
    #[must_use]
    pub fn rint(self) -> Self {
        Rel::new(self.value.round_ties_even(), self.unit)
    }

    /// Display-unit magnitude rounded to the nearest integer, ties away
    /// from zero.
    #[must_use]
    pub fn round(self) -> Self {
        Rel::new(self.value.round(), self.unit)
    }

    /// Fixed-width dump form: optional "Rel " prefix, the magnitude in
    /// `unit`, optional abbreviation suffix.
    #[must_use]
    pub fn to_text(self, unit: U, verbose: bool, with_unit: bool) -> String {
        let mut buf = String::new();
        if verbose {
            buf.push_str("Rel ");
        }
        buf.push_str(&format::format_f64(self.in_unit_of(unit)));
        if with_unit {
            buf.push(' ');
            buf.push_str(unit.abbreviation());
        }
        buf
    }
}

/// SI-magnitude equality; the display unit does not participate.
impl<U: Unit> PartialEq for Rel<U> {
    fn eq(&self, other: &Self) -> bool {
        self.si == other.si
    }
}

/// SI-magnitude ordering; NaN follows float semantics.
impl<U: Unit> PartialOrd for Rel<U> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.si.partial_cmp(&other.si)
    }
}

impl<U: Unit> fmt::Display for Rel<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.abbreviation())
    }
}

// ============================================================================
// ABSOLUTE SCALAR
// ============================================================================

/// An absolute quantity: magnitude plus display unit, with a fixed origin.
///
/// Differences of absolute quantities are relative quantities; absolute
/// quantities themselves cannot be added together.
#[derive(Debug, Clone, Copy)]
pub struct Abs<AU: AbsoluteUnit> {
    value: f64,
    unit: AU,
    si: f64,
}

impl<AU: AbsoluteUnit> Abs<AU> {
    /// Quantity of `value` expressed in `unit`.
    #[must_use]
    pub fn new(value: f64, unit: AU) -> Self {
        Abs {
            value,
            unit,
            si: unit.to_standard(value),
        }
    }

    /// Quantity of `si` expressed in the family's standard unit.
    #[must_use]
    pub fn new_si(si: f64) -> Self {
        Abs {
            value: si,
            unit: AU::STANDARD,
            si,
        }
    }

    pub(crate) fn from_si_in(si: f64, unit: AU) -> Self {
        Abs {
            value: unit.from_standard(si),
            unit,
            si,
        }
    }

    /// Magnitude in the standard unit.
    #[must_use]
    pub fn si(self) -> f64 {
        self.si
    }

    /// Magnitude in the display unit.
    #[must_use]
    pub fn in_unit(self) -> f64 {
        self.value
    }

    /// Magnitude expressed in `target` (same family, so always legal).
    #[must_use]
    pub fn in_unit_of(self, target: AU) -> f64 {
        target.from_standard(self.si)
    }

    /// The display unit.
    #[must_use]
    pub fn unit(self) -> AU {
        self.unit
    }

    /// The later/larger of the two by SI magnitude.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self.si >= other.si {
            self
        } else {
            other
        }
    }

    /// The earlier/smaller of the two by SI magnitude.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.si <= other.si {
            self
        } else {
            other
        }
    }

    /// Linear interpolation between `zero` (ratio 0) and `one` (ratio 1),
    /// expressed in `zero`'s display unit.
    #[must_use]
    pub fn interpolate(zero: Self, one: Self, ratio: f64) -> Self {
        Abs::new(
            zero.value * (1.0 - ratio) + one.in_unit_of(zero.unit) * ratio,
            zero.unit,
        )
    }

    /// Display-unit magnitude rounded up.
    #[must_use]
    pub fn ceil(self) -> Self {
        Abs::new(self.value.ceil(), self.unit)
    }

    /// Display-unit magnitude rounded down.
    #[must_use]
    pub fn floor(self) -> Self {
        Abs::new(self.value.floor(), self.unit)
    }

    /// Display-unit magnitude rounded to the nearest integer, ties to even.
    #[must_use]
    pub fn rint(self) -> Self {
        Abs::new(self.value.round_ties_even(), self.unit)
    }

    /// Display-unit magnitude rounded to the nearest integer, ties away
    /// from zero.
    #[must_use]
    pub fn round(self) -> Self {
        Abs::new(self.value.round(), self.unit)
    }

    /// Fixed-width dump form: optional "Abs " prefix, the magnitude in
    /// `unit`, optional abbreviation suffix.
    #[must_use]
    pub fn to_text(self, unit: AU, verbose: bool, with_unit: bool) -> String {
        let mut buf = String::new();
        if verbose {
            buf.push_str("Abs ");
        }
        buf.push_str(&format::format_f64(self.in_unit_of(unit)));
        if with_unit {
            buf.push(' ');
            buf.push_str(unit.abbreviation());
        }
        buf
    }
}

/// SI-magnitude equality; the display unit does not participate.
impl<AU: AbsoluteUnit> PartialEq for Abs<AU> {
    fn eq(&self, other: &Self) -> bool {
        self.si == other.si
    }
}

/// SI-magnitude ordering; NaN follows float semantics.
impl<AU: AbsoluteUnit> PartialOrd for Abs<AU> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.si.partial_cmp(&other.si)
    }
}

impl<AU: AbsoluteUnit> fmt::Display for Abs<AU> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.abbreviation())
    }
}

// ============================================================================
// ADDITIVE OPERATORS (tie-break rule)
// ============================================================================

impl<U: Unit> Add for Rel<U> {
    type Output = Rel<U>;

    fn add(self, rhs: Rel<U>) -> Rel<U> {
        if self.unit == rhs.unit {
            Rel::new(self.value + rhs.value, self.unit)
        } else {
            Rel::new_si(self.si + rhs.si)
        }
    }
}

impl<U: Unit> Sub for Rel<U> {
    type Output = Rel<U>;

    fn sub(self, rhs: Rel<U>) -> Rel<U> {
        if self.unit == rhs.unit {
            Rel::new(self.value - rhs.value, self.unit)
        } else {
            Rel::new_si(self.si - rhs.si)
        }
    }
}

/// `abs + rel -> abs`; fast path when the absolute unit's relative
/// counterpart equals the relative operand's unit.
impl<AU: AbsoluteUnit> Add<Rel<AU::Relative>> for Abs<AU> {
    type Output = Abs<AU>;

    fn add(self, rhs: Rel<AU::Relative>) -> Abs<AU> {
        if self.unit.relative() == rhs.unit {
            Abs::new(self.value + rhs.value, self.unit)
        } else {
            Abs::new_si(self.si + rhs.si)
        }
    }
}

/// `abs - rel -> abs`.
impl<AU: AbsoluteUnit> Sub<Rel<AU::Relative>> for Abs<AU> {
    type Output = Abs<AU>;

    fn sub(self, rhs: Rel<AU::Relative>) -> Abs<AU> {
        if self.unit.relative() == rhs.unit {
            Abs::new(self.value - rhs.value, self.unit)
        } else {
            Abs::new_si(self.si - rhs.si)
        }
    }
}

/// `abs - abs -> rel`; with equal units the result carries the relative
/// counterpart of that unit.
impl<AU: AbsoluteUnit> Sub for Abs<AU> {
    type Output = Rel<AU::Relative>;

    fn sub(self, rhs: Abs<AU>) -> Rel<AU::Relative> {
        if self.unit == rhs.unit {
            Rel::new(self.value - rhs.value, self.unit.relative())
        } else {
            Rel::new_si(self.si - rhs.si)
        }
    }
}

/// `rel + abs -> abs`, the symmetric convenience form.
impl<AU: AbsoluteUnit> Add<Abs<AU>> for Rel<AU::Relative> {
    type Output = Abs<AU>;

    fn add(self, rhs: Abs<AU>) -> Abs<AU> {
        if rhs.unit.relative() == self.unit {
            Abs::new(rhs.value + self.value, rhs.unit)
        } else {
            Abs::new_si(rhs.si + self.si)
        }
    }
}

// ============================================================================
// MULTIPLICATIVE OPERATORS
// ============================================================================

/// Cross-family product per the `quantity_ops!` table; the result carries
/// the output family's standard unit.
impl<U, V> Mul<Rel<V>> for Rel<U>
where
    U: UnitTimes<V>,
    V: Unit,
{
    type Output = Rel<<U as UnitTimes<V>>::Output>;

    fn mul(self, rhs: Rel<V>) -> Self::Output {
        Rel::new_si(self.si * rhs.si)
    }
}

/// Cross-family quotient per the `quantity_ops!` table; the result carries
/// the output family's standard unit.
impl<U, V> Div<Rel<V>> for Rel<U>
where
    U: UnitDivide<V>,
    V: Unit,
{
    type Output = Rel<<U as UnitDivide<V>>::Output>;

    fn div(self, rhs: Rel<V>) -> Self::Output {
        Rel::new_si(self.si / rhs.si)
    }
}

impl<U: Unit> Mul<f64> for Rel<U> {
    type Output = Rel<U>;

    fn mul(self, rhs: f64) -> Rel<U> {
        Rel::new(self.value * rhs, self.unit)
    }
}

impl<U: Unit> Div<f64> for Rel<U> {
    type Output = Rel<U>;

    fn div(self, rhs: f64) -> Rel<U> {
        Rel::new(self.value / rhs, self.unit)
    }
}

impl<U: Unit> Neg for Rel<U> {
    type Output = Rel<U>;

    fn neg(self) -> Rel<U> {
        Rel::new(-self.value, self.unit)
    }
}

impl<AU: AbsoluteUnit> Mul<f64> for Abs<AU> {
    type Output = Abs<AU>;

    fn mul(self, rhs: f64) -> Abs<AU> {
        Abs::new(self.value * rhs, self.unit)
    }
}

impl<AU: AbsoluteUnit> Div<f64> for Abs<AU> {
    type Output = Abs<AU>;

    fn div(self, rhs: f64) -> Abs<AU> {
        Abs::new(self.value / rhs, self.unit)
    }
}

// ============================================================================
// DIMENSIONLESS MATH SET
// ============================================================================

/// The full math set, only available on dimensionless quantities. Every
/// function operates on the display-unit magnitude and keeps the unit.
impl Rel<DimensionlessUnit> {
    /// Arc cosine.
    #[must_use]
    pub fn acos(self) -> Self {
        Rel::new(self.value.acos(), self.unit)
    }

    /// Arc sine.
    #[must_use]
    pub fn asin(self) -> Self {
        Rel::new(self.value.asin(), self.unit)
    }

    /// Arc tangent.
    #[must_use]
    pub fn atan(self) -> Self {
        Rel::new(self.value.atan(), self.unit)
    }

    /// Cube root.
    #[must_use]
    pub fn cbrt(self) -> Self {
        Rel::new(self.value.cbrt(), self.unit)
    }

    /// Cosine.
    #[must_use]
    pub fn cos(self) -> Self {
        Rel::new(self.value.cos(), self.unit)
    }

    /// Hyperbolic cosine.
    #[must_use]
    pub fn cosh(self) -> Self {
        Rel::new(self.value.cosh(), self.unit)
    }

    /// e to the power of the magnitude.
    #[must_use]
    pub fn exp(self) -> Self {
        Rel::new(self.value.exp(), self.unit)
    }

    /// `exp(x) - 1`, accurate near zero.
    #[must_use]
    pub fn expm1(self) -> Self {
        Rel::new(self.value.exp_m1(), self.unit)
    }

    /// Natural logarithm.
    #[must_use]
    pub fn ln(self) -> Self {
        Rel::new(self.value.ln(), self.unit)
    }

    /// Base-10 logarithm.
    #[must_use]
    pub fn log10(self) -> Self {
        Rel::new(self.value.log10(), self.unit)
    }

    /// `ln(1 + x)`, accurate near zero.
    #[must_use]
    pub fn log1p(self) -> Self {
        Rel::new(self.value.ln_1p(), self.unit)
    }

    /// Magnitude raised to `exponent`.
    #[must_use]
    pub fn pow(self, exponent: f64) -> Self {
        Rel::new(self.value.powf(exponent), self.unit)
    }

    /// Sign of the magnitude (1, -1, or NaN).
    #[must_use]
    pub fn signum(self) -> Self {
        Rel::new(self.value.signum(), self.unit)
    }

    /// Sine.
    #[must_use]
    pub fn sin(self) -> Self {
        Rel::new(self.value.sin(), self.unit)
    }

    /// Hyperbolic sine.
    #[must_use]
    pub fn sinh(self) -> Self {
        Rel::new(self.value.sinh(), self.unit)
    }

    /// Square root.
    #[must_use]
    pub fn sqrt(self) -> Self {
        Rel::new(self.value.sqrt(), self.unit)
    }

    /// Tangent.
    #[must_use]
    pub fn tan(self) -> Self {
        Rel::new(self.value.tan(), self.unit)
    }

    /// Hyperbolic tangent.
    #[must_use]
    pub fn tanh(self) -> Self {
        Rel::new(self.value.tanh(), self.unit)
    }

    /// Multiplicative inverse of the magnitude.
    #[must_use]
    pub fn inv(self) -> Self {
        Rel::new(1.0 / self.value, self.unit)
    }
}

// ============================================================================
// PARSING AND SERDE
// ============================================================================

fn parse_parts(text: &str) -> Result<(f64, &str), ValueError> {
    let text = text.trim();
    let (value_text, unit_text) = text
        .split_once(char::is_whitespace)
        .ok_or_else(|| ValueError::Construction(format!("expected '<value> <unit>': '{text}'")))?;
    let value: f64 = value_text.parse().map_err(|_| {
        ValueError::Construction(format!("cannot parse '{value_text}' as a number"))
    })?;
    Ok((value, unit_text.trim_start()))
}

/// Parses `"<value> <abbreviation>"`, e.g. `"12.5 km/h"`.
impl<U: Unit> FromStr for Rel<U> {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, ValueError> {
        let (value, unit_text) = parse_parts(s)?;
        let unit = U::by_abbreviation(unit_text).ok_or_else(|| {
            ValueError::Construction(format!("unknown unit abbreviation '{unit_text}'"))
        })?;
        Ok(Rel::new(value, unit))
    }
}

/// Parses `"<value> <abbreviation>"`, e.g. `"20 dgC"`.
impl<AU: AbsoluteUnit> FromStr for Abs<AU> {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, ValueError> {
        let (value, unit_text) = parse_parts(s)?;
        let unit = AU::by_abbreviation(unit_text).ok_or_else(|| {
            ValueError::Construction(format!("unknown unit abbreviation '{unit_text}'"))
        })?;
        Ok(Abs::new(value, unit))
    }
}

/// Serialized shape of a scalar: display value plus unit abbreviation. The
/// SI magnitude is recomputed on deserialize.
#[derive(Serialize, Deserialize)]
#[serde(rename = "Scalar")]
struct ScalarParts<T> {
    value: f64,
    unit: T,
}

impl<U: Unit> Serialize for Rel<U> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ScalarParts {
            value: self.value,
            unit: self.unit,
        }
        .serialize(serializer)
    }
}

impl<'de, U: Unit> Deserialize<'de> for Rel<U> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let parts = ScalarParts::<U>::deserialize(deserializer)?;
        Ok(Rel::new(parts.value, parts.unit))
    }
}

impl<AU: AbsoluteUnit> Serialize for Abs<AU> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ScalarParts {
            value: self.value,
            unit: self.unit,
        }
        .serialize(serializer)
    }
}

impl<'de, AU: AbsoluteUnit> Deserialize<'de> for Abs<AU> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let parts = ScalarParts::<AU>::deserialize(deserializer)?;
        Ok(Abs::new(parts.value, parts.unit))
    }
}

// ============================================================================
// QUANTITY ALIASES
// ============================================================================

/// Ratio or count without physical dimension.
pub type Dimensionless = Rel<DimensionlessUnit>;
/// Relative length.
pub type Length = Rel<LengthUnit>;
/// Relative time span.
pub type Duration = Rel<DurationUnit>;
/// Speed.
pub type Speed = Rel<SpeedUnit>;
/// Acceleration.
pub type Acceleration = Rel<AccelerationUnit>;
/// Mass.
pub type Mass = Rel<MassUnit>;
/// Force.
pub type Force = Rel<ForceUnit>;
/// Area.
pub type Area = Rel<AreaUnit>;
/// Volume.
pub type Volume = Rel<VolumeUnit>;
/// Mass density.
pub type Density = Rel<DensityUnit>;
/// Pressure.
pub type Pressure = Rel<PressureUnit>;
/// Energy.
pub type Energy = Rel<EnergyUnit>;
/// Power.
pub type Power = Rel<PowerUnit>;
/// Temperature difference.
pub type Temperature = Rel<TemperatureUnit>;
/// Frequency.
pub type Frequency = Rel<FrequencyUnit>;
/// Electric current.
pub type ElectricCurrent = Rel<ElectricCurrentUnit>;
/// Electric potential.
pub type ElectricPotential = Rel<ElectricPotentialUnit>;
/// Plane angle.
pub type Angle = Rel<AngleUnit>;
/// Position along an axis (absolute).
pub type Position = Abs<PositionUnit>;
/// Point in time (absolute).
pub type Time = Abs<TimeUnit>;
/// Thermodynamic temperature (absolute).
pub type AbsoluteTemperature = Abs<AbsoluteTemperatureUnit>;

// ============================================================================
// TESTS
// ============================================================================
