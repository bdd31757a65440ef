//! The unit families and cross-family operations that ship with the crate.
//!
//! This is a representative catalog, not a unit database: enough families
//! and built-in units to cover the legal quantity algebra, the offset
//! temperature scales, and a few deliberately exotic members (furlongs,
//! fortnights) that exercise compound-unit composition. Every family is
//! stamped by [`unit_family!`](crate::unit_family); the first listed unit
//! is the family standard. Cross-family products and quotients are listed
//! once, explicitly, in the [`quantity_ops!`](crate::quantity_ops) table at
//! the bottom.

use serde::{Deserialize, Serialize};

use crate::unit_family;
use crate::units::si::SiDimensions;
use crate::units::{LinearScale, Unit, UnitDef, UnitDivide, UnitSystem, UnitTimes};

// ============================================================================
// DIMENSIONLESS (hand-written: it carries the blanket product rule)
// ============================================================================

/// Units of dimensionless quantities (ratios, counts, fractions).
///
/// Declared by hand rather than through the macro because multiplying any
/// family by a dimensionless quantity keeps the family, which is one
/// blanket rule here instead of a stamped rule per family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionlessUnit {
    def: UnitDef,
}

impl DimensionlessUnit {
    /// The unit ratio.
    pub const UNIT: DimensionlessUnit = DimensionlessUnit {
        def: UnitDef::new("unit", "unit", UnitSystem::Other, 1.0),
    };
    /// One hundredth of the unit ratio.
    pub const PERCENT: DimensionlessUnit = DimensionlessUnit {
        def: UnitDef::new("%", "percent", UnitSystem::Other, 0.01),
    };
}

impl Unit for DimensionlessUnit {
    const SI: SiDimensions = SiDimensions::NONE;
    const STANDARD: DimensionlessUnit = DimensionlessUnit::UNIT;
    const BUILT_IN: &'static [DimensionlessUnit] =
        &[DimensionlessUnit::UNIT, DimensionlessUnit::PERCENT];

    #[inline]
    fn scale(self) -> LinearScale {
        self.def.scale()
    }

    #[inline]
    fn abbreviation(self) -> &'static str {
        self.def.abbreviation()
    }

    #[inline]
    fn name(self) -> &'static str {
        self.def.name()
    }

    #[inline]
    fn system(self) -> UnitSystem {
        self.def.system()
    }

    fn by_abbreviation(abbreviation: &str) -> Option<Self> {
        Self::BUILT_IN
            .iter()
            .find(|unit| unit.def.abbreviation() == abbreviation)
            .copied()
    }
}

impl std::fmt::Display for DimensionlessUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.def.abbreviation())
    }
}

impl Serialize for DimensionlessUnit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.def.abbreviation())
    }
}

impl<'de> Deserialize<'de> for DimensionlessUnit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::by_abbreviation(&text).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown DimensionlessUnit abbreviation '{text}'"))
        })
    }
}

/// Anything times dimensionless stays in its family.
impl<V: Unit> UnitTimes<V> for DimensionlessUnit {
    type Output = V;
}

impl UnitDivide<DimensionlessUnit> for DimensionlessUnit {
    type Output = DimensionlessUnit;
}

// ============================================================================
// RELATIVE FAMILIES
// ============================================================================

unit_family! {
    /// Units of length. Standard unit: meter.
    pub struct LengthUnit {
        si: SiDimensions { m: 1, ..SiDimensions::NONE },
        units: {
            /// SI base unit of length.
            METER = ("m", "meter", SiBase, 1.0);
            KILOMETER = ("km", "kilometer", SiAccepted, 1000.0);
            CENTIMETER = ("cm", "centimeter", SiAccepted, 0.01);
            MILLIMETER = ("mm", "millimeter", SiAccepted, 0.001);
            INCH = ("in", "inch", Imperial, 0.0254);
            FOOT = ("ft", "foot", Imperial, 0.3048);
            YARD = ("yd", "yard", Imperial, 0.9144);
            MILE = ("mi", "mile", Imperial, 1609.344);
            NAUTICAL_MILE = ("NM", "nautical mile", Other, 1852.0);
            /// 220 yards; survives in horse racing and in test fixtures.
            FURLONG = ("fur", "furlong", Other, 201.168);
        }
    }
}

unit_family! {
    /// Units of duration (elapsed time). Standard unit: second.
    pub struct DurationUnit {
        si: SiDimensions { s: 1, ..SiDimensions::NONE },
        units: {
            /// SI base unit of time.
            SECOND = ("s", "second", SiBase, 1.0);
            MILLISECOND = ("ms", "millisecond", SiAccepted, 0.001);
            MINUTE = ("min", "minute", SiAccepted, 60.0);
            HOUR = ("h", "hour", SiAccepted, 3600.0);
            DAY = ("day", "day", SiAccepted, 86400.0);
            WEEK = ("wk", "week", Other, 604_800.0);
            /// Two weeks; the customary companion of the furlong.
            FORTNIGHT = ("fn", "fortnight", Other, 1_209_600.0);
        }
    }
}

unit_family! {
    /// Units of speed. Standard unit: meter per second.
    pub struct SpeedUnit {
        si: SiDimensions { m: 1, s: -1, ..SiDimensions::NONE },
        units: {
            METER_PER_SECOND = ("m/s", "meter per second", SiDerived, 1.0);
            KM_PER_HOUR = ("km/h", "kilometer per hour", SiAccepted, 1000.0 / 3600.0);
            MILE_PER_HOUR = ("mi/h", "mile per hour", Imperial, 1609.344 / 3600.0);
            FOOT_PER_SECOND = ("ft/s", "foot per second", Imperial, 0.3048);
            KNOT = ("kt", "knot", Other, 1852.0 / 3600.0);
        }
    }
}

unit_family! {
    /// Units of acceleration. Standard unit: meter per second squared.
    pub struct AccelerationUnit {
        si: SiDimensions { m: 1, s: -2, ..SiDimensions::NONE },
        units: {
            METER_PER_SECOND_2 = ("m/s2", "meter per second squared", SiDerived, 1.0);
            FOOT_PER_SECOND_2 = ("ft/s2", "foot per second squared", Imperial, 0.3048);
            /// Conventional standard gravity.
            STANDARD_GRAVITY = ("g", "standard gravity", Other, 9.80665);
        }
    }
}

unit_family! {
    /// Units of mass. Standard unit: kilogram.
    pub struct MassUnit {
        si: SiDimensions { kg: 1, ..SiDimensions::NONE },
        units: {
            /// SI base unit of mass.
            KILOGRAM = ("kg", "kilogram", SiBase, 1.0);
            GRAM = ("g", "gram", SiAccepted, 0.001);
            POUND = ("lb", "pound", Imperial, 0.45359237);
            OUNCE = ("oz", "ounce", Imperial, 0.028349523125);
            TONNE = ("t", "tonne", SiAccepted, 1000.0);
        }
    }
}

unit_family! {
    /// Units of force. Standard unit: newton.
    pub struct ForceUnit {
        si: SiDimensions { kg: 1, m: 1, s: -2, ..SiDimensions::NONE },
        units: {
            NEWTON = ("N", "newton", SiDerived, 1.0);
            DYNE = ("dyn", "dyne", Other, 1.0e-5);
            KILOGRAM_FORCE = ("kgf", "kilogram-force", Other, 9.80665);
            POUND_FORCE = ("lbf", "pound-force", Imperial, 4.4482216152605);
        }
    }
}

unit_family! {
    /// Units of area. Standard unit: square meter.
    pub struct AreaUnit {
        si: SiDimensions { m: 2, ..SiDimensions::NONE },
        units: {
            SQUARE_METER = ("m2", "square meter", SiDerived, 1.0);
            SQUARE_CENTIMETER = ("cm2", "square centimeter", SiAccepted, 1.0e-4);
            SQUARE_KILOMETER = ("km2", "square kilometer", SiAccepted, 1.0e6);
            HECTARE = ("ha", "hectare", SiAccepted, 1.0e4);
            SQUARE_FOOT = ("ft2", "square foot", Imperial, 0.09290304);
            SQUARE_INCH = ("in2", "square inch", Imperial, 0.00064516);
            ACRE = ("ac", "acre", Imperial, 4046.8564224);
        }
    }
}

unit_family! {
    /// Units of volume. Standard unit: cubic meter.
    pub struct VolumeUnit {
        si: SiDimensions { m: 3, ..SiDimensions::NONE },
        units: {
            CUBIC_METER = ("m3", "cubic meter", SiDerived, 1.0);
            LITER = ("L", "liter", SiAccepted, 0.001);
            CUBIC_FOOT = ("ft3", "cubic foot", Imperial, 0.028316846592);
            GALLON_US = ("gal", "US gallon", UsCustomary, 0.003785411784);
        }
    }
}

unit_family! {
    /// Units of mass density. Standard unit: kilogram per cubic meter.
    pub struct DensityUnit {
        si: SiDimensions { kg: 1, m: -3, ..SiDimensions::NONE },
        units: {
            KG_PER_CUBIC_METER = ("kg/m3", "kilogram per cubic meter", SiDerived, 1.0);
            GRAM_PER_CUBIC_CM = ("g/cm3", "gram per cubic centimeter", SiAccepted, 1000.0);
        }
    }
}

unit_family! {
    /// Units of pressure. Standard unit: pascal.
    pub struct PressureUnit {
        si: SiDimensions { kg: 1, m: -1, s: -2, ..SiDimensions::NONE },
        units: {
            PASCAL = ("Pa", "pascal", SiDerived, 1.0);
            HECTOPASCAL = ("hPa", "hectopascal", SiDerived, 100.0);
            KILOPASCAL = ("kPa", "kilopascal", SiDerived, 1000.0);
            ATMOSPHERE = ("atm", "standard atmosphere", Other, 101_325.0);
            BAR = ("bar", "bar", Other, 1.0e5);
            MILLIBAR = ("mbar", "millibar", Other, 100.0);
            MILLIMETER_MERCURY = ("mmHg", "millimeter of mercury", Other, 133.3224);
            /// Pound-force per square inch.
            POUND_PER_SQUARE_INCH = ("psi", "pound per square inch", Imperial,
                4.4482216152605 / 0.00064516);
        }
    }
}

unit_family! {
    /// Units of energy. Standard unit: joule.
    pub struct EnergyUnit {
        si: SiDimensions { kg: 1, m: 2, s: -2, ..SiDimensions::NONE },
        units: {
            JOULE = ("J", "joule", SiDerived, 1.0);
            KILOJOULE = ("kJ", "kilojoule", SiDerived, 1000.0);
            WATT_HOUR = ("Wh", "watt-hour", SiAccepted, 3600.0);
            KILOWATT_HOUR = ("kWh", "kilowatt-hour", SiAccepted, 3.6e6);
            /// International Table calorie.
            CALORIE = ("cal", "calorie", Other, 4.1868);
        }
    }
}

unit_family! {
    /// Units of power. Standard unit: watt.
    pub struct PowerUnit {
        si: SiDimensions { kg: 1, m: 2, s: -3, ..SiDimensions::NONE },
        units: {
            WATT = ("W", "watt", SiDerived, 1.0);
            KILOWATT = ("kW", "kilowatt", SiDerived, 1000.0);
            MEGAWATT = ("MW", "megawatt", SiDerived, 1.0e6);
            /// Metric horsepower.
            HORSEPOWER = ("hp", "horsepower", Other, 735.49875);
        }
    }
}

unit_family! {
    /// Units of temperature difference. Standard unit: kelvin.
    ///
    /// These are relative degrees (intervals); the absolute scales with
    /// shifted origins live in [`AbsoluteTemperatureUnit`].
    pub struct TemperatureUnit {
        si: SiDimensions { k: 1, ..SiDimensions::NONE },
        units: {
            /// SI base unit of thermodynamic temperature.
            KELVIN = ("K", "kelvin", SiBase, 1.0);
            DEGREE_CELSIUS = ("dgC", "degree Celsius interval", SiAccepted, 1.0);
            DEGREE_FAHRENHEIT = ("dgF", "degree Fahrenheit interval", Imperial, 5.0 / 9.0);
        }
    }
}

unit_family! {
    /// Units of frequency. Standard unit: hertz.
    pub struct FrequencyUnit {
        si: SiDimensions { s: -1, ..SiDimensions::NONE },
        units: {
            HERTZ = ("Hz", "hertz", SiDerived, 1.0);
            KILOHERTZ = ("kHz", "kilohertz", SiDerived, 1000.0);
            /// Revolutions per minute.
            RPM = ("rpm", "revolution per minute", Other, 1.0 / 60.0);
        }
    }
}

unit_family! {
    /// Units of electric current. Standard unit: ampere.
    pub struct ElectricCurrentUnit {
        si: SiDimensions { a: 1, ..SiDimensions::NONE },
        units: {
            /// SI base unit of electric current.
            AMPERE = ("A", "ampere", SiBase, 1.0);
            MILLIAMPERE = ("mA", "milliampere", SiDerived, 0.001);
        }
    }
}

unit_family! {
    /// Units of electric potential. Standard unit: volt.
    pub struct ElectricPotentialUnit {
        si: SiDimensions { kg: 1, m: 2, s: -3, a: -1, ..SiDimensions::NONE },
        units: {
            VOLT = ("V", "volt", SiDerived, 1.0);
            MILLIVOLT = ("mV", "millivolt", SiDerived, 0.001);
            KILOVOLT = ("kV", "kilovolt", SiDerived, 1000.0);
        }
    }
}

unit_family! {
    /// Units of plane angle. Standard unit: radian.
    pub struct AngleUnit {
        si: SiDimensions { rad: 1, ..SiDimensions::NONE },
        units: {
            RADIAN = ("rad", "radian", SiDerived, 1.0);
            DEGREE = ("deg", "degree", SiAccepted, std::f64::consts::PI / 180.0);
        }
    }
}

// ============================================================================
// ABSOLUTE FAMILIES
// ============================================================================

unit_family! {
    /// Positions along an axis, absolute counterpart of [`LengthUnit`].
    /// Standard unit: meter.
    pub struct absolute PositionUnit(relative = LengthUnit) {
        si: SiDimensions { m: 1, ..SiDimensions::NONE },
        units: {
            METER = ("m", "meter", SiBase, 1.0, offset 0.0, rel LengthUnit::METER);
            KILOMETER = ("km", "kilometer", SiAccepted, 1000.0, offset 0.0,
                rel LengthUnit::KILOMETER);
            CENTIMETER = ("cm", "centimeter", SiAccepted, 0.01, offset 0.0,
                rel LengthUnit::CENTIMETER);
            INCH = ("in", "inch", Imperial, 0.0254, offset 0.0, rel LengthUnit::INCH);
            FOOT = ("ft", "foot", Imperial, 0.3048, offset 0.0, rel LengthUnit::FOOT);
            MILE = ("mi", "mile", Imperial, 1609.344, offset 0.0, rel LengthUnit::MILE);
        }
    }
}

unit_family! {
    /// Points in time, absolute counterpart of [`DurationUnit`].
    /// Standard unit: second (from an arbitrary shared epoch).
    pub struct absolute TimeUnit(relative = DurationUnit) {
        si: SiDimensions { s: 1, ..SiDimensions::NONE },
        units: {
            SECOND = ("s", "second", SiBase, 1.0, offset 0.0, rel DurationUnit::SECOND);
            MINUTE = ("min", "minute", SiAccepted, 60.0, offset 0.0,
                rel DurationUnit::MINUTE);
            HOUR = ("h", "hour", SiAccepted, 3600.0, offset 0.0, rel DurationUnit::HOUR);
            DAY = ("day", "day", SiAccepted, 86400.0, offset 0.0, rel DurationUnit::DAY);
            WEEK = ("wk", "week", Other, 604_800.0, offset 0.0, rel DurationUnit::WEEK);
        }
    }
}

unit_family! {
    /// Absolute temperature scales, counterpart of [`TemperatureUnit`].
    /// Standard unit: kelvin.
    pub struct absolute AbsoluteTemperatureUnit(relative = TemperatureUnit) {
        si: SiDimensions { k: 1, ..SiDimensions::NONE },
        units: {
            KELVIN = ("K", "kelvin", SiBase, 1.0, offset 0.0,
                rel TemperatureUnit::KELVIN);
            /// Celsius: shifted origin, kelvin-sized degree.
            DEGREE_CELSIUS = ("dgC", "degree Celsius", SiAccepted, 1.0, offset 273.15,
                rel TemperatureUnit::DEGREE_CELSIUS);
            /// Fahrenheit: to_standard(F) = (F + 459.67) * 5/9.
            DEGREE_FAHRENHEIT = ("dgF", "degree Fahrenheit", Imperial, 5.0 / 9.0,
                offset 459.67 * 5.0 / 9.0, rel TemperatureUnit::DEGREE_FAHRENHEIT);
            /// Rankine: Fahrenheit-sized degree from absolute zero.
            DEGREE_RANKINE = ("dgR", "degree Rankine", Other, 5.0 / 9.0, offset 0.0,
                rel TemperatureUnit::DEGREE_FAHRENHEIT);
        }
    }
}

// ============================================================================
// CROSS-FAMILY OPERATIONS
// ============================================================================

crate::quantity_ops! {
    LengthUnit * LengthUnit => AreaUnit;
    AreaUnit * LengthUnit => VolumeUnit;
    LengthUnit * AreaUnit => VolumeUnit;
    AreaUnit / LengthUnit => LengthUnit;
    VolumeUnit / AreaUnit => LengthUnit;
    VolumeUnit / LengthUnit => AreaUnit;

    LengthUnit / DurationUnit => SpeedUnit;
    LengthUnit / SpeedUnit => DurationUnit;
    SpeedUnit * DurationUnit => LengthUnit;
    DurationUnit * SpeedUnit => LengthUnit;
    SpeedUnit / DurationUnit => AccelerationUnit;
    SpeedUnit / AccelerationUnit => DurationUnit;
    AccelerationUnit * DurationUnit => SpeedUnit;
    DurationUnit * AccelerationUnit => SpeedUnit;

    MassUnit * AccelerationUnit => ForceUnit;
    AccelerationUnit * MassUnit => ForceUnit;
    ForceUnit / MassUnit => AccelerationUnit;
    ForceUnit / AccelerationUnit => MassUnit;

    MassUnit / VolumeUnit => DensityUnit;
    MassUnit / DensityUnit => VolumeUnit;
    DensityUnit * VolumeUnit => MassUnit;
    VolumeUnit * DensityUnit => MassUnit;

    ForceUnit / AreaUnit => PressureUnit;
    ForceUnit / PressureUnit => AreaUnit;
    PressureUnit * AreaUnit => ForceUnit;
    AreaUnit * PressureUnit => ForceUnit;

    ForceUnit * LengthUnit => EnergyUnit;
    LengthUnit * ForceUnit => EnergyUnit;
    EnergyUnit / LengthUnit => ForceUnit;
    EnergyUnit / ForceUnit => LengthUnit;

    PressureUnit * VolumeUnit => EnergyUnit;
    VolumeUnit * PressureUnit => EnergyUnit;
    EnergyUnit / VolumeUnit => PressureUnit;
    EnergyUnit / PressureUnit => VolumeUnit;

    EnergyUnit / DurationUnit => PowerUnit;
    EnergyUnit / PowerUnit => DurationUnit;
    PowerUnit * DurationUnit => EnergyUnit;
    DurationUnit * PowerUnit => EnergyUnit;

    PowerUnit / ElectricCurrentUnit => ElectricPotentialUnit;
    PowerUnit / ElectricPotentialUnit => ElectricCurrentUnit;
    ElectricPotentialUnit * ElectricCurrentUnit => PowerUnit;
    ElectricCurrentUnit * ElectricPotentialUnit => PowerUnit;

    DimensionlessUnit / DurationUnit => FrequencyUnit;
    DimensionlessUnit / FrequencyUnit => DurationUnit;
    FrequencyUnit * DurationUnit => DimensionlessUnit;
    DurationUnit * FrequencyUnit => DimensionlessUnit;
}

// ============================================================================
// TESTS
// ============================================================================
