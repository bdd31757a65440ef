//! Scalar integration tests: the absolute/relative combination rules, the
//! result-unit tie-break, cross-family operators, the math surface, text
//! round-trips, and serde.

use approx::assert_relative_eq;
use typed_quantities::{
    AbsoluteTemperature, AbsoluteTemperatureUnit, Acceleration, AccelerationUnit, AreaUnit,
    Dimensionless, DimensionlessUnit, Duration, DurationUnit, EnergyUnit, Force, ForceUnit,
    Length, LengthUnit, Mass, MassUnit, Position, PositionUnit, Power, PowerUnit, Pressure,
    PressureUnit, Speed, SpeedUnit, Temperature, TemperatureUnit, ValueError,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// ============================================================================
// ADDITIVE RULES AND THE RESULT-UNIT TIE-BREAK
// ============================================================================

#[test]
fn test_rel_plus_rel_same_unit_stays_in_unit() {
    let sum = Length::new(1.25, LengthUnit::MILE) + Length::new(0.5, LengthUnit::MILE);
    assert_eq!(sum.unit(), LengthUnit::MILE);
    assert_relative_eq!(sum.in_unit(), 1.75, max_relative = 1e-12);
}

#[test]
fn test_rel_plus_rel_mixed_units_falls_back_to_standard() {
    let sum = Length::new(1.0, LengthUnit::MILE) + Length::new(1.0, LengthUnit::FOOT);
    assert_eq!(sum.unit(), LengthUnit::METER);
    assert_relative_eq!(sum.si(), 1609.344 + 0.3048, max_relative = 1e-12);
}

#[test]
fn test_abs_plus_rel_keeps_paired_display_unit() {
    let pos = Position::new(2.0, PositionUnit::KILOMETER);
    let step = Length::new(500.0, LengthUnit::KILOMETER);
    assert_eq!((pos + step).unit(), PositionUnit::KILOMETER);

    let other = Length::new(500.0, LengthUnit::METER);
    let moved = pos + other;
    assert_eq!(moved.unit(), PositionUnit::METER);
    assert_relative_eq!(moved.si(), 2500.0, max_relative = 1e-12);
}

#[test]
fn test_rel_plus_abs_symmetric_form() {
    let pos = Position::new(2.0, PositionUnit::KILOMETER);
    let step = Length::new(1.0, LengthUnit::KILOMETER);
    let a = pos + step;
    let b = step + pos;
    assert_eq!(a.unit(), b.unit());
    assert_relative_eq!(a.si(), b.si(), max_relative = 1e-12);
}

#[test]
fn test_abs_minus_abs_yields_relative_counterpart() {
    let gap = Position::new(10.0, PositionUnit::METER) - Position::new(3.0, PositionUnit::METER);
    assert_eq!(gap.unit(), LengthUnit::METER);
    assert_relative_eq!(gap.si(), 7.0, max_relative = 1e-12);

    let mixed =
        Position::new(1.0, PositionUnit::KILOMETER) - Position::new(200.0, PositionUnit::METER);
    assert_eq!(mixed.unit(), LengthUnit::METER);
    assert_relative_eq!(mixed.si(), 800.0, max_relative = 1e-12);
}

#[test]
fn test_abs_plus_rel_minus_abs_recovers_rel() {
    let a1 = Position::new(5.0, PositionUnit::MILE);
    let r = Length::new(2.5, LengthUnit::KILOMETER);
    let back = (a1 + r) - a1;
    assert_relative_eq!(back.si(), r.si(), max_relative = 1e-12);
}

#[test]
fn test_celsius_arithmetic_uses_offsets() {
    let noon = AbsoluteTemperature::new(25.0, AbsoluteTemperatureUnit::DEGREE_CELSIUS);
    assert_relative_eq!(noon.si(), 298.15, max_relative = 1e-12);

    let warmer = noon + Temperature::new(10.0, TemperatureUnit::DEGREE_CELSIUS);
    assert_eq!(warmer.unit(), AbsoluteTemperatureUnit::DEGREE_CELSIUS);
    assert_relative_eq!(warmer.in_unit(), 35.0, max_relative = 1e-12);
    assert_relative_eq!(warmer.si(), 308.15, max_relative = 1e-12);

    let spread = warmer - noon;
    assert_eq!(spread.unit(), TemperatureUnit::DEGREE_CELSIUS);
    assert_relative_eq!(spread.in_unit(), 10.0, max_relative = 1e-9, epsilon = 1e-9);
}

// ============================================================================
// CROSS-FAMILY MULTIPLICATIVE OPERATORS
// ============================================================================

#[test]
fn test_furlongs_per_fortnight_quotient() {
    let pace = Length::new(1000.0, LengthUnit::FURLONG) / Duration::new(2.0, DurationUnit::FORTNIGHT);
    assert_eq!(pace.unit(), SpeedUnit::METER_PER_SECOND);
    assert_relative_eq!(
        pace.si(),
        1000.0 * 201.168 / (2.0 * 1_209_600.0),
        max_relative = 1e-12
    );
}

#[test]
fn test_cross_family_product_table() {
    let force = Mass::new(2.0, MassUnit::KILOGRAM)
        * Acceleration::new(3.0, AccelerationUnit::METER_PER_SECOND_2);
    assert_eq!(force.unit(), ForceUnit::NEWTON);
    assert_relative_eq!(force.si(), 6.0, max_relative = 1e-12);

    let area = Length::new(4.0, LengthUnit::METER) * Length::new(2.5, LengthUnit::METER);
    assert_eq!(area.unit(), AreaUnit::SQUARE_METER);
    assert_relative_eq!(area.si(), 10.0, max_relative = 1e-12);

    let energy = force * Length::new(0.5, LengthUnit::METER);
    assert_eq!(energy.unit(), EnergyUnit::JOULE);
    assert_relative_eq!(energy.si(), 3.0, max_relative = 1e-12);

    let power: Power = energy / Duration::new(2.0, DurationUnit::SECOND);
    assert_eq!(power.unit(), PowerUnit::WATT);
    assert_relative_eq!(power.si(), 1.5, max_relative = 1e-12);
}

#[test]
fn test_same_family_division_is_dimensionless() {
    let ratio = Length::new(1.0, LengthUnit::KILOMETER) / Length::new(250.0, LengthUnit::METER);
    assert_eq!(ratio.unit(), DimensionlessUnit::UNIT);
    assert_relative_eq!(ratio.si(), 4.0, max_relative = 1e-12);
}

#[test]
fn test_dimensionless_multiplication_keeps_family() {
    let doubled = Pressure::new(2.0, PressureUnit::BAR) * Dimensionless::new(2.0, DimensionlessUnit::UNIT);
    assert_eq!(doubled.unit(), PressureUnit::PASCAL);
    assert_relative_eq!(doubled.si(), 4.0e5, max_relative = 1e-12);
}

#[test]
fn test_scaling_by_bare_numbers() {
    let len = Length::new(3.0, LengthUnit::FOOT);
    let doubled = len * 2.0;
    assert_eq!(doubled.unit(), LengthUnit::FOOT);
    assert_relative_eq!(doubled.in_unit(), 6.0, max_relative = 1e-12);
    let halved = len / 2.0;
    assert_relative_eq!(halved.in_unit(), 1.5, max_relative = 1e-12);
    let negated = -len;
    assert_relative_eq!(negated.in_unit(), -3.0, max_relative = 1e-12);
}

// ============================================================================
// MATH SURFACE
// ============================================================================

#[test]
fn test_relative_math_set_operates_in_display_unit() {
    let cases: &[(f64, f64, f64, f64, f64)] = &[
        // value, abs, floor, ceil, rint (ties to even)
        (2.5, 2.5, 2.0, 3.0, 2.0),
        (3.5, 3.5, 3.0, 4.0, 4.0),
        (-1.5, 1.5, -2.0, -1.0, -2.0),
    ];
    for &(value, abs, floor, ceil, rint) in cases {
        let x = Speed::new(value, SpeedUnit::KNOT);
        assert_relative_eq!(x.abs().in_unit(), abs);
        assert_relative_eq!(x.floor().in_unit(), floor);
        assert_relative_eq!(x.ceil().in_unit(), ceil);
        assert_relative_eq!(x.rint().in_unit(), rint, max_relative = 1e-12, epsilon = 1e-12);
        assert_eq!(x.abs().unit(), SpeedUnit::KNOT);
    }
    assert_relative_eq!(Speed::new(2.5, SpeedUnit::KNOT).round().in_unit(), 3.0);
}

#[test]
fn test_dimensionless_math_set() {
    let x = Dimensionless::new(0.25, DimensionlessUnit::UNIT);
    assert_relative_eq!(x.sqrt().si(), 0.5, max_relative = 1e-12);
    assert_relative_eq!(x.inv().si(), 4.0, max_relative = 1e-12);
    assert_relative_eq!(x.pow(2.0).si(), 0.0625, max_relative = 1e-12);
    assert_relative_eq!(x.exp().si(), 0.25_f64.exp(), max_relative = 1e-12);
    assert_relative_eq!(x.ln().si(), 0.25_f64.ln(), max_relative = 1e-12);
    assert_relative_eq!(x.sin().si(), 0.25_f64.sin(), max_relative = 1e-12);
    assert_relative_eq!(
        Dimensionless::new(1.0, DimensionlessUnit::UNIT).atan().si(),
        std::f64::consts::FRAC_PI_4,
        max_relative = 1e-12
    );
}

#[test]
fn test_comparison_is_by_standard_value() {
    let km = Length::new(1.0, LengthUnit::KILOMETER);
    let m = Length::new(1000.0, LengthUnit::METER);
    assert_eq!(km, m);
    assert!(Length::new(1.0, LengthUnit::MILE) > km);
    assert_eq!(km.max(m).unit(), LengthUnit::KILOMETER, "ties go to the receiver");
    assert_eq!(
        Length::new(2.0, LengthUnit::METER).min(Length::new(1.0, LengthUnit::METER)),
        Length::new(1.0, LengthUnit::METER)
    );
}

#[test]
fn test_interpolate_in_first_operand_unit() {
    let zero = Duration::new(1.0, DurationUnit::HOUR);
    let one = Duration::new(7200.0, DurationUnit::SECOND);
    let mid = Duration::interpolate(zero, one, 0.5);
    assert_eq!(mid.unit(), DurationUnit::HOUR);
    assert_relative_eq!(mid.in_unit(), 1.5, max_relative = 1e-12);
}

// ============================================================================
// TEXT AND SERDE
// ============================================================================

#[test]
fn test_parse_scalar_from_text() {
    let speed: Speed = "12.5 km/h".parse().unwrap();
    assert_eq!(speed.unit(), SpeedUnit::KM_PER_HOUR);
    assert_relative_eq!(speed.in_unit(), 12.5, max_relative = 1e-12);

    let pos: Position = "3 km".parse().unwrap();
    assert_eq!(pos.unit(), PositionUnit::KILOMETER);

    assert!(matches!("12.5".parse::<Speed>(), Err(ValueError::Construction(_))));
    assert!(matches!("fast km/h".parse::<Speed>(), Err(ValueError::Construction(_))));
    assert!(matches!("12.5 parsec/h".parse::<Speed>(), Err(ValueError::Construction(_))));
}

#[test]
fn test_display_and_round_trip_through_text() {
    let force = Force::new(9.81, ForceUnit::NEWTON);
    assert_eq!(force.to_string(), "9.81 N");
    let back: Force = force.to_string().parse().unwrap();
    assert_relative_eq!(back.si(), force.si(), max_relative = 1e-12);
}

#[test]
fn test_serde_round_trip_recomputes_si() {
    let speed = Speed::new(90.0, SpeedUnit::KM_PER_HOUR);
    let json = serde_json::to_string(&speed).unwrap();
    assert_eq!(json, r#"{"value":90.0,"unit":"km/h"}"#);
    let back: Speed = serde_json::from_str(&json).unwrap();
    assert_eq!(back.unit(), SpeedUnit::KM_PER_HOUR);
    assert_relative_eq!(back.si(), 25.0, max_relative = 1e-12);
}
