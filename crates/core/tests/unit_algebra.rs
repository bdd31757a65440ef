//! Unit-model integration tests: conversion round-trips for every catalog
//! unit, SI signature algebra and text form, compound-unit composition,
//! derivation, abbreviation lookup, and the absolute/relative pairing.

use approx::assert_relative_eq;
use typed_quantities::{
    constituent, AbsoluteTemperatureUnit, AbsoluteUnit, AccelerationUnit, AngleUnit, AreaUnit,
    DensityUnit, DimensionlessUnit, DurationUnit, ElectricCurrentUnit, ElectricPotentialUnit,
    EnergyUnit, ForceUnit, FrequencyUnit, LengthUnit, MassUnit, PositionUnit, PowerUnit,
    PressureUnit, SiDimensions, SpeedUnit, TemperatureUnit, TimeUnit, Unit, UnitSystem,
    ValueError, VolumeUnit,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// value -> standard -> value must be lossless for representative inputs.
fn check_round_trip<U: Unit>() {
    for &unit in U::BUILT_IN {
        for x in [0.0_f64, 1.0, -12.5, 3.25e9] {
            let standard = unit.to_standard(x);
            let back = unit.from_standard(standard);
            assert_relative_eq!(back, x, max_relative = 1e-12, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_round_trip_every_catalog_unit() {
    check_round_trip::<DimensionlessUnit>();
    check_round_trip::<LengthUnit>();
    check_round_trip::<DurationUnit>();
    check_round_trip::<SpeedUnit>();
    check_round_trip::<AccelerationUnit>();
    check_round_trip::<MassUnit>();
    check_round_trip::<ForceUnit>();
    check_round_trip::<AreaUnit>();
    check_round_trip::<VolumeUnit>();
    check_round_trip::<DensityUnit>();
    check_round_trip::<PressureUnit>();
    check_round_trip::<EnergyUnit>();
    check_round_trip::<PowerUnit>();
    check_round_trip::<TemperatureUnit>();
    check_round_trip::<FrequencyUnit>();
    check_round_trip::<ElectricCurrentUnit>();
    check_round_trip::<ElectricPotentialUnit>();
    check_round_trip::<AngleUnit>();
    check_round_trip::<PositionUnit>();
    check_round_trip::<TimeUnit>();
    check_round_trip::<AbsoluteTemperatureUnit>();
}

#[test]
fn test_converting_between_units_of_one_family() {
    let miles = 2.0;
    let si = LengthUnit::MILE.to_standard(miles);
    assert_relative_eq!(si, 3218.688, max_relative = 1e-12);
    assert_relative_eq!(
        LengthUnit::KILOMETER.from_standard(si),
        3.218688,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        LengthUnit::FOOT.from_standard(si),
        2.0 * 5280.0,
        max_relative = 1e-12
    );
}

#[test]
fn test_si_signature_text_forms() {
    let cases: &[(SiDimensions, &str)] = &[
        (DimensionlessUnit::SI, "1"),
        (LengthUnit::SI, "m"),
        (SpeedUnit::SI, "m/s"),
        (AccelerationUnit::SI, "m/s2"),
        (ForceUnit::SI, "kgm/s2"),
        (PressureUnit::SI, "kg/ms2"),
        (EnergyUnit::SI, "kgm2/s2"),
        (PowerUnit::SI, "kgm2/s3"),
        (ElectricPotentialUnit::SI, "kgm2/s3A"),
        (FrequencyUnit::SI, "1/s"),
    ];
    for (dims, text) in cases {
        assert_eq!(dims.to_string(), *text);
        assert_eq!(
            text.parse::<SiDimensions>().unwrap(),
            *dims,
            "parsing must invert display for {text}"
        );
    }
    assert!(matches!(
        "kgq2".parse::<SiDimensions>(),
        Err(ValueError::Construction(_))
    ));
}

#[test]
fn test_cross_family_table_preserves_si_coefficients() {
    assert_eq!(AreaUnit::SI, LengthUnit::SI.multiply(LengthUnit::SI));
    assert_eq!(VolumeUnit::SI, AreaUnit::SI.multiply(LengthUnit::SI));
    assert_eq!(SpeedUnit::SI, LengthUnit::SI.divide(DurationUnit::SI));
    assert_eq!(AccelerationUnit::SI, SpeedUnit::SI.divide(DurationUnit::SI));
    assert_eq!(ForceUnit::SI, MassUnit::SI.multiply(AccelerationUnit::SI));
    assert_eq!(DensityUnit::SI, MassUnit::SI.divide(VolumeUnit::SI));
    assert_eq!(PressureUnit::SI, ForceUnit::SI.divide(AreaUnit::SI));
    assert_eq!(EnergyUnit::SI, ForceUnit::SI.multiply(LengthUnit::SI));
    assert_eq!(EnergyUnit::SI, PressureUnit::SI.multiply(VolumeUnit::SI));
    assert_eq!(PowerUnit::SI, EnergyUnit::SI.divide(DurationUnit::SI));
    assert_eq!(
        ElectricPotentialUnit::SI,
        PowerUnit::SI.divide(ElectricCurrentUnit::SI)
    );
    assert_eq!(
        FrequencyUnit::SI,
        DimensionlessUnit::SI.divide(DurationUnit::SI)
    );
}

#[test]
fn test_compound_unit_from_constituents() {
    let fur_per_fn = SpeedUnit::compound(
        "fur/fn",
        "furlong per fortnight",
        &[
            constituent(LengthUnit::FURLONG, 1),
            constituent(DurationUnit::FORTNIGHT, -1),
        ],
    )
    .unwrap();
    assert_relative_eq!(
        fur_per_fn.scale().factor(),
        201.168 / 1_209_600.0,
        max_relative = 1e-12
    );
    assert_eq!(fur_per_fn.abbreviation(), "fur/fn");
    assert_eq!(fur_per_fn.system(), UnitSystem::Other);
    assert_relative_eq!(
        fur_per_fn.to_standard(1_209_600.0 / 201.168),
        1.0,
        max_relative = 1e-12
    );
}

#[test]
fn test_compound_checks_dimensions() {
    let err = AreaUnit::compound(
        "bogus",
        "bogus area",
        &[
            constituent(LengthUnit::METER, 1),
            constituent(DurationUnit::SECOND, -1),
        ],
    )
    .unwrap_err();
    assert!(
        matches!(err, ValueError::DimensionalIncompatibility { .. }),
        "mismatched constituents must be rejected, got {err}"
    );
}

#[test]
fn test_derive_linear_composes_transitively() {
    let kilofurlong = LengthUnit::derive_linear(LengthUnit::FURLONG, 1000.0, "kfur", "kilofurlong");
    assert_relative_eq!(kilofurlong.to_standard(1.0), 201_168.0, max_relative = 1e-12);
    let mega = LengthUnit::derive_linear(kilofurlong, 1000.0, "Mfur", "megafurlong");
    assert_relative_eq!(mega.to_standard(1.0), 201_168_000.0, max_relative = 1e-12);
}

#[test]
fn test_by_abbreviation_lookup() {
    assert_eq!(LengthUnit::by_abbreviation("fur"), Some(LengthUnit::FURLONG));
    assert_eq!(DurationUnit::by_abbreviation("fn"), Some(DurationUnit::FORTNIGHT));
    assert_eq!(SpeedUnit::by_abbreviation("km/h"), Some(SpeedUnit::KM_PER_HOUR));
    assert_eq!(
        AbsoluteTemperatureUnit::by_abbreviation("dgC"),
        Some(AbsoluteTemperatureUnit::DEGREE_CELSIUS)
    );
    assert_eq!(LengthUnit::by_abbreviation("cubit"), None);
}

#[test]
fn test_absolute_units_pair_with_relatives() {
    assert_eq!(PositionUnit::KILOMETER.relative(), LengthUnit::KILOMETER);
    assert_eq!(TimeUnit::HOUR.relative(), DurationUnit::HOUR);
    assert_eq!(
        AbsoluteTemperatureUnit::KELVIN.relative(),
        TemperatureUnit::KELVIN
    );
    // The relative counterpart never carries the origin offset.
    assert_relative_eq!(
        AbsoluteTemperatureUnit::DEGREE_CELSIUS.scale().offset(),
        273.15,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        TemperatureUnit::DEGREE_CELSIUS.scale().offset(),
        0.0,
        max_relative = 1e-12
    );
}

#[test]
fn test_temperature_scale_conversions() {
    let cases: &[(AbsoluteTemperatureUnit, f64, f64)] = &[
        (AbsoluteTemperatureUnit::KELVIN, 300.0, 300.0),
        (AbsoluteTemperatureUnit::DEGREE_CELSIUS, 25.0, 298.15),
        (AbsoluteTemperatureUnit::DEGREE_CELSIUS, -273.15, 0.0),
        (AbsoluteTemperatureUnit::DEGREE_FAHRENHEIT, 32.0, 273.15),
        (AbsoluteTemperatureUnit::DEGREE_FAHRENHEIT, 212.0, 373.15),
        (AbsoluteTemperatureUnit::DEGREE_RANKINE, 491.67, 273.15),
    ];
    for &(unit, value, kelvin) in cases {
        assert_relative_eq!(
            unit.to_standard(value),
            kelvin,
            max_relative = 1e-12,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            unit.from_standard(kelvin),
            value,
            max_relative = 1e-12,
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_units_serialize_as_abbreviation() {
    let json = serde_json::to_string(&LengthUnit::KILOMETER).unwrap();
    assert_eq!(json, "\"km\"");
    let back: LengthUnit = serde_json::from_str(&json).unwrap();
    assert_eq!(back, LengthUnit::KILOMETER);
    assert!(serde_json::from_str::<LengthUnit>("\"cubit\"").is_err());
}

#[test]
fn test_standard_units_carry_identity_scale() {
    assert!(LengthUnit::METER.is_standard());
    assert!(!LengthUnit::FURLONG.is_standard());
    assert_relative_eq!(LengthUnit::STANDARD.scale().factor(), 1.0);
    assert_relative_eq!(PositionUnit::STANDARD.scale().offset(), 0.0);
}
