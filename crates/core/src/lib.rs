//! Strongly-Typed Physical Quantities Library
//!
//! Quantities (length, duration, speed, pressure, ...) carry their unit and
//! their absolute/relative nature in the type, so unit-mismatch errors are
//! compile errors instead of silent numeric bugs. Any unit of a family can be
//! used for input/output; arithmetic goes through the family's standard (SI)
//! unit.
//!
//! ## Layers
//!
//! - Unit model: linear scales, SI dimensional signatures, the absolute /
//!   relative unit pairing, and a declarative catalog of built-in families
//! - Scalars: [`Rel`] / [`Abs`] value types with the full combination rules
//! - Storage engine: unit-free dense/sparse vector and matrix data with
//!   storage-type promotion and data-parallel elementwise kernels
//! - Typed containers: vectors and matrices of quantities with copy-on-write
//!   mutable variants

pub mod container;
pub mod error;
pub mod format;
pub mod scalar;
pub mod storage;
pub mod units;

pub use error::ValueError;

pub use units::{
    compose, constituent, AbsoluteUnit, Constituent, LinearScale, SiDimensions, Unit, UnitDef,
    UnitDivide, UnitSystem, UnitTimes,
};

pub use units::catalog::{
    AbsoluteTemperatureUnit, AccelerationUnit, AngleUnit, AreaUnit, DensityUnit,
    DimensionlessUnit, DurationUnit, ElectricCurrentUnit, ElectricPotentialUnit, EnergyUnit,
    ForceUnit, FrequencyUnit, LengthUnit, MassUnit, PositionUnit, PowerUnit, PressureUnit,
    SpeedUnit, TemperatureUnit, TimeUnit, VolumeUnit,
};

pub use scalar::{
    Abs, AbsoluteTemperature, Acceleration, Angle, Area, Density, Dimensionless, Duration,
    ElectricCurrent, ElectricPotential, Energy, Force, Frequency, Length, Mass, Position, Power,
    Pressure, Rel, Speed, Temperature, Time, Volume,
};

pub use storage::{MatrixData, StorageType, VectorData, PARALLEL_THRESHOLD};

pub use container::{
    AbsMatrix, AbsVector, MutableAbsMatrix, MutableAbsVector, MutableRelMatrix, MutableRelVector,
    RelMatrix, RelVector,
};

// Used by the expansion of `unit_family!` in downstream crates.
#[doc(hidden)]
pub mod __support {
    pub use rustc_hash::FxHashMap;
    pub use serde;
}
