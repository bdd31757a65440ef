//! Linear value scales tying a unit to its family's standard unit.

use serde::{Deserialize, Serialize};

/// Conversion between a unit and the standard unit of its family.
///
/// `to_standard(v) = v * factor + offset`; the offset is non-zero only for
/// absolute units with a shifted origin (degree Celsius, degree Fahrenheit).
/// The standard unit of every family carries [`LinearScale::IDENTITY`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    factor: f64,
    offset: f64,
}

impl LinearScale {
    /// Scale of a standard unit: factor 1, offset 0.
    pub const IDENTITY: LinearScale = LinearScale {
        factor: 1.0,
        offset: 0.0,
    };

    /// Pure multiplicative scale (offset 0).
    #[inline]
    #[must_use]
    pub const fn new(factor: f64) -> Self {
        LinearScale {
            factor,
            offset: 0.0,
        }
    }

    /// Scale with a shifted origin, applied after the factor.
    #[inline]
    #[must_use]
    pub const fn with_offset(factor: f64, offset: f64) -> Self {
        LinearScale { factor, offset }
    }

    /// Multiplier to the standard unit.
    #[inline]
    #[must_use]
    pub const fn factor(self) -> f64 {
        self.factor
    }

    /// Origin shift to the standard unit.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> f64 {
        self.offset
    }

    /// Convert a value expressed in this scale's unit to the standard unit.
    #[inline]
    #[must_use]
    pub fn to_standard(self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    /// Convert a value expressed in the standard unit to this scale's unit.
    #[inline]
    #[must_use]
    pub fn from_standard(self, standard_value: f64) -> f64 {
        (standard_value - self.offset) / self.factor
    }

    /// True for the identity scale, i.e. the standard unit itself.
    #[inline]
    #[must_use]
    pub fn is_standard(self) -> bool {
        self.factor == 1.0 && self.offset == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_is_standard() {
        assert!(LinearScale::IDENTITY.is_standard());
        assert_eq!(LinearScale::IDENTITY.to_standard(42.0), 42.0);
    }

    #[test]
    fn test_kilometer_scale() {
        let km = LinearScale::new(1000.0);
        assert_eq!(km.to_standard(2.5), 2500.0);
        assert_eq!(km.from_standard(2500.0), 2.5);
        assert!(!km.is_standard());
    }

    #[test]
    fn test_fahrenheit_offset_scale() {
        // to_standard(F) = (F + 459.67) * 5/9
        let fahrenheit = LinearScale::with_offset(5.0 / 9.0, 459.67 * 5.0 / 9.0);
        assert_relative_eq!(fahrenheit.to_standard(32.0), 273.15, epsilon = 1e-9);
        assert_relative_eq!(fahrenheit.from_standard(273.15), 32.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_trip_extremes() {
        let scale = LinearScale::with_offset(0.3048, 12.5);
        for value in [0.0, -1.0e6, 1.0e12, 5.0e-9] {
            assert_relative_eq!(
                scale.from_standard(scale.to_standard(value)),
                value,
                epsilon = 1e-6,
                max_relative = 1e-12
            );
        }
    }
}
