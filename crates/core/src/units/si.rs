//! SI dimensional signatures.
//!
//! A signature records the exponent of each SI base dimension (plus the two
//! supplementary angle dimensions) carried by a unit family: force is
//! kg·m/s², electric potential kg·m²/(s³·A). Signatures confirm that two
//! units describe the same physical dimension independent of scale factor,
//! and they combine algebraically under multiplication and division.
//!
//! The compact text form concatenates symbols with their exponents, with a
//! single `/` separating positive from negative exponents: `"kgm/s2"`,
//! `"kgm2/s3A"`, `"1/s"`, and `"1"` for a dimensionless signature.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Exponents over the nine SI base and supplementary dimensions.
///
/// Construct signatures with struct-update syntax:
///
/// ```
/// use typed_quantities::units::SiDimensions;
///
/// const FORCE: SiDimensions = SiDimensions { kg: 1, m: 1, s: -2, ..SiDimensions::NONE };
/// assert_eq!(FORCE.to_string(), "kgm/s2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SiDimensions {
    /// Angle (radian) exponent.
    pub rad: i8,
    /// Solid angle (steradian) exponent.
    pub sr: i8,
    /// Mass (kilogram) exponent.
    pub kg: i8,
    /// Length (meter) exponent.
    pub m: i8,
    /// Time (second) exponent.
    pub s: i8,
    /// Electric current (ampere) exponent.
    pub a: i8,
    /// Thermodynamic temperature (kelvin) exponent.
    pub k: i8,
    /// Amount of substance (mole) exponent.
    pub mol: i8,
    /// Luminous intensity (candela) exponent.
    pub cd: i8,
}

/// Accessor used by the parser to map a symbol onto its exponent slot.
type Slot = fn(&mut SiDimensions) -> &mut i8;

/// Symbol table in longest-prefix-first order so that `sr` is not read as
/// `s`, nor `mol` as `m`.
const SYMBOLS: [(&str, Slot); 9] = [
    ("rad", |d| &mut d.rad),
    ("sr", |d| &mut d.sr),
    ("mol", |d| &mut d.mol),
    ("kg", |d| &mut d.kg),
    ("cd", |d| &mut d.cd),
    ("m", |d| &mut d.m),
    ("s", |d| &mut d.s),
    ("A", |d| &mut d.a),
    ("K", |d| &mut d.k),
];

impl SiDimensions {
    /// The dimensionless signature (all exponents zero).
    pub const NONE: SiDimensions = SiDimensions {
        rad: 0,
        sr: 0,
        kg: 0,
        m: 0,
        s: 0,
        a: 0,
        k: 0,
        mol: 0,
        cd: 0,
    };

    /// Signature of a product of quantities: exponents add.
    #[must_use]
    pub const fn multiply(self, rhs: SiDimensions) -> SiDimensions {
        SiDimensions {
            rad: self.rad + rhs.rad,
            sr: self.sr + rhs.sr,
            kg: self.kg + rhs.kg,
            m: self.m + rhs.m,
            s: self.s + rhs.s,
            a: self.a + rhs.a,
            k: self.k + rhs.k,
            mol: self.mol + rhs.mol,
            cd: self.cd + rhs.cd,
        }
    }

    /// Signature of a quotient of quantities: exponents subtract.
    #[must_use]
    pub const fn divide(self, rhs: SiDimensions) -> SiDimensions {
        self.multiply(rhs.reciprocal())
    }

    /// Signature of the reciprocal quantity: exponents negate.
    #[must_use]
    pub const fn reciprocal(self) -> SiDimensions {
        SiDimensions {
            rad: -self.rad,
            sr: -self.sr,
            kg: -self.kg,
            m: -self.m,
            s: -self.s,
            a: -self.a,
            k: -self.k,
            mol: -self.mol,
            cd: -self.cd,
        }
    }

    /// Signature of the quantity raised to an integer power.
    #[must_use]
    pub const fn powi(self, exp: i8) -> SiDimensions {
        SiDimensions {
            rad: self.rad * exp,
            sr: self.sr * exp,
            kg: self.kg * exp,
            m: self.m * exp,
            s: self.s * exp,
            a: self.a * exp,
            k: self.k * exp,
            mol: self.mol * exp,
            cd: self.cd * exp,
        }
    }

    /// Const-context equality; the derived `==` is not const-callable.
    #[must_use]
    pub const fn same(self, other: SiDimensions) -> bool {
        self.rad == other.rad
            && self.sr == other.sr
            && self.kg == other.kg
            && self.m == other.m
            && self.s == other.s
            && self.a == other.a
            && self.k == other.k
            && self.mol == other.mol
            && self.cd == other.cd
    }

    /// True when every exponent is zero.
    #[must_use]
    pub const fn is_dimensionless(self) -> bool {
        self.rad == 0
            && self.sr == 0
            && self.kg == 0
            && self.m == 0
            && self.s == 0
            && self.a == 0
            && self.k == 0
            && self.mol == 0
            && self.cd == 0
    }
}

impl fmt::Display for SiDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("rad", self.rad),
            ("sr", self.sr),
            ("kg", self.kg),
            ("m", self.m),
            ("s", self.s),
            ("A", self.a),
            ("K", self.k),
            ("mol", self.mol),
            ("cd", self.cd),
        ];
        let mut numerator = String::new();
        let mut denominator = String::new();
        for (symbol, exp) in parts {
            if exp > 0 {
                numerator.push_str(symbol);
                if exp > 1 {
                    numerator.push_str(&exp.to_string());
                }
            } else if exp < 0 {
                denominator.push_str(symbol);
                if exp < -1 {
                    denominator.push_str(&(-exp).to_string());
                }
            }
        }
        match (numerator.is_empty(), denominator.is_empty()) {
            (true, true) => f.write_str("1"),
            (false, true) => f.write_str(&numerator),
            (true, false) => write!(f, "1/{denominator}"),
            (false, false) => write!(f, "{numerator}/{denominator}"),
        }
    }
}

impl FromStr for SiDimensions {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, ValueError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "1" {
            return Ok(SiDimensions::NONE);
        }
        if trimmed.matches('/').count() > 1 {
            return Err(ValueError::Construction(format!(
                "more than one '/' in SI signature '{trimmed}'"
            )));
        }
        let (numerator, denominator) = match trimmed.split_once('/') {
            Some((n, d)) => (n, Some(d)),
            None => (trimmed, None),
        };
        let mut dims = SiDimensions::NONE;
        parse_side(numerator, 1, &mut dims)?;
        if let Some(den) = denominator {
            parse_side(den, -1, &mut dims)?;
        }
        Ok(dims)
    }
}

/// Parse one side of the `/` into `dims`, with `sign` +1 for the numerator
/// and -1 for the denominator. Accepts optional `.` separators between
/// symbols ("kg.m/s2" and "kgm/s2" are the same signature).
fn parse_side(side: &str, sign: i8, dims: &mut SiDimensions) -> Result<(), ValueError> {
    let mut rest = side;
    if sign > 0 && rest == "1" {
        return Ok(());
    }
    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('.') {
            rest = stripped;
            continue;
        }
        let Some((symbol, slot)) = SYMBOLS.iter().find(|(sym, _)| rest.starts_with(sym)) else {
            return Err(ValueError::Construction(format!(
                "unrecognized SI symbol at '{rest}' in '{side}'"
            )));
        };
        rest = &rest[symbol.len()..];
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        let exp: i8 = if digits == 0 {
            1
        } else {
            rest[..digits].parse().map_err(|_| {
                ValueError::Construction(format!("exponent out of range in '{side}'"))
            })?
        };
        rest = &rest[digits..];
        let slot = slot(dims);
        *slot = slot.checked_add(sign * exp).ok_or_else(|| {
            ValueError::Construction(format!("exponent overflow in '{side}'"))
        })?;
    }
    Ok(())
}
