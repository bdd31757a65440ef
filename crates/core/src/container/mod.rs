//! Typed vector and matrix containers pairing engine data with a unit.
//!
//! Four flavors per rank: relative or absolute, immutable or mutable. An
//! immutable container and the mutable handles derived from it share one
//! `Arc`-backed data buffer. [`RelVector::mutable`] and friends clone the
//! Arc without copying cells; the first cell-level write through a shared
//! mutable handle materializes a private copy (`Arc::make_mut`), and
//! whole-container results replace the Arc, leaving sharers untouched.

pub mod matrix;
pub mod vector;

pub use matrix::{AbsMatrix, MutableAbsMatrix, MutableRelMatrix, RelMatrix};
pub use vector::{AbsVector, MutableAbsVector, MutableRelVector, RelVector};

use crate::units::{AbsoluteUnit, Unit};

/// Result display unit of an additive op between two relative containers:
/// a shared unit is kept, anything else falls back to the family standard.
pub(crate) fn result_unit<U: Unit>(left: U, right: U) -> U {
    if left == right {
        left
    } else {
        U::STANDARD
    }
}

/// Result display unit when an absolute container absorbs a relative one:
/// the absolute unit is kept when its paired relative unit matches the
/// argument's, otherwise the absolute family standard.
pub(crate) fn abs_result_unit<AU: AbsoluteUnit>(abs: AU, rel: AU::Relative) -> AU {
    if abs.relative() == rel {
        abs
    } else {
        AU::STANDARD
    }
}
