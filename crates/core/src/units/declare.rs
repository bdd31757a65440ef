//! Declarative stamping of unit families and their legal combinations.
//!
//! [`unit_family!`](crate::unit_family) turns one table row per unit into a
//! complete family type: the struct, its built-in `const` units (first
//! listed = standard), the [`Unit`](crate::units::Unit) impl with hashed
//! abbreviation lookup, `Display`, serde as-abbreviation round-trip, and —
//! for relative families — the dimensionless interoperability rules.
//!
//! [`quantity_ops!`](crate::quantity_ops) turns one line per legal
//! cross-family product or quotient into the corresponding
//! [`UnitTimes`](crate::units::UnitTimes) /
//! [`UnitDivide`](crate::units::UnitDivide) impl, together with a
//! compile-time check that the result family's SI signature equals the
//! algebraic combination of the operands' signatures.

/// Declare a unit family from a declarative table.
///
/// Relative form:
///
/// ```ignore
/// unit_family! {
///     /// Units of length. Standard unit: meter.
///     pub struct LengthUnit {
///         si: SiDimensions { m: 1, ..SiDimensions::NONE },
///         units: {
///             METER = ("m", "meter", SiBase, 1.0);
///             KILOMETER = ("km", "kilometer", SiAccepted, 1000.0);
///         }
///     }
/// }
/// ```
///
/// Absolute form adds the paired relative family and a per-unit offset and
/// relative counterpart:
///
/// ```ignore
/// unit_family! {
///     /// Positions along an axis. Standard unit: meter.
///     pub struct absolute PositionUnit(relative = LengthUnit) {
///         si: SiDimensions { m: 1, ..SiDimensions::NONE },
///         units: {
///             METER = ("m", "meter", SiBase, 1.0, offset 0.0, rel LengthUnit::METER);
///         }
///     }
/// }
/// ```
///
/// The first listed unit becomes the family standard and must carry factor
/// 1 and offset 0.
#[macro_export]
macro_rules! unit_family {
    // Pick the first listed unit as the family standard.
    (@first $family:ident, $head:ident $(, $tail:ident)*) => {
        $family::$head
    };

    // Shared Unit impl, Display, and serde: field `def` is assumed.
    (@unit_impl $family:ident, $si:expr, $($uname:ident),+) => {
        impl $crate::units::Unit for $family {
            const SI: $crate::units::SiDimensions = $si;
            const STANDARD: $family = $crate::unit_family!(@first $family, $($uname),+);
            const BUILT_IN: &'static [$family] = &[$($family::$uname),+];

            #[inline]
            fn scale(self) -> $crate::units::LinearScale {
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
            fn system(self) -> $crate::units::UnitSystem {
                self.def.system()
            }

            fn by_abbreviation(abbreviation: &str) -> ::std::option::Option<Self> {
                static LOOKUP: ::std::sync::OnceLock<
                    $crate::__support::FxHashMap<&'static str, $family>,
                > = ::std::sync::OnceLock::new();
                let map = LOOKUP.get_or_init(|| {
                    <$family as $crate::units::Unit>::BUILT_IN
                        .iter()
                        .map(|unit| (unit.def.abbreviation(), *unit))
                        .collect()
                });
                map.get(abbreviation).copied()
            }
        }

        impl ::std::fmt::Display for $family {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.def.abbreviation())
            }
        }

        impl $crate::__support::serde::Serialize for $family {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__support::serde::Serializer,
            {
                serializer.serialize_str(self.def.abbreviation())
            }
        }

        impl<'de> $crate::__support::serde::Deserialize<'de> for $family {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__support::serde::Deserializer<'de>,
            {
                let text = <::std::string::String as $crate::__support::serde::Deserialize>::
                    deserialize(deserializer)?;
                <$family as $crate::units::Unit>::by_abbreviation(&text).ok_or_else(|| {
                    <D::Error as $crate::__support::serde::de::Error>::custom(::std::format!(
                        "unknown {} abbreviation '{}'",
                        ::std::stringify!($family),
                        text
                    ))
                })
            }
        }
    };

    // Relative family.
    (
        $(#[$meta:meta])*
        pub struct $family:ident {
            si: $si:expr,
            units: {
                $(
                    $(#[$umeta:meta])*
                    $uname:ident = ($abbr:literal, $name:literal, $system:ident, $factor:expr);
                )+
            }
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $family {
            def: $crate::units::UnitDef,
        }

        impl $family {
            $(
                $(#[$umeta])*
                pub const $uname: $family = $family {
                    def: $crate::units::UnitDef::new(
                        $abbr,
                        $name,
                        $crate::units::UnitSystem::$system,
                        $factor,
                    ),
                };
            )+

            /// Define a new unit of this family from an existing one;
            /// `factor` converts the new unit to `reference`.
            #[must_use]
            pub fn derive_linear(
                reference: $family,
                factor: f64,
                abbreviation: &'static str,
                name: &'static str,
            ) -> $family {
                $family {
                    def: $crate::units::UnitDef::new(
                        abbreviation,
                        name,
                        $crate::units::UnitSystem::Other,
                        factor * <$family as $crate::units::Unit>::scale(reference).factor(),
                    ),
                }
            }

            /// Define a new unit of this family by composing constituent
            /// units of other families raised to integer powers.
            ///
            /// # Errors
            /// Returns `ValueError::DimensionalIncompatibility` when the
            /// combined SI signature of the constituents does not match
            /// this family's signature.
            pub fn compound(
                abbreviation: &'static str,
                name: &'static str,
                parts: &[$crate::units::Constituent],
            ) -> ::std::result::Result<$family, $crate::error::ValueError> {
                let scale =
                    $crate::units::compose(<$family as $crate::units::Unit>::SI, parts)?;
                Ok($family {
                    def: $crate::units::UnitDef::new(
                        abbreviation,
                        name,
                        $crate::units::UnitSystem::Other,
                        scale.factor(),
                    ),
                })
            }
        }

        $crate::unit_family!(@unit_impl $family, $si, $($uname),+);

        impl $crate::units::UnitTimes<$crate::units::catalog::DimensionlessUnit> for $family {
            type Output = $family;
        }

        impl $crate::units::UnitDivide<$crate::units::catalog::DimensionlessUnit> for $family {
            type Output = $family;
        }

        impl $crate::units::UnitDivide<$family> for $family {
            type Output = $crate::units::catalog::DimensionlessUnit;
        }
    };

    // Absolute family, paired with its relative counterpart.
    (
        $(#[$meta:meta])*
        pub struct absolute $family:ident (relative = $rel:ident) {
            si: $si:expr,
            units: {
                $(
                    $(#[$umeta:meta])*
                    $uname:ident = (
                        $abbr:literal,
                        $name:literal,
                        $system:ident,
                        $factor:expr,
                        offset $offset:expr,
                        rel $relunit:expr
                    );
                )+
            }
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $family {
            def: $crate::units::UnitDef,
            relative: $rel,
        }

        impl $family {
            $(
                $(#[$umeta])*
                pub const $uname: $family = $family {
                    def: $crate::units::UnitDef::with_offset(
                        $abbr,
                        $name,
                        $crate::units::UnitSystem::$system,
                        $factor,
                        $offset,
                    ),
                    relative: $relunit,
                };
            )+

            /// Define a new absolute unit with an explicit origin offset
            /// and paired relative counterpart.
            #[must_use]
            pub fn derive_offset(
                factor: f64,
                offset: f64,
                abbreviation: &'static str,
                name: &'static str,
                relative: $rel,
            ) -> $family {
                $family {
                    def: $crate::units::UnitDef::with_offset(
                        abbreviation,
                        name,
                        $crate::units::UnitSystem::Other,
                        factor,
                        offset,
                    ),
                    relative,
                }
            }
        }

        $crate::unit_family!(@unit_impl $family, $si, $($uname),+);

        impl $crate::units::AbsoluteUnit for $family {
            type Relative = $rel;

            #[inline]
            fn relative(self) -> $rel {
                self.relative
            }
        }
    };
}

/// Declare the legal cross-family products and quotients.
///
/// Each line `A * B => C;` (or `A / B => C;`) stamps the corresponding
/// [`UnitTimes`](crate::units::UnitTimes) or
/// [`UnitDivide`](crate::units::UnitDivide) impl and a compile-time
/// assertion that C's SI signature is the algebraic combination of A's and
/// B's. Products are not auto-commuted; list both directions when both are
/// wanted.
#[macro_export]
macro_rules! quantity_ops {
    () => {};
    ($lhs:ident * $rhs:ident => $out:ident; $($rest:tt)*) => {
        impl $crate::units::UnitTimes<$rhs> for $lhs {
            type Output = $out;
        }
        const _: () = assert!(
            <$lhs as $crate::units::Unit>::SI
                .multiply(<$rhs as $crate::units::Unit>::SI)
                .same(<$out as $crate::units::Unit>::SI),
            "product family has wrong SI signature"
        );
        $crate::quantity_ops!($($rest)*);
    };
    ($lhs:ident / $rhs:ident => $out:ident; $($rest:tt)*) => {
        impl $crate::units::UnitDivide<$rhs> for $lhs {
            type Output = $out;
        }
        const _: () = assert!(
            <$lhs as $crate::units::Unit>::SI
                .divide(<$rhs as $crate::units::Unit>::SI)
                .same(<$out as $crate::units::Unit>::SI),
            "quotient family has wrong SI signature"
        );
        $crate::quantity_ops!($($rest)*);
    };
}
