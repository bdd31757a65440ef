//! Fixed-width number formatting shared by the textual dump methods.

/// Width of one formatted cell in a dump.
pub const WIDTH: usize = 10;

/// Digits after the decimal point in a dump cell.
pub const PRECISION: usize = 3;

/// Format a magnitude into a fixed-width cell.
///
/// Values whose absolute value falls outside `[1e-3, 1e7)` switch to
/// scientific notation so the cell width stays readable; zero, NaN and the
/// infinities print in plain form.
#[must_use]
pub fn format_f64(value: f64) -> String {
    if value.is_finite() && value != 0.0 {
        let magnitude = value.abs();
        if !(1e-3..1e7).contains(&magnitude) {
            return format!("{value:>w$.p$e}", w = WIDTH, p = PRECISION);
        }
    }
    format!("{value:>w$.p$}", w = WIDTH, p = PRECISION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_range_uses_fixed_point() {
        assert_eq!(format_f64(1.5), "     1.500");
        assert_eq!(format_f64(-273.15), "  -273.150");
        assert_eq!(format_f64(0.0), "     0.000");
    }

    #[test]
    fn test_extreme_values_use_scientific() {
        assert_eq!(format_f64(1.234e9), "   1.234e9");
        assert_eq!(format_f64(-5.0e-7), " -5.000e-7");
    }

    #[test]
    fn test_width_is_at_least_fixed() {
        for v in [0.0, 1.0, -1.0, 123_456.789, 1e-9, f64::NAN] {
            assert!(format_f64(v).len() >= WIDTH);
        }
    }
}
