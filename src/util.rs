/// Drop everything past the second decimal place.
///
/// Products and sums of decimal operands carry binary representation noise
/// (`0.29 * 100.0 == 28.999999999999996`), so a value sitting within a
/// billionth of a whole number of cents is taken as that number of cents
/// before flooring. Such values may come out a hair above `n`
/// (`truncate2(2.9999999999999996) == 3.0`); everywhere else the result
/// never exceeds `n`.
pub fn truncate2(n: f64) -> f64 {
    let scaled = n * 100.0;
    let nearest = scaled.round();
    if (scaled - nearest).abs() < 1e-9 {
        nearest / 100.0
    } else {
        scaled.floor() / 100.0
    }
}

pub fn round_to(n: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (n * factor).round() / factor
}

/// Parse user-entered numbers, accepting either `.` or `,` as the decimal separator.
/// Returns `None` for empty, malformed or non-finite input.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Render a number the way it is shown to the player: `5` not `5.0`, `2.5` not `2.50`.
pub fn format_number(n: f64) -> String {
    // avoid printing "-0"
    if n == 0.0 {
        return "0".to_string();
    }
    format!("{n}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truncate2_truncates_instead_of_rounding() {
        assert_eq!(truncate2(2.999), 2.99);
        assert_eq!(truncate2(1.005), 1.0);
        assert_eq!(truncate2(7.0), 7.0);
    }

    #[test]
    fn test_truncate2_absorbs_representation_noise() {
        assert_eq!(truncate2(0.29), 0.29);
        assert_eq!(truncate2(0.7 + 0.1), 0.8);
        assert_eq!(truncate2(1.1 * 3.0), 3.3);
        // one ulp below 3 snaps up rather than down to 2.99
        assert_eq!(truncate2(2.9999999999999996), 3.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 1), 3.1);
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(2.25, 0), 2.0);
    }

    #[test]
    fn test_parse_number_accepts_both_separators() {
        assert_eq!(parse_number("2.5"), Some(2.5));
        assert_eq!(parse_number("2,5"), Some(2.5));
        assert_eq!(parse_number(" -7 "), Some(-7.0));
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1.2.3"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.42), "0.42");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-3.0), "-3");
    }

    proptest! {
        #[test]
        fn truncate2_never_rounds_up(n in -1.0e4f64..1.0e4) {
            let scaled = n * 100.0;
            prop_assume!((scaled - scaled.round()).abs() >= 1e-9);
            let t = truncate2(n);
            prop_assert!(t <= n);
            prop_assert!(n - t < 0.01);
        }
    }
}
