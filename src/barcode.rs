//! Barcode normalization.
//!
//! Scanners, spreadsheets and hand entry all produce slightly different text for the
//! same barcode: `4001`, `4001.0`, ` 4001\u{200b}`. [`normalize`] maps them onto one
//! string key so scans can be compared with inventory cells.

/// Characters scanners and spreadsheet exports leave inside otherwise numeric cells.
const INVISIBLE_CHARS: [char; 2] = ['\u{200b}', '\u{00a0}'];

/// Canonical string form of a barcode.
///
/// Numeric input is truncated to its integer part (`"1234.9"` becomes `"1234"`).
/// Anything that does not parse as a finite number falls back to the trimmed input,
/// so this never fails.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let cleaned: String = trimmed.chars().filter(|c| !INVISIBLE_CHARS.contains(c)).collect();
    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => format_truncated(value),
        // Fallback: non-numeric barcodes pass through verbatim
        _ => trimmed.to_string(),
    }
}

fn format_truncated(value: f64) -> String {
    let whole = value.trunc();
    if whole == 0.0 {
        // avoids "-0" for small negative fractions
        return "0".to_string();
    }
    format!("{whole:.0}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_formatted_barcode_is_truncated() {
        assert_eq!(normalize("1234.0"), "1234");
        assert_eq!(normalize("1234.9"), "1234");
    }

    #[test]
    fn test_whitespace_and_invisible_chars_are_stripped() {
        assert_eq!(normalize(" 1234\u{200b}"), "1234");
        assert_eq!(normalize("\u{00a0}4001.0 "), "4001");
        assert_eq!(normalize("40\u{200b}01"), "4001");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_non_numeric_passes_through() {
        assert_eq!(normalize("ABC-1"), "ABC-1");
        assert_eq!(normalize("  ABC-1  "), "ABC-1");
    }

    #[test]
    fn test_non_finite_values_fall_back() {
        assert_eq!(normalize("nan"), "nan");
        assert_eq!(normalize("inf"), "inf");
    }

    #[test]
    fn test_long_ean_keeps_all_digits() {
        assert_eq!(normalize("9300601123456"), "9300601123456");
        assert_eq!(normalize("9300601123456.0"), "9300601123456");
    }

    #[test]
    fn test_exponent_and_sign() {
        assert_eq!(normalize("1e3"), "1000");
        assert_eq!(normalize("-0.5"), "0");
        assert_eq!(normalize("-12.7"), "-12");
    }
}
