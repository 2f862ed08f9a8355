//! Pattern-driven parsing of numeric text whose thousands and decimal
//! separators vary from cell to cell.

use regex::Regex;
use std::sync::OnceLock;

static DOT_GROUPED: OnceLock<Regex> = OnceLock::new();
static COMMA_GROUPED: OnceLock<Regex> = OnceLock::new();

fn dot_grouped() -> &'static Regex {
    DOT_GROUPED.get_or_init(|| Regex::new(r"^\d{1,3}(\.\d{3})+$").expect("valid dot pattern"))
}

fn comma_grouped() -> &'static Regex {
    COMMA_GROUPED.get_or_init(|| Regex::new(r"^\d{1,3}(,\d{3})+$").expect("valid comma pattern"))
}

/// Parses one cell. `None` marks a value that could not be read; callers
/// decide whether it counts as zero.
///
/// - both `.` and `,` present: `.` groups thousands, `,` is the decimal mark
/// - only `.`: removed when it groups by three (`1.234.567`), else a decimal point
/// - only `,`: removed when it groups by three (`1,234,567`), else a decimal mark
pub fn parse_number(raw: &str) -> Option<f64> {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let has_dot = stripped.contains('.');
    let has_comma = stripped.contains(',');

    let cleaned = match (has_dot, has_comma) {
        (true, true) => stripped.replace('.', "").replace(',', "."),
        (true, false) if dot_grouped().is_match(&stripped) => stripped.replace('.', ""),
        (false, true) if comma_grouped().is_match(&stripped) => stripped.replace(',', ""),
        (false, true) => stripped.replace(',', "."),
        _ => stripped,
    };

    cleaned.parse::<f64>().ok()
}

/// Parses a column, preserving its length.
pub fn parse_column<S: AsRef<str>>(values: &[S]) -> Vec<Option<f64>> {
    values.iter().map(|value| parse_number(value.as_ref())).collect()
}

/// Parses a cell with the missing-as-zero policy applied before arithmetic.
pub fn number_or_zero(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_separators_use_comma_as_decimal() {
        assert_eq!(parse_number("1.234.567,89"), Some(1_234_567.89));
        assert_eq!(parse_number("1.234,56"), Some(1234.56));
    }

    #[test]
    fn grouped_dots_are_thousands() {
        assert_eq!(parse_number("1.234.567"), Some(1_234_567.0));
        assert_eq!(parse_number("900.000"), Some(900_000.0));
    }

    #[test]
    fn lone_decimal_dot_is_kept() {
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number("0.35"), Some(0.35));
    }

    #[test]
    fn commas_group_or_mark_decimals() {
        assert_eq!(parse_number("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_number("123,45"), Some(123.45));
        assert_eq!(parse_number("0,7"), Some(0.7));
    }

    #[test]
    fn currency_symbols_and_spaces_are_ignored() {
        assert_eq!(parse_number("$ 1.234.567"), Some(1_234_567.0));
        assert_eq!(parse_number(" COP 450.000 "), Some(450_000.0));
        assert_eq!(parse_number("-12,5"), Some(-12.5));
    }

    #[test]
    fn garbage_is_missing_and_zero_downstream() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("1,2,3"), None);
        assert_eq!(number_or_zero("sin dato"), 0.0);
    }

    #[test]
    fn parse_column_keeps_length() {
        let parsed = parse_column(&["10", "", "2,5"]);
        assert_eq!(parsed, vec![Some(10.0), None, Some(2.5)]);
    }
}
