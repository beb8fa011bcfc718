//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts travel as `f64` on the wire. Sums and comparisons are done in
//! `Decimal` and converted back to `f64` once, at the edge.

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert back to `f64`, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Parse an amount typed by the cashier.
///
/// Accepts a leading `$` and Chilean separators: `1.234.567` is grouped
/// thousands and `1.234,5` uses a decimal comma. A lone `.` followed by
/// anything other than groups of three digits is a decimal point
/// (`250.5`). Blank or unparseable input is zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let text = raw.trim().trim_start_matches('$').trim();
    let normalized = if text.contains(',') {
        text.replace('.', "").replace(',', ".")
    } else if is_grouped(text) {
        text.replace('.', "")
    } else {
        text.to_string()
    };
    normalized.parse::<Decimal>().unwrap_or_default()
}

/// `1.000`, `-12.345.678`: a 1-3 digit head followed by dot-separated
/// groups of exactly three digits
fn is_grouped(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let mut groups = digits.split('.');
    let head = groups.next().unwrap_or_default();
    let tail: Vec<&str> = groups.collect();

    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    !tail.is_empty()
        && all_digits(head)
        && head.len() <= 3
        && !head.starts_with('0')
        && tail.iter().all(|g| g.len() == 3 && all_digits(g))
}
