//! Presentation helpers: whole-dollar currency, one-decimal percentages and
//! the lenient text parser used at the form boundary.
//!
//! The numeric engine never calls into this module; results are formatted
//! only when they are shown.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, Rate};

/// Render an amount as US currency with no cents, e.g. `125000` -> `$125,000`.
///
/// Halves round away from zero. Negative amounts render as `-$5,000`.
pub fn format_currency(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let digits = rounded.abs().trunc().to_string();
    format!("{sign}${}", group_thousands(&digits))
}

/// Same as [`format_currency`] for raw floats. NaN and infinities render as `$0`.
pub fn format_currency_f64(amount: f64) -> String {
    if !amount.is_finite() {
        return format_currency(Decimal::ZERO);
    }
    format_currency(Decimal::from_f64(amount).unwrap_or(Decimal::ZERO))
}

/// Render a value that is already a percentage, e.g. `81.5` -> `81.5%`.
pub fn format_percent(value: Percent) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", rounded)
}

/// Render a fraction as a percentage, e.g. `0.815` -> `81.5%`. Values past
/// the decimal range saturate.
pub fn format_rate_percent(rate: Rate) -> String {
    format_percent(rate.saturating_mul(dec!(100)))
}

/// Price-per-square-foot display: two decimals, no grouping (`$123.45`).
pub fn format_per_sqft(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${:.2}", rounded)
}

/// Parse user-entered text into an amount.
///
/// Currency symbols, thousands separators and whitespace are ignored and the
/// longest leading numeric prefix is used (`"12.5k"` -> `12.5`). Anything
/// without a numeric prefix yields zero; this never fails.
pub fn parse_amount(text: &str) -> Money {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();

    let prefix = numeric_prefix(&cleaned);
    prefix.parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    let prefix = s[..end].trim_end_matches('.');
    match prefix {
        "" | "-" | "+" => "",
        p => p,
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
