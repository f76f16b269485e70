use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DealError;
use crate::DealResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.70 = 70%). Never as percentages.
pub type Rate = Decimal;

/// Percentages already multiplied by 100 (12.5 = 12.5%).
pub type Percent = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Clamp a lenient input to zero, recording a warning when it was negative.
pub(crate) fn non_negative(field: &str, value: Money, warnings: &mut Vec<String>) -> Money {
    if value < Decimal::ZERO {
        warnings.push(format!("{field} was negative ({value}); treated as 0"));
        Decimal::ZERO
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Overflow-checked arithmetic
// ---------------------------------------------------------------------------
//
// Each returns `InvalidInput` naming `field` when the result leaves the
// decimal range.

pub(crate) fn add(a: Decimal, b: Decimal, field: &str) -> DealResult<Decimal> {
    a.checked_add(b).ok_or_else(|| DealError::out_of_range(field))
}

pub(crate) fn sub(a: Decimal, b: Decimal, field: &str) -> DealResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| DealError::out_of_range(field))
}

pub(crate) fn mul(a: Decimal, b: Decimal, field: &str) -> DealResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| DealError::out_of_range(field))
}

/// Callers guard against a zero divisor; `None` from `checked_div` here
/// means overflow.
pub(crate) fn div(a: Decimal, b: Decimal, field: &str) -> DealResult<Decimal> {
    a.checked_div(b).ok_or_else(|| DealError::out_of_range(field))
}

/// Sum of `(field, value)` terms, failing on the first term that overflows.
pub(crate) fn sum<'a>(terms: impl IntoIterator<Item = (&'a str, Decimal)>) -> DealResult<Decimal> {
    terms
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (field, value)| add(acc, value, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checked_helpers_report_field() {
        assert_eq!(mul(dec!(2), dec!(3), "x").unwrap(), dec!(6));
        let err = mul(Decimal::MAX, dec!(2), "hvac_units").unwrap_err();
        assert!(err.to_string().contains("hvac_units"));
        assert!(div(Decimal::MAX, dec!(0.0001), "square_footage").is_err());
        assert!(add(Decimal::MAX, Decimal::ONE, "a").is_err());
        assert!(sub(Decimal::MIN, Decimal::ONE, "b").is_err());
    }

    #[test]
    fn test_sum_stops_on_overflow() {
        assert_eq!(sum([("a", dec!(1)), ("b", dec!(2))]).unwrap(), dec!(3));
        let err = sum([("a", Decimal::MAX), ("b", Decimal::MAX)]).unwrap_err();
        assert!(matches!(err, DealError::InvalidInput { ref field, .. } if field == "b"));
    }

    #[test]
    fn test_non_negative_clamps_with_warning() {
        let mut warnings = Vec::new();
        assert_eq!(non_negative("repairs", dec!(-5), &mut warnings), Decimal::ZERO);
        assert_eq!(non_negative("repairs", dec!(5), &mut warnings), dec!(5));
        assert_eq!(warnings.len(), 1);
    }
}
