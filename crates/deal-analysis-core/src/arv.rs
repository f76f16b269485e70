//! After-repair value from comparable sales.
//!
//! Two independent estimates are produced, the simple average of sale
//! prices and a price-per-square-foot extrapolation onto the subject
//! property, and the lower of the two is recommended.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DealError;
use crate::types::{mul, with_metadata, ComputationOutput, Money};
use crate::DealResult;

/// Number of comparables the calculator aggregates.
pub const MAX_COMPARABLES: usize = 3;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A recently sold property used as evidence for ARV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparableSale {
    #[serde(default)]
    pub price: Money,
    /// Living area; zero when unknown.
    #[serde(default)]
    pub square_footage: Decimal,
}

impl ComparableSale {
    pub fn new(price: Money, square_footage: Decimal) -> Self {
        Self {
            price,
            square_footage,
        }
    }

    /// `None` when either figure is missing or the quotient overflows.
    fn price_per_sqft(&self) -> Option<Money> {
        if self.price > Decimal::ZERO && self.square_footage > Decimal::ZERO {
            self.price.checked_div(self.square_footage)
        } else {
            None
        }
    }

    fn has_unusable_footage(&self) -> bool {
        self.price > Decimal::ZERO
            && self.square_footage > Decimal::ZERO
            && self.price_per_sqft().is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArvInput {
    pub comparable_sales: Vec<ComparableSale>,
    pub subject_sqft: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArvEstimate {
    /// Mean of the valid sale prices
    pub average_value: Money,
    /// Mean price per square foot across comps with footage
    pub price_per_sqft: Money,
    /// Price per square foot of each comparable, zero where not computable
    pub comparable_price_per_sqft: Vec<Money>,
    /// Subject square footage x average price per square foot
    pub sqft_based_value: Money,
    /// Conservative pick between the two methods
    pub recommended_value: Money,
}

impl ArvEstimate {
    pub fn zeroed() -> Self {
        Self {
            average_value: Decimal::ZERO,
            price_per_sqft: Decimal::ZERO,
            comparable_price_per_sqft: Vec::new(),
            sqft_based_value: Decimal::ZERO,
            recommended_value: Decimal::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Mean price of the sales with a positive price; zero if none qualify.
pub fn average_of(sales: &[ComparableSale]) -> Money {
    mean(sales.iter().map(|s| s.price).filter(|p| *p > Decimal::ZERO))
}

/// Mean of price / footage over sales where both are positive; zero if none.
/// A sale whose ratio overflows is left out.
pub fn price_per_sqft(sales: &[ComparableSale]) -> Money {
    mean(sales.iter().filter_map(ComparableSale::price_per_sqft))
}

pub fn comparable_price_per_sqft(sales: &[ComparableSale]) -> Vec<Money> {
    sales
        .iter()
        .map(|s| s.price_per_sqft().unwrap_or(Decimal::ZERO))
        .collect()
}

pub fn sqft_based_value(subject_sqft: Decimal, avg_price_per_sqft: Money) -> DealResult<Money> {
    if subject_sqft > Decimal::ZERO && avg_price_per_sqft > Decimal::ZERO {
        mul(subject_sqft, avg_price_per_sqft, "subject_sqft")
    } else {
        Ok(Decimal::ZERO)
    }
}

/// Lower of the two estimates when both exist, otherwise whichever is
/// positive, otherwise zero.
pub fn recommended_arv(average_arv: Money, sqft_arv: Money) -> Money {
    let avg_ok = average_arv > Decimal::ZERO;
    let sqft_ok = sqft_arv > Decimal::ZERO;
    match (avg_ok, sqft_ok) {
        (true, true) => average_arv.min(sqft_arv),
        (true, false) => average_arv,
        (false, true) => sqft_arv,
        (false, false) => Decimal::ZERO,
    }
}

pub fn estimate_arv(sales: &[ComparableSale], subject_sqft: Decimal) -> DealResult<ArvEstimate> {
    let average_value = average_of(sales);
    let per_sqft = price_per_sqft(sales);
    let sqft_value = sqft_based_value(subject_sqft, per_sqft)?;

    Ok(ArvEstimate {
        average_value,
        price_per_sqft: per_sqft,
        comparable_price_per_sqft: comparable_price_per_sqft(sales),
        sqft_based_value: sqft_value,
        recommended_value: recommended_arv(average_value, sqft_value),
    })
}

/// Advisory notes on the comparables actually used.
pub(crate) fn comparable_warnings(sales: &[ComparableSale]) -> Vec<String> {
    let mut warnings = Vec::new();
    for (i, sale) in sales.iter().enumerate() {
        if sale.price > Decimal::ZERO && sale.square_footage <= Decimal::ZERO {
            warnings.push(format!(
                "Comparable {} has no square footage; excluded from price per sqft",
                i + 1
            ));
        } else if sale.has_unusable_footage() {
            warnings.push(format!(
                "Comparable {} price per sqft is out of range; excluded from price per sqft",
                i + 1
            ));
        }
    }
    warnings
}

/// Standalone ARV calculation with validation and warnings.
pub fn analyze_arv(input: &ArvInput) -> DealResult<ComputationOutput<ArvEstimate>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let sales = &input.comparable_sales;
    if sales.len() > MAX_COMPARABLES {
        warnings.push(format!(
            "{} comparable sales supplied; only the first {MAX_COMPARABLES} are used",
            sales.len()
        ));
    }
    let sales = &sales[..sales.len().min(MAX_COMPARABLES)];

    if !sales.iter().any(|s| s.price > Decimal::ZERO) {
        return Err(DealError::InsufficientData(
            "At least one comparable sale with a positive price is required".into(),
        ));
    }
    warnings.extend(comparable_warnings(sales));
    if input.subject_sqft <= Decimal::ZERO {
        warnings.push("Subject square footage not set; sqft-based ARV unavailable".into());
    }

    let estimate = estimate_arv(sales, input.subject_sqft)?;

    let avg = estimate.average_value;
    let sqft = estimate.sqft_based_value;
    if avg > Decimal::ZERO && sqft > Decimal::ZERO {
        let gap = (avg - sqft).abs() / avg.max(sqft);
        if gap > rust_decimal_macros::dec!(0.20) {
            warnings.push(format!(
                "Average and sqft-based ARV differ by more than 20% ({avg} vs {sqft}); check comparables"
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "After-Repair Value (comparable average vs price per sqft, lower of two)",
        input,
        warnings,
        elapsed,
        estimate,
    ))
}

/// Arithmetic mean of non-negative values, zero for an empty set. When the
/// plain sum would overflow, each value is scaled by 1/n before summing.
fn mean(values: impl Iterator<Item = Decimal>) -> Decimal {
    let values: Vec<Decimal> = values.collect();
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let count = Decimal::from(values.len());
    match values.iter().try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v)) {
        Some(total) => total / count,
        None => values
            .iter()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v / count)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn comps() -> Vec<ComparableSale> {
        vec![
            ComparableSale::new(dec!(240000), dec!(1600)),
            ComparableSale::new(dec!(260000), dec!(2000)),
            ComparableSale::new(dec!(250000), dec!(1250)),
        ]
    }

    #[test]
    fn test_average_of_all_valid() {
        assert_eq!(average_of(&comps()), dec!(250000));
    }

    #[test]
    fn test_average_ignores_non_positive_prices() {
        let sales = vec![
            ComparableSale::new(dec!(200000), Decimal::ZERO),
            ComparableSale::new(dec!(0), dec!(1500)),
            ComparableSale::new(dec!(-5000), dec!(1500)),
        ];
        // Only one positive price, so the divisor is one
        assert_eq!(average_of(&sales), dec!(200000));
    }

    #[test]
    fn test_average_none_valid_is_zero() {
        let sales = vec![ComparableSale::default(); 3];
        assert_eq!(average_of(&sales), Decimal::ZERO);
        assert_eq!(average_of(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_price_per_sqft() {
        // 150, 130, 200 -> mean 160
        assert_eq!(price_per_sqft(&comps()), dec!(160));
        assert_eq!(
            comparable_price_per_sqft(&comps()),
            vec![dec!(150), dec!(130), dec!(200)]
        );
    }

    #[test]
    fn test_price_per_sqft_skips_missing_footage() {
        let sales = vec![
            ComparableSale::new(dec!(300000), dec!(2000)),
            ComparableSale::new(dec!(280000), Decimal::ZERO),
        ];
        assert_eq!(price_per_sqft(&sales), dec!(150));
        assert_eq!(
            comparable_price_per_sqft(&sales),
            vec![dec!(150), Decimal::ZERO]
        );
        // The footage-less sale still counts toward the simple average
        assert_eq!(average_of(&sales), dec!(290000));
    }

    #[test]
    fn test_sqft_based_value_requires_both() {
        assert_eq!(sqft_based_value(dec!(1500), dec!(160)).unwrap(), dec!(240000));
        assert_eq!(sqft_based_value(Decimal::ZERO, dec!(160)).unwrap(), Decimal::ZERO);
        assert_eq!(sqft_based_value(dec!(1500), Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_recommended_arv_rules() {
        assert_eq!(recommended_arv(dec!(250000), dec!(240000)), dec!(240000));
        assert_eq!(recommended_arv(dec!(230000), dec!(240000)), dec!(230000));
        assert_eq!(recommended_arv(dec!(250000), Decimal::ZERO), dec!(250000));
        assert_eq!(recommended_arv(Decimal::ZERO, dec!(240000)), dec!(240000));
        assert_eq!(recommended_arv(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_estimate_arv_conservative() {
        let est = estimate_arv(&comps(), dec!(1500)).unwrap();
        assert_eq!(est.average_value, dec!(250000));
        assert_eq!(est.price_per_sqft, dec!(160));
        assert_eq!(est.sqft_based_value, dec!(240000));
        assert_eq!(est.recommended_value, dec!(240000));
    }

    #[test]
    fn test_analyze_arv_requires_a_priced_comp() {
        let input = ArvInput {
            comparable_sales: vec![ComparableSale::default()],
            subject_sqft: dec!(1500),
        };
        assert!(matches!(
            analyze_arv(&input),
            Err(DealError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_analyze_arv_warnings() {
        let input = ArvInput {
            comparable_sales: vec![
                ComparableSale::new(dec!(200000), Decimal::ZERO),
                ComparableSale::new(dec!(210000), dec!(1400)),
            ],
            subject_sqft: Decimal::ZERO,
        };
        let out = analyze_arv(&input).unwrap();
        assert_eq!(out.result.recommended_value, dec!(205000));
        assert!(out.warnings.iter().any(|w| w.contains("Comparable 1")));
        assert!(out.warnings.iter().any(|w| w.contains("Subject square footage")));
    }

    #[test]
    fn test_estimate_arv_without_subject_sqft() {
        let est = estimate_arv(&comps(), Decimal::ZERO).unwrap();
        assert_eq!(est.sqft_based_value, Decimal::ZERO);
        assert_eq!(est.recommended_value, dec!(250000));
    }

    #[test]
    fn test_overflowing_price_per_sqft_skips_the_comparable() {
        let sales = vec![
            ComparableSale::new(Decimal::MAX, dec!(0.0001)),
            ComparableSale::new(dec!(240000), dec!(1600)),
        ];
        assert_eq!(price_per_sqft(&sales), dec!(150));
        assert_eq!(comparable_price_per_sqft(&sales)[0], Decimal::ZERO);
        let warnings = comparable_warnings(&sales);
        assert!(warnings[0].contains("out of range"));
    }

    #[test]
    fn test_mean_of_extreme_prices_does_not_overflow() {
        let sales = vec![
            ComparableSale::new(Decimal::MAX, Decimal::ZERO),
            ComparableSale::new(Decimal::MAX, Decimal::ZERO),
        ];
        let avg = average_of(&sales);
        assert!(avg > Decimal::MAX / dec!(2));
    }

    #[test]
    fn test_sqft_value_overflow_is_an_error() {
        let err = sqft_based_value(Decimal::MAX, dec!(2)).unwrap_err();
        assert!(
            matches!(err, DealError::InvalidInput { ref field, .. } if field == "subject_sqft")
        );

        let input = ArvInput {
            comparable_sales: vec![ComparableSale::new(dec!(1000000), dec!(1))],
            subject_sqft: Decimal::MAX,
        };
        assert!(analyze_arv(&input).is_err());
    }
}
