//! Offer engine: rapid MAO/LAO, custom-percentage offer and the
//! buyer-focused offer.
//!
//! All three refuse to price a deal without a positive ARV and return
//! `DealError::InvalidInput` instead. Callers that need a value regardless
//! (the composite analysis) substitute the `zeroed()` result.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DealError;
use crate::tiers::{
    find_tier, BUYER_PROFIT_TIERS, CLOSING_COST_RATE, DEFAULT_CUSTOM_PERCENTAGE,
    LAO_FRACTION, MAO_MULTIPLIER_TIERS,
};
use crate::types::{mul, sub, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::DealResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferResult {
    pub arv: Money,
    pub repairs: Money,
    /// ARV - repairs, not clamped
    pub net_value: Money,
    pub multiplier: Rate,
    /// Maximum allowable offer, whole dollars
    pub mao: Money,
    /// Least allowable (opening) offer, whole dollars
    pub lao: Money,
}

impl OfferResult {
    pub fn zeroed() -> Self {
        Self {
            arv: Decimal::ZERO,
            repairs: Decimal::ZERO,
            net_value: Decimal::ZERO,
            multiplier: Decimal::ZERO,
            mao: Decimal::ZERO,
            lao: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomOfferResult {
    /// Percentage of ARV actually applied (after defaulting)
    pub percentage: Percent,
    pub max_offer: Money,
    pub spread: Money,
}

impl CustomOfferResult {
    pub fn zeroed() -> Self {
        Self {
            percentage: Decimal::ZERO,
            max_offer: Decimal::ZERO,
            spread: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerFocusedOfferResult {
    pub closing_costs: Money,
    pub required_buyer_profit: Money,
    /// Unclamped MAO; negative means the deal cannot satisfy the buyer
    pub mao_signed: Money,
    /// Display MAO, never below zero
    pub mao: Money,
    /// Display LAO, never below zero
    pub lao: Money,
}

impl BuyerFocusedOfferResult {
    pub fn zeroed() -> Self {
        Self {
            closing_costs: Decimal::ZERO,
            required_buyer_profit: Decimal::ZERO,
            mao_signed: Decimal::ZERO,
            mao: Decimal::ZERO,
            lao: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferInput {
    pub arv: Money,
    pub repairs: Money,
    /// Zero means the 75% default
    pub custom_percentage: Percent,
}

/// All three offer methods for one ARV / repair pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSet {
    pub offer: OfferResult,
    pub custom_offer: CustomOfferResult,
    pub buyer_focused_offer: BuyerFocusedOfferResult,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// MAO multiplier for the given ARV (boundaries belong to the higher tier).
pub fn tiered_multiplier(arv: Money) -> Rate {
    find_tier(&MAO_MULTIPLIER_TIERS, arv).unwrap_or(MAO_MULTIPLIER_TIERS[0].value)
}

/// Rapid offer: MAO = (ARV - repairs) x tiered multiplier, LAO = MAO x 0.70.
pub fn compute_offer(arv: Money, repairs: Money) -> DealResult<OfferResult> {
    require_positive_arv(arv)?;

    let net_value = sub(arv, repairs, "repairs")?;
    let multiplier = tiered_multiplier(arv);
    let mao = net_value * multiplier;
    let lao = mao * LAO_FRACTION;

    Ok(OfferResult {
        arv,
        repairs,
        net_value,
        multiplier,
        mao: whole_dollars(mao),
        lao: whole_dollars(lao),
    })
}

/// Offer at a chosen percentage of ARV less repairs. A percentage of zero or
/// below means "not set" and falls back to 75%.
pub fn compute_custom_offer(
    arv: Money,
    repairs: Money,
    percentage: Percent,
) -> DealResult<CustomOfferResult> {
    require_positive_arv(arv)?;

    let percentage = if percentage > Decimal::ZERO {
        percentage
    } else {
        DEFAULT_CUSTOM_PERCENTAGE
    };

    let gross = mul(arv, percentage / dec!(100), "custom_percentage")?;
    let max_offer = sub(gross, repairs, "repairs")?;
    let spread = sub(sub(arv, repairs, "repairs")?, max_offer, "custom_percentage")?;

    Ok(CustomOfferResult {
        percentage,
        max_offer: max_offer.max(Decimal::ZERO),
        spread: spread.max(Decimal::ZERO),
    })
}

/// Required end-buyer profit for a repair budget.
pub fn required_buyer_profit(repairs: Money) -> Money {
    find_tier(&BUYER_PROFIT_TIERS, repairs)
        .unwrap_or(BUYER_PROFIT_TIERS[0].value)
        .resolve(repairs)
}

/// Work back from ARV: reserve closing costs and the buyer's required
/// profit, what is left is the most we can pay.
pub fn compute_buyer_focused_offer(
    arv: Money,
    repairs: Money,
) -> DealResult<BuyerFocusedOfferResult> {
    require_positive_arv(arv)?;

    let closing_costs = arv * CLOSING_COST_RATE;
    let buyer_profit = required_buyer_profit(repairs);
    let after_repairs = sub(arv, repairs, "repairs")?;
    let mao_signed = after_repairs - closing_costs - buyer_profit;
    let lao_signed = mao_signed * LAO_FRACTION;

    Ok(BuyerFocusedOfferResult {
        closing_costs,
        required_buyer_profit: buyer_profit,
        mao_signed,
        mao: mao_signed.max(Decimal::ZERO),
        lao: lao_signed.max(Decimal::ZERO),
    })
}

pub fn analyze_offers(input: &OfferInput) -> DealResult<ComputationOutput<OfferSet>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.repairs < Decimal::ZERO {
        return Err(DealError::InvalidInput {
            field: "repairs".into(),
            reason: "Repairs must not be negative".into(),
        });
    }

    let offers = OfferSet {
        offer: compute_offer(input.arv, input.repairs)?,
        custom_offer: compute_custom_offer(input.arv, input.repairs, input.custom_percentage)?,
        buyer_focused_offer: compute_buyer_focused_offer(input.arv, input.repairs)?,
    };

    if offers.offer.net_value < Decimal::ZERO {
        warnings.push("Repairs exceed ARV; rapid MAO is negative".into());
    }
    if offers.buyer_focused_offer.mao_signed < Decimal::ZERO {
        warnings.push(format!(
            "Buyer-focused MAO is negative ({}); no price satisfies the end buyer",
            offers.buyer_focused_offer.mao_signed
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Wholesale Offers (tiered MAO, custom %, buyer-focused)",
        input,
        warnings,
        elapsed,
        offers,
    ))
}

fn require_positive_arv(arv: Money) -> DealResult<()> {
    if arv <= Decimal::ZERO {
        return Err(DealError::non_positive_arv(arv));
    }
    Ok(())
}

fn whole_dollars(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_table_boundaries() {
        assert_eq!(tiered_multiplier(dec!(50000)), dec!(0.700));
        assert_eq!(tiered_multiplier(dec!(119999)), dec!(0.700));
        assert_eq!(tiered_multiplier(dec!(120000)), dec!(0.800));
        assert_eq!(tiered_multiplier(dec!(219999.99)), dec!(0.800));
        assert_eq!(tiered_multiplier(dec!(220000)), dec!(0.815));
        assert_eq!(tiered_multiplier(dec!(299999)), dec!(0.815));
        assert_eq!(tiered_multiplier(dec!(300000)), dec!(0.829));
        assert_eq!(tiered_multiplier(dec!(399999)), dec!(0.829));
        assert_eq!(tiered_multiplier(dec!(400000)), dec!(0.849));
        assert_eq!(tiered_multiplier(dec!(2500000)), dec!(0.849));
    }

    #[test]
    fn test_multiplier_monotonic() {
        let mut prev = Decimal::ZERO;
        let mut arv = Decimal::ZERO;
        while arv <= dec!(600000) {
            let m = tiered_multiplier(arv);
            assert!(m >= prev, "multiplier dropped at {arv}");
            prev = m;
            arv += dec!(5000);
        }
    }

    #[test]
    fn test_compute_offer_reference() {
        let r = compute_offer(dec!(250000), dec!(30000)).unwrap();
        assert_eq!(r.net_value, dec!(220000));
        assert_eq!(r.multiplier, dec!(0.815));
        assert_eq!(r.mao, dec!(179300));
        assert_eq!(r.lao, dec!(125510));
    }

    #[test]
    fn test_compute_offer_rounds_whole_dollars() {
        // 101 * 0.7 = 70.7 -> 71
        let r = compute_offer(dec!(101), Decimal::ZERO).unwrap();
        assert_eq!(r.mao, dec!(71));
        assert_eq!(r.lao, dec!(49)); // 70.7 * 0.7 = 49.49
    }

    #[test]
    fn test_compute_offer_negative_net_value_not_clamped() {
        let r = compute_offer(dec!(100000), dec!(150000)).unwrap();
        assert_eq!(r.net_value, dec!(-50000));
        assert_eq!(r.mao, dec!(-35000));
    }

    #[test]
    fn test_compute_offer_rejects_zero_arv() {
        let err = compute_offer(Decimal::ZERO, dec!(10000)).unwrap_err();
        assert!(matches!(err, DealError::InvalidInput { ref field, .. } if field == "arv"));
        assert!(compute_offer(dec!(-1), Decimal::ZERO).is_err());
    }

    #[test]
    fn test_custom_offer_default_percentage() {
        let r = compute_custom_offer(dec!(200000), dec!(20000), Decimal::ZERO).unwrap();
        assert_eq!(r.percentage, dec!(75));
        assert_eq!(r.max_offer, dec!(130000));
        // 200000 - 20000 - 130000
        assert_eq!(r.spread, dec!(50000));
    }

    #[test]
    fn test_custom_offer_explicit_percentage() {
        let r = compute_custom_offer(dec!(200000), dec!(20000), dec!(65)).unwrap();
        assert_eq!(r.max_offer, dec!(110000));
        assert_eq!(r.spread, dec!(70000));
    }

    #[test]
    fn test_custom_offer_clamps_to_zero() {
        let r = compute_custom_offer(dec!(100000), dec!(90000), dec!(70)).unwrap();
        assert_eq!(r.max_offer, Decimal::ZERO);
        assert_eq!(r.spread, dec!(30000));

        let r = compute_custom_offer(dec!(100000), Decimal::ZERO, dec!(120)).unwrap();
        assert_eq!(r.max_offer, dec!(120000));
        assert_eq!(r.spread, Decimal::ZERO);
    }

    #[test]
    fn test_custom_offer_rejects_zero_arv() {
        assert!(compute_custom_offer(Decimal::ZERO, Decimal::ZERO, dec!(70)).is_err());
    }

    #[test]
    fn test_required_buyer_profit_tiers() {
        assert_eq!(required_buyer_profit(Decimal::ZERO), dec!(30000));
        assert_eq!(required_buyer_profit(dec!(29999)), dec!(30000));
        assert_eq!(required_buyer_profit(dec!(30000)), dec!(30000));
        assert_eq!(required_buyer_profit(dec!(40000)), dec!(40000));
        assert_eq!(required_buyer_profit(dec!(49999)), dec!(49999));
        assert_eq!(required_buyer_profit(dec!(50000)), dec!(50000));
        assert_eq!(required_buyer_profit(dec!(79999)), dec!(50000));
        assert_eq!(required_buyer_profit(dec!(80000)), dec!(60000));
        assert_eq!(required_buyer_profit(dec!(150000)), dec!(60000));
    }

    #[test]
    fn test_buyer_focused_reference() {
        let r = compute_buyer_focused_offer(dec!(300000), dec!(40000)).unwrap();
        assert_eq!(r.closing_costs, dec!(30000));
        assert_eq!(r.required_buyer_profit, dec!(40000));
        assert_eq!(r.mao_signed, dec!(190000));
        assert_eq!(r.mao, dec!(190000));
        assert_eq!(r.lao, dec!(133000));
    }

    #[test]
    fn test_buyer_focused_negative_clamped_for_display() {
        let r = compute_buyer_focused_offer(dec!(80000), dec!(20000)).unwrap();
        // 80000 - 20000 - 8000 - 30000
        assert_eq!(r.mao_signed, dec!(22000));

        // 50000 - 20000 - 5000 - 30000
        let r = compute_buyer_focused_offer(dec!(50000), dec!(20000)).unwrap();
        assert_eq!(r.mao_signed, dec!(-5000));
        assert_eq!(r.mao, Decimal::ZERO);
        assert_eq!(r.lao, Decimal::ZERO);
    }

    #[test]
    fn test_buyer_focused_rejects_zero_arv() {
        assert!(compute_buyer_focused_offer(Decimal::ZERO, dec!(40000)).is_err());
    }

    #[test]
    fn test_analyze_offers_bundle() {
        let out = analyze_offers(&OfferInput {
            arv: dec!(300000),
            repairs: dec!(40000),
            custom_percentage: dec!(70),
        })
        .unwrap();
        // (300000 - 40000) * 0.829 = 215540
        assert_eq!(out.result.offer.mao, dec!(215540));
        assert_eq!(out.result.custom_offer.max_offer, dec!(170000));
        assert_eq!(out.result.buyer_focused_offer.mao, dec!(190000));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_analyze_offers_rejects_zero_arv() {
        assert!(analyze_offers(&OfferInput::default()).is_err());
    }

    #[test]
    fn test_zeroed_results() {
        assert_eq!(OfferResult::zeroed().mao, Decimal::ZERO);
        assert_eq!(CustomOfferResult::zeroed().spread, Decimal::ZERO);
        assert_eq!(BuyerFocusedOfferResult::zeroed().lao, Decimal::ZERO);
    }

    #[test]
    fn test_extreme_inputs_are_errors_not_panics() {
        assert!(compute_offer(Decimal::MAX, dec!(-1000)).is_err());
        let err = compute_custom_offer(Decimal::MAX, Decimal::ZERO, dec!(500)).unwrap_err();
        assert!(
            matches!(err, DealError::InvalidInput { ref field, .. } if field == "custom_percentage")
        );
        assert!(compute_buyer_focused_offer(Decimal::MAX, dec!(-1000)).is_err());

        // Largest representable ARV still prices
        let r = compute_offer(Decimal::MAX, Decimal::ZERO).unwrap();
        assert!(r.mao > Decimal::ZERO);
    }
}
