//! Wholesaler profitability and the 100-point deal score.
//!
//! Score weights: 40 points from profit margin on the purchase price, 40
//! from the deal spread as a share of ARV, 20 from absolute net profit.
//! The ladders live in [`crate::tiers`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DealError;
use crate::tiers::{
    find_tier, CLOSING_COST_RATE, GRADE_BANDS, MARGIN_SCORE_TIERS, MAX_DEAL_SCORE,
    NET_PROFIT_SCORE_TIERS, SPREAD_SCORE_TIERS,
};
use crate::types::{add, div, mul, sub, with_metadata, ComputationOutput, Money, Percent};
use crate::DealResult;

/// Shown instead of a verdict when there is no ARV to score against.
pub const NOT_COMPUTABLE_EVALUATION: &str = "Enter ARV and repair costs to see evaluation";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DealGrade {
    Bad,
    Poor,
    Marginal,
    Good,
    Excellent,
}

impl DealGrade {
    pub fn from_score(score: u32) -> Self {
        find_tier(&GRADE_BANDS, Decimal::from(score)).unwrap_or(DealGrade::Bad)
    }

    pub fn letter(self) -> &'static str {
        match self {
            DealGrade::Excellent => "A",
            DealGrade::Good => "B",
            DealGrade::Marginal => "C",
            DealGrade::Poor => "D",
            DealGrade::Bad => "F",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DealGrade::Excellent => "EXCELLENT DEAL",
            DealGrade::Good => "GOOD DEAL",
            DealGrade::Marginal => "MARGINAL DEAL",
            DealGrade::Poor => "POOR DEAL",
            DealGrade::Bad => "BAD DEAL",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfitabilityInput {
    pub arv: Money,
    pub repairs: Money,
    pub purchase_price: Money,
    pub assignment_fee: Money,
    pub marketing_costs: Money,
    pub other_costs: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityResult {
    /// Assignment fee less marketing and other costs
    pub net_profit: Money,
    /// Net profit as a percentage of purchase price
    pub profit_margin: Percent,
    /// End buyer's closing costs (10% of ARV)
    pub closing_fees: Money,
    /// What the end buyer keeps after purchase, repairs, closing and our fee
    pub buyer_profit: Money,
    /// ARV - purchase price - repairs
    pub spread: Money,
    pub spread_pct: Percent,
    pub score: u32,
    pub grade: DealGrade,
    pub evaluation: String,
}

impl ProfitabilityResult {
    /// Result used when the deal cannot be scored (no ARV). The wholesaler's
    /// own profit figures do not depend on ARV and are kept.
    pub fn not_computable(net_profit: Money, profit_margin: Percent) -> Self {
        Self {
            net_profit,
            profit_margin,
            closing_fees: Decimal::ZERO,
            buyer_profit: Decimal::ZERO,
            spread: Decimal::ZERO,
            spread_pct: Decimal::ZERO,
            score: 0,
            grade: DealGrade::Bad,
            evaluation: NOT_COMPUTABLE_EVALUATION.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

pub fn net_profit(
    assignment_fee: Money,
    marketing_costs: Money,
    other_costs: Money,
) -> DealResult<Money> {
    let costs = add(marketing_costs, other_costs, "other_costs")?;
    sub(assignment_fee, costs, "marketing_costs")
}

/// Net profit as a percentage of purchase price; zero without a price.
pub fn profit_margin(net_profit: Money, purchase_price: Money) -> DealResult<Percent> {
    if purchase_price > Decimal::ZERO {
        let ratio = div(net_profit, purchase_price, "purchase_price")?;
        mul(ratio, dec!(100), "purchase_price")
    } else {
        Ok(Decimal::ZERO)
    }
}

pub fn closing_fees(arv: Money) -> Money {
    arv * CLOSING_COST_RATE
}

pub fn buyer_profit(
    arv: Money,
    purchase_price: Money,
    repairs: Money,
    assignment_fee: Money,
) -> DealResult<Money> {
    let spread = deal_spread(arv, purchase_price, repairs)?;
    let after_closing = sub(spread, closing_fees(arv), "arv")?;
    sub(after_closing, assignment_fee, "assignment_fee")
}

/// ARV - purchase price - repairs.
fn deal_spread(arv: Money, purchase_price: Money, repairs: Money) -> DealResult<Money> {
    sub(sub(arv, purchase_price, "purchase_price")?, repairs, "repairs")
}

/// (ARV - purchase - repairs) / ARV x 100.
pub fn spread_percentage(arv: Money, purchase_price: Money, repairs: Money) -> DealResult<Percent> {
    if arv <= Decimal::ZERO {
        return Err(DealError::non_positive_arv(arv));
    }
    let share = div(deal_spread(arv, purchase_price, repairs)?, arv, "arv")?;
    mul(share, dec!(100), "arv")
}

/// Weighted 0-100 deal score. A deal without a purchase price scores 0.
pub fn deal_score(
    arv: Money,
    repairs: Money,
    purchase_price: Money,
    net_profit: Money,
) -> DealResult<u32> {
    if arv <= Decimal::ZERO {
        return Err(DealError::non_positive_arv(arv));
    }
    if purchase_price <= Decimal::ZERO {
        return Ok(0);
    }
    let spread_pct = spread_percentage(arv, purchase_price, repairs)?;
    let margin = profit_margin(net_profit, purchase_price)?;

    let score = find_tier(&MARGIN_SCORE_TIERS, margin).unwrap_or(0)
        + find_tier(&SPREAD_SCORE_TIERS, spread_pct).unwrap_or(0)
        + find_tier(&NET_PROFIT_SCORE_TIERS, net_profit).unwrap_or(0);

    Ok(score.min(MAX_DEAL_SCORE))
}

pub fn deal_grade(
    arv: Money,
    repairs: Money,
    purchase_price: Money,
    net_profit: Money,
) -> DealResult<DealGrade> {
    deal_score(arv, repairs, purchase_price, net_profit).map(DealGrade::from_score)
}

pub fn evaluation_text(grade: DealGrade) -> &'static str {
    match grade {
        DealGrade::Excellent => {
            "EXCELLENT DEAL - Outstanding profits with low risk. High ROI potential."
        }
        DealGrade::Good => "GOOD DEAL - Solid profits with acceptable risk. Worth pursuing.",
        DealGrade::Marginal => {
            "MARGINAL DEAL - Lower profits but still viable. Consider negotiating better terms."
        }
        DealGrade::Poor => "POOR DEAL - Low profit margins. High risk, not recommended.",
        DealGrade::Bad => "BAD DEAL - Negative or very low returns. Avoid this deal.",
    }
}

/// Profitability figures, score, grade and verdict for one deal.
pub fn score_profitability(input: &ProfitabilityInput) -> DealResult<ProfitabilityResult> {
    let net = net_profit(input.assignment_fee, input.marketing_costs, input.other_costs)?;
    let margin = profit_margin(net, input.purchase_price)?;
    let spread_pct = spread_percentage(input.arv, input.purchase_price, input.repairs)?;
    let score = deal_score(input.arv, input.repairs, input.purchase_price, net)?;
    let grade = DealGrade::from_score(score);

    Ok(ProfitabilityResult {
        net_profit: net,
        profit_margin: margin,
        closing_fees: closing_fees(input.arv),
        buyer_profit: buyer_profit(
            input.arv,
            input.purchase_price,
            input.repairs,
            input.assignment_fee,
        )?,
        spread: deal_spread(input.arv, input.purchase_price, input.repairs)?,
        spread_pct,
        score,
        grade,
        evaluation: evaluation_text(grade).to_string(),
    })
}

/// Advisory notes for a scored deal.
pub fn profitability_warnings(
    input: &ProfitabilityInput,
    result: &ProfitabilityResult,
) -> Vec<String> {
    let mut warnings = Vec::new();
    if input.purchase_price <= Decimal::ZERO {
        warnings.push("Purchase price not set; profit margin and deal score reported as 0".into());
    }
    if result.net_profit <= Decimal::ZERO {
        warnings.push("Net profit is not positive; this deal will lose money".into());
    }
    if result.buyer_profit <= Decimal::ZERO {
        warnings.push("End buyer has no profit potential; the contract will not assign".into());
    }
    if input.repairs > input.arv {
        warnings.push("Repair budget exceeds ARV".into());
    }
    warnings
}

/// Score a deal and wrap it in the standard output envelope.
pub fn evaluate_profitability(
    input: &ProfitabilityInput,
) -> DealResult<ComputationOutput<ProfitabilityResult>> {
    let start = Instant::now();
    let result = score_profitability(input)?;
    let warnings = profitability_warnings(input, &result);
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Wholesale Deal Profitability (100-point weighted score)",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_deal() -> ProfitabilityInput {
        ProfitabilityInput {
            arv: dec!(300000),
            repairs: dec!(40000),
            purchase_price: dec!(150000),
            assignment_fee: dec!(12000),
            marketing_costs: dec!(1000),
            other_costs: dec!(500),
        }
    }

    #[test]
    fn test_net_profit_and_margin() {
        assert_eq!(net_profit(dec!(12000), dec!(1000), dec!(500)).unwrap(), dec!(10500));
        assert_eq!(profit_margin(dec!(10500), dec!(150000)).unwrap(), dec!(7));
        assert_eq!(profit_margin(dec!(10500), Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_buyer_profit() {
        // 300000 - 150000 - 40000 - 30000 - 12000
        assert_eq!(
            buyer_profit(dec!(300000), dec!(150000), dec!(40000), dec!(12000)).unwrap(),
            dec!(68000)
        );
    }

    #[test]
    fn test_spread_percentage() {
        // (300000 - 150000 - 40000) / 300000 = 36.67%
        let pct = spread_percentage(dec!(300000), dec!(150000), dec!(40000)).unwrap();
        assert!((pct - dec!(36.6667)).abs() < dec!(0.001));
        assert!(spread_percentage(Decimal::ZERO, dec!(1), dec!(1)).is_err());
    }

    #[test]
    fn test_score_maximum() {
        let score = deal_score(dec!(300000), dec!(40000), dec!(150000), dec!(10500)).unwrap();
        assert_eq!(score, 100);
        assert_eq!(DealGrade::from_score(score), DealGrade::Excellent);
    }

    #[test]
    fn test_score_components() {
        // margin 3000 / 150000 = 2% -> 20
        // spread 30000 / 200000 = 15% -> 20
        // net 3000 -> 5
        let score = deal_score(dec!(200000), dec!(20000), dec!(150000), dec!(3000)).unwrap();
        assert_eq!(score, 45);
        assert_eq!(DealGrade::from_score(score), DealGrade::Poor);
    }

    #[test]
    fn test_score_zero_for_losing_deal() {
        let score = deal_score(dec!(200000), dec!(50000), dec!(190000), dec!(-500)).unwrap();
        assert_eq!(score, 0);
        assert_eq!(DealGrade::from_score(score), DealGrade::Bad);
    }

    #[test]
    fn test_score_rejects_zero_arv() {
        let err = deal_score(Decimal::ZERO, dec!(1), dec!(1), dec!(1)).unwrap_err();
        assert!(matches!(err, DealError::InvalidInput { .. }));
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(DealGrade::from_score(100), DealGrade::Excellent);
        assert_eq!(DealGrade::from_score(90), DealGrade::Excellent);
        assert_eq!(DealGrade::from_score(89), DealGrade::Good);
        assert_eq!(DealGrade::from_score(70), DealGrade::Good);
        assert_eq!(DealGrade::from_score(69), DealGrade::Marginal);
        assert_eq!(DealGrade::from_score(60), DealGrade::Marginal);
        assert_eq!(DealGrade::from_score(59), DealGrade::Poor);
        assert_eq!(DealGrade::from_score(40), DealGrade::Poor);
        assert_eq!(DealGrade::from_score(39), DealGrade::Bad);
        assert_eq!(DealGrade::from_score(0), DealGrade::Bad);
    }

    #[test]
    fn test_grade_letters_and_text() {
        assert_eq!(DealGrade::Excellent.letter(), "A");
        assert_eq!(DealGrade::Bad.letter(), "F");
        assert!(evaluation_text(DealGrade::Good).starts_with("GOOD DEAL"));
        assert!(evaluation_text(DealGrade::Bad).contains("Avoid"));
    }

    #[test]
    fn test_score_monotonic_in_net_profit() {
        let mut prev = 0;
        let mut net = dec!(-5000);
        while net <= dec!(20000) {
            let s = deal_score(dec!(250000), dec!(30000), dec!(160000), net).unwrap();
            assert!(s >= prev, "score dropped at net profit {net}");
            prev = s;
            net += dec!(250);
        }
    }

    #[test]
    fn test_score_monotonic_in_spread() {
        // Margin fixed at 4%; shrinking repairs widens the spread
        let mut prev = 0;
        let mut repairs = dec!(150000);
        while repairs >= Decimal::ZERO {
            let s = deal_score(dec!(300000), repairs, dec!(100000), dec!(4000)).unwrap();
            assert!(s >= prev, "score dropped at repairs {repairs}");
            prev = s;
            repairs -= dec!(5000);
        }
    }

    #[test]
    fn test_score_profitability_full() {
        let r = score_profitability(&strong_deal()).unwrap();
        assert_eq!(r.net_profit, dec!(10500));
        assert_eq!(r.profit_margin, dec!(7));
        assert_eq!(r.closing_fees, dec!(30000));
        assert_eq!(r.buyer_profit, dec!(68000));
        assert_eq!(r.spread, dec!(110000));
        assert_eq!(r.score, 100);
        assert_eq!(r.grade, DealGrade::Excellent);
        assert_eq!(r.evaluation, evaluation_text(DealGrade::Excellent));
    }

    #[test]
    fn test_not_computable_keeps_own_profit() {
        let r = ProfitabilityResult::not_computable(dec!(5000), dec!(2.5));
        assert_eq!(r.net_profit, dec!(5000));
        assert_eq!(r.score, 0);
        assert_eq!(r.evaluation, NOT_COMPUTABLE_EVALUATION);
    }

    #[test]
    fn test_evaluate_profitability_envelope() {
        let mut input = strong_deal();
        input.purchase_price = Decimal::ZERO;
        let out = evaluate_profitability(&input).unwrap();
        assert_eq!(out.result.profit_margin, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("Purchase price")));
    }

    #[test]
    fn test_evaluate_profitability_rejects_zero_arv() {
        let mut input = strong_deal();
        input.arv = Decimal::ZERO;
        assert!(evaluate_profitability(&input).is_err());
    }

    #[test]
    fn test_no_purchase_price_scores_zero() {
        // Spread and net profit alone would be worth 60 points
        let score = deal_score(dec!(200000), dec!(20000), Decimal::ZERO, dec!(15000)).unwrap();
        assert_eq!(score, 0);

        let mut input = strong_deal();
        input.purchase_price = Decimal::ZERO;
        let r = score_profitability(&input).unwrap();
        assert_eq!(r.score, 0);
        assert_eq!(r.grade, DealGrade::Bad);
    }

    #[test]
    fn test_score_monotonic_in_margin() {
        // Price + repairs fixed at 200000 keeps the spread at 33%; net profit
        // is fixed, so a lower price only raises the margin
        let mut prev = 0;
        let mut price = dec!(200000);
        while price >= dec!(50000) {
            let repairs = dec!(200000) - price;
            let s = deal_score(dec!(300000), repairs, price, dec!(4000)).unwrap();
            assert!(s >= prev, "score dropped at purchase price {price}");
            prev = s;
            price -= dec!(5000);
        }
        // 4000 / 50000 = 8% margin -> 40, spread 33% -> 40, net 4000 -> 5
        assert_eq!(prev, 85);
    }

    #[test]
    fn test_extreme_figures_are_errors_not_panics() {
        assert!(net_profit(dec!(0), Decimal::MAX, Decimal::MAX).is_err());
        assert!(profit_margin(Decimal::MAX, dec!(0.0001)).is_err());
        assert!(spread_percentage(dec!(0.0001), Decimal::ZERO, Decimal::MAX).is_err());
        assert!(buyer_profit(dec!(1), Decimal::MAX, Decimal::MAX, Decimal::ZERO).is_err());

        let input = ProfitabilityInput {
            arv: dec!(0.0001),
            purchase_price: dec!(0.0001),
            repairs: Decimal::MAX,
            ..strong_deal()
        };
        assert!(score_profitability(&input).is_err());
    }
}
