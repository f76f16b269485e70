//! Threshold ladders used across the engine.
//!
//! Every ladder is an ascending table of `(lower_bound, value)` pairs. A
//! value `x` matches the last tier whose lower bound is `<= x`, so a value
//! sitting exactly on a boundary belongs to the higher tier. The first tier
//! of each table starts at `Decimal::MIN` and acts as the floor.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::profitability::DealGrade;
use crate::types::{Money, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier<T> {
    pub lower_bound: Decimal,
    pub value: T,
}

pub(crate) const fn tier<T>(lower_bound: Decimal, value: T) -> Tier<T> {
    Tier { lower_bound, value }
}

/// Find the tier `x` falls into. Returns `None` only when `x` is below the
/// first lower bound (never the case for tables anchored at `Decimal::MIN`).
pub fn find_tier<T: Copy>(table: &[Tier<T>], x: Decimal) -> Option<T> {
    table
        .iter()
        .take_while(|t| t.lower_bound <= x)
        .last()
        .map(|t| t.value)
}

// ---------------------------------------------------------------------------
// Offer engine
// ---------------------------------------------------------------------------

/// MAO multiplier applied to (ARV - repairs), keyed by ARV.
pub const MAO_MULTIPLIER_TIERS: [Tier<Rate>; 5] = [
    tier(Decimal::MIN, dec!(0.700)),
    tier(dec!(120000), dec!(0.800)),
    tier(dec!(220000), dec!(0.815)),
    tier(dec!(300000), dec!(0.829)),
    tier(dec!(400000), dec!(0.849)),
];

/// Opening (least allowable) offer as a fraction of MAO.
pub const LAO_FRACTION: Rate = dec!(0.70);

/// Buyer closing costs as a fraction of ARV.
pub const CLOSING_COST_RATE: Rate = dec!(0.10);

/// Custom-offer percentage used when none is entered.
pub const DEFAULT_CUSTOM_PERCENTAGE: Decimal = dec!(75);

/// Profit an end buyer requires, keyed by repair budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequiredProfit {
    Fixed(Money),
    /// Buyer expects to make at least what they put into repairs.
    MatchRepairs,
}

impl RequiredProfit {
    pub fn resolve(self, repairs: Money) -> Money {
        match self {
            RequiredProfit::Fixed(amount) => amount,
            RequiredProfit::MatchRepairs => repairs,
        }
    }
}

pub const BUYER_PROFIT_TIERS: [Tier<RequiredProfit>; 4] = [
    tier(Decimal::MIN, RequiredProfit::Fixed(dec!(30000))),
    tier(dec!(30000), RequiredProfit::MatchRepairs),
    tier(dec!(50000), RequiredProfit::Fixed(dec!(50000))),
    tier(dec!(80000), RequiredProfit::Fixed(dec!(60000))),
];

// ---------------------------------------------------------------------------
// Deal score (100 points: 40 margin, 40 spread, 20 absolute profit)
// ---------------------------------------------------------------------------

/// Keyed by profit margin, percent of purchase price.
pub const MARGIN_SCORE_TIERS: [Tier<u32>; 5] = [
    tier(Decimal::MIN, 0),
    tier(dec!(1), 10),
    tier(dec!(2), 20),
    tier(dec!(3), 30),
    tier(dec!(5), 40),
];

/// Keyed by spread, percent of ARV.
pub const SPREAD_SCORE_TIERS: [Tier<u32>; 5] = [
    tier(Decimal::MIN, 0),
    tier(dec!(10), 10),
    tier(dec!(15), 20),
    tier(dec!(20), 30),
    tier(dec!(25), 40),
];

/// Keyed by net profit in dollars.
pub const NET_PROFIT_SCORE_TIERS: [Tier<u32>; 5] = [
    tier(Decimal::MIN, 0),
    tier(dec!(2500), 5),
    tier(dec!(5000), 10),
    tier(dec!(7500), 15),
    tier(dec!(10000), 20),
];

pub const MAX_DEAL_SCORE: u32 = 100;

/// Keyed by total deal score.
pub const GRADE_BANDS: [Tier<DealGrade>; 5] = [
    tier(Decimal::MIN, DealGrade::Bad),
    tier(dec!(40), DealGrade::Poor),
    tier(dec!(60), DealGrade::Marginal),
    tier(dec!(70), DealGrade::Good),
    tier(dec!(90), DealGrade::Excellent),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_ascending<T>(name: &str, table: &[Tier<T>]) {
        for pair in table.windows(2) {
            assert!(
                pair[0].lower_bound < pair[1].lower_bound,
                "{name} is not strictly ascending"
            );
        }
        assert_eq!(table[0].lower_bound, Decimal::MIN, "{name} has no floor");
    }

    #[test]
    fn test_tables_are_ascending_with_floor() {
        assert_ascending("multiplier", &MAO_MULTIPLIER_TIERS);
        assert_ascending("buyer profit", &BUYER_PROFIT_TIERS);
        assert_ascending("margin", &MARGIN_SCORE_TIERS);
        assert_ascending("spread", &SPREAD_SCORE_TIERS);
        assert_ascending("net profit", &NET_PROFIT_SCORE_TIERS);
        assert_ascending("grade", &GRADE_BANDS);
    }

    #[test]
    fn test_boundary_goes_to_higher_tier() {
        assert_eq!(find_tier(&MARGIN_SCORE_TIERS, dec!(4.99)), Some(30));
        assert_eq!(find_tier(&MARGIN_SCORE_TIERS, dec!(5)), Some(40));
        assert_eq!(find_tier(&MARGIN_SCORE_TIERS, dec!(-20)), Some(0));
    }

    #[test]
    fn test_find_tier_below_first_bound() {
        let table = [tier(dec!(10), 'a'), tier(dec!(20), 'b')];
        assert_eq!(find_tier(&table, dec!(5)), None);
        assert_eq!(find_tier(&table, dec!(10)), Some('a'));
        assert_eq!(find_tier(&table, dec!(1000)), Some('b'));
    }

    #[test]
    fn test_required_profit_resolve() {
        assert_eq!(RequiredProfit::Fixed(dec!(30000)).resolve(dec!(1)), dec!(30000));
        assert_eq!(RequiredProfit::MatchRepairs.resolve(dec!(42000)), dec!(42000));
    }

    #[test]
    fn test_score_components_sum_to_max() {
        let top = MARGIN_SCORE_TIERS[4].value
            + SPREAD_SCORE_TIERS[4].value
            + NET_PROFIT_SCORE_TIERS[4].value;
        assert_eq!(top, MAX_DEAL_SCORE);
    }
}
