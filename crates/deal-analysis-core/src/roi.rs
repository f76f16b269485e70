//! Return on the wholesaler's time and cash.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DealError;
use crate::types::{div, mul, with_metadata, ComputationOutput, Money, Percent};
use crate::DealResult;

const DAYS_PER_YEAR: Decimal = dec!(365);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoiGrade {
    #[serde(rename = "D")]
    D,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl RoiGrade {
    pub fn text(self) -> &'static str {
        match self {
            RoiGrade::APlus => "A+ EXCEPTIONAL - Outstanding returns across all metrics",
            RoiGrade::A => "A EXCELLENT - Strong returns, highly profitable deal",
            RoiGrade::BPlus => "B+ GOOD - Meets targets with solid returns",
            RoiGrade::B => "B ACCEPTABLE - Reasonable returns, consider if strategic",
            RoiGrade::C => "C MARGINAL - Below targets, proceed with caution",
            RoiGrade::D => "D POOR - Insufficient returns, not recommended",
        }
    }
}

/// A grade is earned when the hourly ratio reaches `min_hourly_ratio` and
/// cash ROI strictly exceeds `cash_roi_above`. Checked top down.
#[derive(Debug, Clone, Copy)]
pub struct RoiBand {
    pub min_hourly_ratio: Decimal,
    pub cash_roi_above: Percent,
    pub grade: RoiGrade,
}

pub const ROI_BANDS: [RoiBand; 5] = [
    RoiBand {
        min_hourly_ratio: dec!(1.5),
        cash_roi_above: dec!(150),
        grade: RoiGrade::APlus,
    },
    RoiBand {
        min_hourly_ratio: dec!(1.2),
        cash_roi_above: dec!(100),
        grade: RoiGrade::A,
    },
    RoiBand {
        min_hourly_ratio: dec!(1.0),
        cash_roi_above: dec!(50),
        grade: RoiGrade::BPlus,
    },
    RoiBand {
        min_hourly_ratio: dec!(0.8),
        cash_roi_above: dec!(25),
        grade: RoiGrade::B,
    },
    RoiBand {
        min_hourly_ratio: dec!(0.6),
        cash_roi_above: dec!(10),
        grade: RoiGrade::C,
    },
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiInput {
    pub net_profit: Money,
    pub time_investment_hours: Decimal,
    /// Desired earnings per hour
    pub hourly_target: Money,
    pub days_to_close: Decimal,
    pub cash_invested: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiResult {
    pub hourly_rate: Money,
    /// Actual hourly rate / target
    pub hourly_ratio: Decimal,
    pub cash_roi: Percent,
    pub annualized_roi: Percent,
    pub grade: RoiGrade,
    pub grade_text: String,
}

impl RoiResult {
    pub(crate) fn zeroed() -> Self {
        RoiResult {
            hourly_rate: Decimal::ZERO,
            hourly_ratio: Decimal::ZERO,
            cash_roi: Decimal::ZERO,
            annualized_roi: Decimal::ZERO,
            grade: RoiGrade::D,
            grade_text: RoiGrade::D.text().to_string(),
        }
    }
}

pub fn roi_grade(hourly_ratio: Decimal, cash_roi: Percent) -> RoiGrade {
    ROI_BANDS
        .iter()
        .find(|b| hourly_ratio >= b.min_hourly_ratio && cash_roi > b.cash_roi_above)
        .map(|b| b.grade)
        .unwrap_or(RoiGrade::D)
}

/// Each ratio is zero when its denominator is not positive. A ratio that
/// overflows is an `InvalidInput` on its denominator.
pub fn compute_roi(input: &RoiInput) -> DealResult<RoiResult> {
    let hourly_rate = ratio(
        input.net_profit,
        input.time_investment_hours,
        "time_investment_hours",
    )?;
    let hourly_ratio = ratio(hourly_rate, input.hourly_target, "hourly_target")?;
    let cash_share = ratio(input.net_profit, input.cash_invested, "cash_invested")?;
    let cash_roi = mul(cash_share, dec!(100), "cash_invested")?;
    let annualized_roi = ratio(
        mul(cash_roi, DAYS_PER_YEAR, "cash_invested")?,
        input.days_to_close,
        "days_to_close",
    )?;
    let grade = roi_grade(hourly_ratio, cash_roi);

    Ok(RoiResult {
        hourly_rate,
        hourly_ratio,
        cash_roi,
        annualized_roi,
        grade,
        grade_text: grade.text().to_string(),
    })
}

pub fn analyze_roi(input: &RoiInput) -> DealResult<ComputationOutput<RoiResult>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    for (field, value) in [
        ("time_investment_hours", input.time_investment_hours),
        ("hourly_target", input.hourly_target),
        ("days_to_close", input.days_to_close),
        ("cash_invested", input.cash_invested),
    ] {
        if value < Decimal::ZERO {
            return Err(DealError::InvalidInput {
                field: field.into(),
                reason: "Must not be negative".into(),
            });
        }
        if value.is_zero() {
            warnings.push(format!("{field} not set; dependent ROI figures reported as 0"));
        }
    }

    let result = compute_roi(input)?;
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Wholesaler ROI (hourly rate, cash-on-cash, annualized)",
        input,
        warnings,
        elapsed,
        result,
    ))
}

fn ratio(numerator: Decimal, denominator: Decimal, field: &str) -> DealResult<Decimal> {
    if denominator > Decimal::ZERO {
        div(numerator, denominator, field)
    } else {
        Ok(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RoiInput {
        RoiInput {
            net_profit: dec!(10000),
            time_investment_hours: dec!(40),
            hourly_target: dec!(100),
            days_to_close: dec!(30),
            cash_invested: dec!(5000),
        }
    }

    #[test]
    fn test_compute_roi() {
        let r = compute_roi(&sample()).unwrap();
        assert_eq!(r.hourly_rate, dec!(250));
        assert_eq!(r.hourly_ratio, dec!(2.5));
        assert_eq!(r.cash_roi, dec!(200));
        // 200 * 365 / 30
        assert!((r.annualized_roi - dec!(2433.333)).abs() < dec!(0.01));
        assert_eq!(r.grade, RoiGrade::APlus);
    }

    #[test]
    fn test_zero_denominators() {
        let r = compute_roi(&RoiInput {
            net_profit: dec!(10000),
            ..RoiInput::default()
        })
        .unwrap();
        assert_eq!(r.hourly_rate, Decimal::ZERO);
        assert_eq!(r.hourly_ratio, Decimal::ZERO);
        assert_eq!(r.cash_roi, Decimal::ZERO);
        assert_eq!(r.annualized_roi, Decimal::ZERO);
        assert_eq!(r.grade, RoiGrade::D);
    }

    #[test]
    fn test_overflowing_ratio_is_an_error() {
        let input = RoiInput {
            net_profit: Decimal::MAX,
            time_investment_hours: dec!(0.0001),
            ..sample()
        };
        match compute_roi(&input).unwrap_err() {
            DealError::InvalidInput { field, .. } => assert_eq!(field, "time_investment_hours"),
            other => panic!("unexpected error: {other}"),
        }

        // hours are fine, but cash ROI * 365 overflows
        let input = RoiInput {
            net_profit: Decimal::MAX / dec!(100),
            time_investment_hours: dec!(1),
            hourly_target: dec!(1),
            cash_invested: dec!(1),
            days_to_close: dec!(30),
        };
        assert!(compute_roi(&input).is_err());
        assert!(analyze_roi(&input).is_err());
    }

    #[test]
    fn test_grade_ladder() {
        assert_eq!(roi_grade(dec!(1.5), dec!(150.01)), RoiGrade::APlus);
        // Cash ROI must exceed the bar, not just meet it
        assert_eq!(roi_grade(dec!(1.5), dec!(150)), RoiGrade::A);
        assert_eq!(roi_grade(dec!(1.2), dec!(101)), RoiGrade::A);
        assert_eq!(roi_grade(dec!(1.0), dec!(51)), RoiGrade::BPlus);
        assert_eq!(roi_grade(dec!(0.8), dec!(26)), RoiGrade::B);
        assert_eq!(roi_grade(dec!(0.6), dec!(11)), RoiGrade::C);
        assert_eq!(roi_grade(dec!(0.59), dec!(500)), RoiGrade::D);
        assert_eq!(roi_grade(dec!(3), dec!(10)), RoiGrade::D);
    }

    #[test]
    fn test_grade_serializes_with_symbols() {
        let json = serde_json::to_string(&RoiGrade::BPlus).unwrap();
        assert_eq!(json, "\"B+\"");
        assert!(RoiGrade::APlus.text().starts_with("A+"));
    }

    #[test]
    fn test_analyze_roi_rejects_negative() {
        let mut input = sample();
        input.cash_invested = dec!(-1);
        assert!(analyze_roi(&input).is_err());
    }

    #[test]
    fn test_analyze_roi_warns_on_missing_inputs() {
        let mut input = sample();
        input.days_to_close = Decimal::ZERO;
        let out = analyze_roi(&input).unwrap();
        assert_eq!(out.result.annualized_roi, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("days_to_close")));
    }
}
