//! Offer scenarios for tax-delinquent properties.
//!
//! The end buyer pays off the tax lien, so the lien comes straight off the
//! buyer-focused MAO. Each assignment-fee scenario then leaves the seller
//! with `adjusted MAO - fee` in clean proceeds.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DealError;
use crate::tiers::{find_tier, tier, Tier};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DealResult;

/// Standard assignment-fee scenarios, lowest to highest.
pub const STANDARD_FEE_SCENARIOS: [(&str, Money); 5] = [
    ("Minimum Fee", dec!(10000)),
    ("Conservative", dec!(15000)),
    ("Target Fee", dec!(20000)),
    ("Aggressive", dec!(25000)),
    ("Premium", dec!(30000)),
];

pub const CUSTOM_FEE_LABEL: &str = "Custom Fee";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellerNetQuality {
    NeedsTaxNegotiation,
    HighMotivationRequired,
    GoodDeal,
    StrongDeal,
    PremiumDeal,
}

impl SellerNetQuality {
    pub fn label(self) -> &'static str {
        match self {
            SellerNetQuality::NeedsTaxNegotiation => "Needs Tax Negotiation",
            SellerNetQuality::HighMotivationRequired => "High Motivation Required",
            SellerNetQuality::GoodDeal => "Good Deal",
            SellerNetQuality::StrongDeal => "Strong Deal",
            SellerNetQuality::PremiumDeal => "Premium Deal",
        }
    }

    pub fn strategy(self) -> &'static str {
        match self {
            SellerNetQuality::NeedsTaxNegotiation => {
                "Negative offer. Assignment fee too high for this tax burden scenario."
            }
            SellerNetQuality::HighMotivationRequired => {
                "Low seller net. Need highly motivated seller willing to accept minimal proceeds."
            }
            SellerNetQuality::GoodDeal => {
                "Reasonable offer. Seller gets clean proceeds, buyer handles tax lien separately."
            }
            SellerNetQuality::StrongDeal => {
                "Strong offer. Clean transaction with meaningful seller proceeds."
            }
            SellerNetQuality::PremiumDeal => {
                "Premium offer. Excellent deal structure with high seller satisfaction."
            }
        }
    }
}

/// Keyed by seller net proceeds.
pub const SELLER_NET_QUALITY_TIERS: [Tier<SellerNetQuality>; 5] = [
    tier(Decimal::MIN, SellerNetQuality::NeedsTaxNegotiation),
    tier(dec!(0), SellerNetQuality::HighMotivationRequired),
    tier(dec!(10000), SellerNetQuality::GoodDeal),
    tier(dec!(25000), SellerNetQuality::StrongDeal),
    tier(dec!(50000), SellerNetQuality::PremiumDeal),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxDelinquentInput {
    /// Buyer-focused MAO before the lien
    pub original_mao: Money,
    pub tax_lien: Money,
    /// Extra scenario at this fee when positive
    pub custom_fee: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeScenario {
    pub label: String,
    pub fee: Money,
    pub offer: Money,
    /// Equal to the offer: the lien is paid by the buyer, not the seller
    pub seller_net: Money,
    pub viable: bool,
    pub quality: SellerNetQuality,
    pub quality_label: String,
    pub strategy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxDelinquentOutput {
    pub original_mao: Money,
    pub tax_lien: Money,
    pub adjusted_mao: Money,
    /// Offer range across the standard fees, floored at zero
    pub offer_range: (Money, Money),
    pub scenarios: Vec<FeeScenario>,
}

pub fn seller_net_quality(seller_net: Money) -> SellerNetQuality {
    find_tier(&SELLER_NET_QUALITY_TIERS, seller_net)
        .unwrap_or(SellerNetQuality::NeedsTaxNegotiation)
}

pub fn plan_tax_delinquent(input: &TaxDelinquentInput) -> DealResult<TaxDelinquentOutput> {
    if input.original_mao <= Decimal::ZERO {
        return Err(DealError::InvalidInput {
            field: "original_mao".into(),
            reason: "A positive buyer-focused MAO is required before planning tax scenarios".into(),
        });
    }
    if input.tax_lien <= Decimal::ZERO {
        return Err(DealError::InvalidInput {
            field: "tax_lien".into(),
            reason: "Tax lien amount must be positive".into(),
        });
    }

    let adjusted_mao = input.original_mao - input.tax_lien;
    if adjusted_mao <= Decimal::ZERO {
        return Err(DealError::FinancialImpossibility(format!(
            "Tax lien {} meets or exceeds the MAO {}; deal is not viable as structured",
            input.tax_lien, input.original_mao
        )));
    }

    let mut fees: Vec<(&str, Money)> = STANDARD_FEE_SCENARIOS.to_vec();
    if input.custom_fee > Decimal::ZERO {
        fees.push((CUSTOM_FEE_LABEL, input.custom_fee));
    }

    let mut scenarios: Vec<FeeScenario> = fees
        .into_iter()
        .map(|(label, fee)| build_scenario(label, fee, adjusted_mao))
        .collect();
    scenarios.sort_by(|a, b| a.fee.cmp(&b.fee));

    let lowest_fee = STANDARD_FEE_SCENARIOS[0].1;
    let highest_fee = STANDARD_FEE_SCENARIOS[STANDARD_FEE_SCENARIOS.len() - 1].1;
    let offer_range = (
        (adjusted_mao - highest_fee).max(Decimal::ZERO),
        (adjusted_mao - lowest_fee).max(Decimal::ZERO),
    );

    Ok(TaxDelinquentOutput {
        original_mao: input.original_mao,
        tax_lien: input.tax_lien,
        adjusted_mao,
        offer_range,
        scenarios,
    })
}

pub fn analyze_tax_delinquent(
    input: &TaxDelinquentInput,
) -> DealResult<ComputationOutput<TaxDelinquentOutput>> {
    let start = Instant::now();
    let output = plan_tax_delinquent(input)?;

    let mut warnings = Vec::new();
    let non_viable = output.scenarios.iter().filter(|s| !s.viable).count();
    if non_viable > 0 {
        warnings.push(format!(
            "{non_viable} fee scenario(s) leave the seller with negative proceeds"
        ));
    }
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Tax-Delinquent Offer Scenarios (buyer pays lien)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn build_scenario(label: &str, fee: Money, adjusted_mao: Money) -> FeeScenario {
    let offer = adjusted_mao - fee;
    let quality = seller_net_quality(offer);
    FeeScenario {
        label: label.to_string(),
        fee,
        offer,
        seller_net: offer,
        viable: offer >= Decimal::ZERO,
        quality,
        quality_label: quality.label().to_string(),
        strategy: quality.strategy().to_string(),
    }
}
