//! Composite deal analysis.
//!
//! `analyze_deal` computes every derived figure from one `DealInputs`
//! snapshot in a fixed order:
//!
//! 1. ARV estimate from comparables
//! 2. repair estimate (itemized sheet if supplied, otherwise the flat total)
//! 3. rapid offer, custom offer, buyer-focused offer
//! 4. profitability score
//! 5. ROI
//! 6. tax-delinquent scenarios (when a lien is entered)
//!
//! It never fails. A stage that cannot be computed is replaced by its
//! zeroed result and the reason is recorded in the output warnings.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, debug_span, warn};

use crate::arv::{
    comparable_warnings, estimate_arv, ArvEstimate, ComparableSale, MAX_COMPARABLES,
};
use crate::offers::{
    compute_buyer_focused_offer, compute_custom_offer, compute_offer, BuyerFocusedOfferResult,
    CustomOfferResult, OfferResult,
};
use crate::profitability::{
    net_profit, profit_margin, profitability_warnings, score_profitability, ProfitabilityInput,
    ProfitabilityResult,
};
use crate::repairs::{
    estimate_repairs, total_repairs, RepairEstimate, RepairMode, RepairQuantities, RepairRates,
};
use crate::roi::{compute_roi, RoiInput, RoiResult};
#[cfg(feature = "tax_delinquent")]
use crate::tax_delinquent::{plan_tax_delinquent, TaxDelinquentInput, TaxDelinquentOutput};
use crate::types::{non_negative, with_metadata, ComputationOutput, Money, Percent};
use crate::DealResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything the form collects. Absent fields are zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DealInputs {
    pub comparable_sales: Vec<ComparableSale>,
    pub subject_sqft: Decimal,
    /// Manual ARV, used only when the comparables give no estimate
    pub arv: Money,
    /// Flat repair total, used only when no itemized sheet is supplied
    pub repairs: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair_items: Option<RepairQuantities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair_rates: Option<RepairRates>,
    pub purchase_price: Money,
    pub assignment_fee: Money,
    pub marketing_costs: Money,
    pub other_costs: Money,
    /// Percent of ARV for the custom offer; zero means the 75% default
    pub custom_percentage: Percent,
    pub time_investment_hours: Decimal,
    pub hourly_target: Money,
    pub days_to_close: Decimal,
    pub cash_invested: Money,
    pub tax_lien_amount: Money,
    pub custom_assignment_fee: Money,
}

impl DealInputs {
    /// Copy with every scalar clamped to zero or above.
    fn sanitized(&self, warnings: &mut Vec<String>) -> DealInputs {
        let mut w = |field: &str, value: Decimal| non_negative(field, value, warnings);
        DealInputs {
            comparable_sales: self.comparable_sales.clone(),
            subject_sqft: w("subject_sqft", self.subject_sqft),
            arv: w("arv", self.arv),
            repairs: w("repairs", self.repairs),
            repair_items: self.repair_items.clone(),
            repair_rates: self.repair_rates.clone(),
            purchase_price: w("purchase_price", self.purchase_price),
            assignment_fee: w("assignment_fee", self.assignment_fee),
            marketing_costs: w("marketing_costs", self.marketing_costs),
            other_costs: w("other_costs", self.other_costs),
            custom_percentage: w("custom_percentage", self.custom_percentage),
            time_investment_hours: w("time_investment_hours", self.time_investment_hours),
            hourly_target: w("hourly_target", self.hourly_target),
            days_to_close: w("days_to_close", self.days_to_close),
            cash_invested: w("cash_invested", self.cash_invested),
            tax_lien_amount: w("tax_lien_amount", self.tax_lien_amount),
            custom_assignment_fee: w("custom_assignment_fee", self.custom_assignment_fee),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealAnalysis {
    /// ARV every downstream stage used
    pub effective_arv: Money,
    /// Repair figure every downstream stage used
    pub effective_repairs: Money,
    pub arv_estimate: ArvEstimate,
    pub repair_estimate: RepairEstimate,
    pub offer: OfferResult,
    pub custom_offer: CustomOfferResult,
    pub buyer_focused_offer: BuyerFocusedOfferResult,
    pub profitability: ProfitabilityResult,
    pub roi: RoiResult,
    #[cfg(feature = "tax_delinquent")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_delinquent: Option<TaxDelinquentOutput>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn analyze_deal(input: &DealInputs) -> ComputationOutput<DealAnalysis> {
    let start = Instant::now();
    let span = debug_span!("analyze_deal");
    let _enter = span.enter();

    let mut warnings: Vec<String> = Vec::new();
    let inputs = input.sanitized(&mut warnings);

    // --- 1. ARV ---
    let comps = &inputs.comparable_sales;
    if comps.len() > MAX_COMPARABLES {
        warnings.push(format!(
            "{} comparable sales supplied; only the first {MAX_COMPARABLES} are used",
            comps.len()
        ));
    }
    let comps = &comps[..comps.len().min(MAX_COMPARABLES)];
    warnings.extend(comparable_warnings(comps));
    let arv_estimate = degrade(
        "arv_estimate",
        estimate_arv(comps, inputs.subject_sqft),
        ArvEstimate::zeroed,
        &mut warnings,
    );
    let effective_arv = if arv_estimate.recommended_value > Decimal::ZERO {
        arv_estimate.recommended_value
    } else {
        inputs.arv
    };
    debug!(%effective_arv, recommended = %arv_estimate.recommended_value, "arv resolved");

    // --- 2. Repairs ---
    let repair_estimate = resolve_repairs(&inputs, &mut warnings);
    let effective_repairs = repair_estimate.total;
    debug!(%effective_repairs, mode = ?repair_estimate.mode, "repairs resolved");

    if effective_arv > Decimal::ZERO && effective_repairs > effective_arv {
        warnings.push("Repair budget exceeds ARV".into());
    }

    // --- 3. Offers ---
    let offer = degrade(
        "offer",
        compute_offer(effective_arv, effective_repairs),
        OfferResult::zeroed,
        &mut warnings,
    );
    let custom_offer = degrade(
        "custom_offer",
        compute_custom_offer(effective_arv, effective_repairs, inputs.custom_percentage),
        CustomOfferResult::zeroed,
        &mut warnings,
    );
    let buyer_focused_offer = degrade(
        "buyer_focused_offer",
        compute_buyer_focused_offer(effective_arv, effective_repairs),
        BuyerFocusedOfferResult::zeroed,
        &mut warnings,
    );
    debug!(
        mao = %offer.mao,
        lao = %offer.lao,
        buyer_mao = %buyer_focused_offer.mao,
        "offers computed"
    );

    // --- 4. Profitability ---
    let profit_input = ProfitabilityInput {
        arv: effective_arv,
        repairs: effective_repairs,
        purchase_price: inputs.purchase_price,
        assignment_fee: inputs.assignment_fee,
        marketing_costs: inputs.marketing_costs,
        other_costs: inputs.other_costs,
    };
    let profitability = match score_profitability(&profit_input) {
        Ok(result) => {
            warnings.extend(profitability_warnings(&profit_input, &result));
            result
        }
        Err(e) => {
            let net = net_profit(
                inputs.assignment_fee,
                inputs.marketing_costs,
                inputs.other_costs,
            )
            .unwrap_or_default();
            let margin = profit_margin(net, inputs.purchase_price).unwrap_or_default();
            degrade(
                "profitability",
                Err(e),
                || ProfitabilityResult::not_computable(net, margin),
                &mut warnings,
            )
        }
    };
    debug!(score = profitability.score, grade = ?profitability.grade, "deal scored");

    // --- 5. ROI ---
    let roi_input = RoiInput {
        net_profit: profitability.net_profit,
        time_investment_hours: inputs.time_investment_hours,
        hourly_target: inputs.hourly_target,
        days_to_close: inputs.days_to_close,
        cash_invested: inputs.cash_invested,
    };
    let roi = degrade("roi", compute_roi(&roi_input), RoiResult::zeroed, &mut warnings);

    // --- 6. Tax-delinquent scenarios ---
    #[cfg(feature = "tax_delinquent")]
    let tax_delinquent = if inputs.tax_lien_amount > Decimal::ZERO {
        let planned = plan_tax_delinquent(&TaxDelinquentInput {
            original_mao: buyer_focused_offer.mao,
            tax_lien: inputs.tax_lien_amount,
            custom_fee: inputs.custom_assignment_fee,
        });
        degrade("tax_delinquent", planned.map(Some), || None, &mut warnings)
    } else {
        None
    };

    let result = DealAnalysis {
        effective_arv,
        effective_repairs,
        arv_estimate,
        repair_estimate,
        offer,
        custom_offer,
        buyer_focused_offer,
        profitability,
        roi,
        #[cfg(feature = "tax_delinquent")]
        tax_delinquent,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Wholesale Deal Analysis (ARV, repairs, offers, profitability, ROI)",
        input,
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_repairs(inputs: &DealInputs, warnings: &mut Vec<String>) -> RepairEstimate {
    let flat = RepairEstimate {
        mode: RepairMode::Flat,
        total: total_repairs(inputs.repairs),
        breakdown: None,
    };

    let Some(quantities) = &inputs.repair_items else {
        return flat;
    };

    let default_rates = RepairRates::default();
    let rates = inputs.repair_rates.as_ref().unwrap_or(&default_rates);
    match estimate_repairs(quantities, rates) {
        Ok(breakdown) => {
            if inputs.repairs > Decimal::ZERO {
                warnings.push("Itemized repair sheet supplied; flat repairs figure ignored".into());
            }
            RepairEstimate {
                mode: RepairMode::Itemized,
                total: breakdown
                    .total
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
                breakdown: Some(breakdown),
            }
        }
        Err(e) => degrade("repair_items", Err(e), || flat, warnings),
    }
}

/// Unwrap a stage result or fall back to its documented zero value.
fn degrade<T>(
    stage: &str,
    result: DealResult<T>,
    fallback: impl FnOnce() -> T,
    warnings: &mut Vec<String>,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(stage, error = %e, "stage not computable; using zero result");
            warnings.push(format!("{stage} not computed: {e}"));
            fallback()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
