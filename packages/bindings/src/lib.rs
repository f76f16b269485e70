use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use deal_analysis_core::offers::OfferInput;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Composite
// ---------------------------------------------------------------------------

/// Full deal analysis. Never rejects: failed stages come back zeroed with a
/// warning in the envelope.
#[napi]
pub fn analyze_deal(input_json: String) -> NapiResult<String> {
    let input: deal_analysis_core::DealInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analysis_core::analyze_deal(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// ARV and repairs
// ---------------------------------------------------------------------------

#[napi]
pub fn estimate_arv(input_json: String) -> NapiResult<String> {
    let input: deal_analysis_core::arv::ArvInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analysis_core::arv::analyze_arv(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn estimate_repairs(input_json: String) -> NapiResult<String> {
    let input: deal_analysis_core::repairs::RepairInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analysis_core::repairs::analyze_repairs(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Offers
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_offers(input_json: String) -> NapiResult<String> {
    let input: OfferInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analysis_core::offers::analyze_offers(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_offer(input_json: String) -> NapiResult<String> {
    let input: OfferInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analysis_core::offers::compute_offer(input.arv, input.repairs)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_custom_offer(input_json: String) -> NapiResult<String> {
    let input: OfferInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analysis_core::offers::compute_custom_offer(
        input.arv,
        input.repairs,
        input.custom_percentage,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_buyer_focused_offer(input_json: String) -> NapiResult<String> {
    let input: OfferInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analysis_core::offers::compute_buyer_focused_offer(input.arv, input.repairs)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Profitability and ROI
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate_profitability(input_json: String) -> NapiResult<String> {
    let input: deal_analysis_core::profitability::ProfitabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analysis_core::profitability::evaluate_profitability(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_roi(input_json: String) -> NapiResult<String> {
    let input: deal_analysis_core::roi::RoiInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analysis_core::roi::analyze_roi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_tax_delinquent(input_json: String) -> NapiResult<String> {
    let input: deal_analysis_core::tax_delinquent::TaxDelinquentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analysis_core::tax_delinquent::analyze_tax_delinquent(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(amount: f64) -> String {
    deal_analysis_core::formatting::format_currency_f64(amount)
}

/// `value` is already x100 (81.5 -> "81.5%"). Non-finite input shows as 0.
#[napi]
pub fn format_percent(value: f64) -> String {
    let value = Decimal::from_f64(value).unwrap_or_default();
    deal_analysis_core::formatting::format_percent(value)
}

/// Lenient parse of "$125,000"-style text; unparseable text yields "0".
#[napi]
pub fn parse_amount(text: String) -> String {
    deal_analysis_core::formatting::parse_amount(&text).to_string()
}
