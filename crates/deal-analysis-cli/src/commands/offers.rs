use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_analysis_core::offers::{self, OfferInput};

use crate::input;

/// Arguments for the offer engine
#[derive(Args)]
pub struct OffersArgs {
    /// After-repair value
    #[arg(long)]
    pub arv: Option<Decimal>,

    /// Repair budget
    #[arg(long, default_value = "0")]
    pub repairs: Decimal,

    /// Custom offer percentage of ARV (defaults to 75)
    #[arg(long)]
    pub custom_percentage: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_offers(args: OffersArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let offer_input: OfferInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => OfferInput {
            arv: args.arv.ok_or("--arv is required (or provide --input)")?,
            repairs: args.repairs,
            custom_percentage: args.custom_percentage.unwrap_or_default(),
        },
    };
    let result = offers::analyze_offers(&offer_input)?;
    Ok(serde_json::to_value(result)?)
}
