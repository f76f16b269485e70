use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use deal_analysis_core::repairs::RepairRates;
use deal_analysis_core::{analyze_deal, DealInputs};

use crate::input;

/// Arguments for the full deal analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON or YAML file with the full deal inputs
    #[arg(long)]
    pub input: Option<String>,

    /// Repair rate table (JSON or YAML) for an itemized repair sheet
    #[arg(long)]
    pub rates: Option<String>,

    /// After-repair value, used when no comparables are given
    #[arg(long)]
    pub arv: Option<Decimal>,

    /// Flat repair budget
    #[arg(long)]
    pub repairs: Option<Decimal>,

    /// Contract purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Assignment fee charged to the end buyer
    #[arg(long)]
    pub assignment_fee: Option<Decimal>,

    /// Marketing spend for this deal
    #[arg(long)]
    pub marketing_costs: Option<Decimal>,

    /// Other deal costs
    #[arg(long)]
    pub other_costs: Option<Decimal>,

    /// Custom offer percentage of ARV (defaults to 75)
    #[arg(long)]
    pub custom_percentage: Option<Decimal>,

    /// Outstanding tax lien, enables the tax-delinquent scenarios
    #[arg(long)]
    pub tax_lien: Option<Decimal>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut deal: DealInputs = match input::read_input(args.input.as_deref())? {
        Some(deal) => deal,
        None => DealInputs {
            arv: args
                .arv
                .ok_or("--arv is required (or provide --input / stdin)")?,
            repairs: args.repairs.unwrap_or_default(),
            purchase_price: args.purchase_price.unwrap_or_default(),
            assignment_fee: args.assignment_fee.unwrap_or_default(),
            marketing_costs: args.marketing_costs.unwrap_or_default(),
            other_costs: args.other_costs.unwrap_or_default(),
            custom_percentage: args.custom_percentage.unwrap_or_default(),
            tax_lien_amount: args.tax_lien.unwrap_or_default(),
            ..DealInputs::default()
        },
    };

    if let Some(ref path) = args.rates {
        let rates: RepairRates = input::file::read_structured(path)?;
        rates.validate()?;
        debug!(path = %path, "custom repair rates loaded");
        deal.repair_rates = Some(rates);
    }

    let result = analyze_deal(&deal);
    Ok(serde_json::to_value(result)?)
}
