use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_analysis_core::tax_delinquent::{self, TaxDelinquentInput};

use crate::input;

/// Arguments for tax-delinquent fee scenarios
#[derive(Args)]
pub struct TaxDelinquentArgs {
    /// Buyer-focused MAO before the lien
    #[arg(long)]
    pub mao: Option<Decimal>,

    /// Outstanding tax lien
    #[arg(long)]
    pub tax_lien: Option<Decimal>,

    /// Extra assignment fee scenario
    #[arg(long, default_value = "0")]
    pub custom_fee: Decimal,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_tax_delinquent(args: TaxDelinquentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let td_input: TaxDelinquentInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => TaxDelinquentInput {
            original_mao: args.mao.ok_or("--mao is required (or provide --input)")?,
            tax_lien: args
                .tax_lien
                .ok_or("--tax-lien is required (or provide --input)")?,
            custom_fee: args.custom_fee,
        },
    };
    let result = tax_delinquent::analyze_tax_delinquent(&td_input)?;
    Ok(serde_json::to_value(result)?)
}
