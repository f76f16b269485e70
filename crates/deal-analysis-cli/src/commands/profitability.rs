use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_analysis_core::profitability::{self, ProfitabilityInput};

use crate::input;

/// Arguments for deal profitability scoring
#[derive(Args)]
pub struct ProfitArgs {
    /// After-repair value
    #[arg(long)]
    pub arv: Option<Decimal>,

    /// Repair budget
    #[arg(long, default_value = "0")]
    pub repairs: Decimal,

    /// Contract purchase price
    #[arg(long, default_value = "0")]
    pub purchase_price: Decimal,

    /// Assignment fee
    #[arg(long, default_value = "0")]
    pub assignment_fee: Decimal,

    /// Marketing spend
    #[arg(long, default_value = "0")]
    pub marketing_costs: Decimal,

    /// Other deal costs
    #[arg(long, default_value = "0")]
    pub other_costs: Decimal,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_profit(args: ProfitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profit_input: ProfitabilityInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => ProfitabilityInput {
            arv: args.arv.ok_or("--arv is required (or provide --input)")?,
            repairs: args.repairs,
            purchase_price: args.purchase_price,
            assignment_fee: args.assignment_fee,
            marketing_costs: args.marketing_costs,
            other_costs: args.other_costs,
        },
    };
    let result = profitability::evaluate_profitability(&profit_input)?;
    Ok(serde_json::to_value(result)?)
}
