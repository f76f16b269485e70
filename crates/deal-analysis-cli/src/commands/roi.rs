use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_analysis_core::roi::{self, RoiInput};

use crate::input;

/// Arguments for the wholesaler ROI calculator
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RoiArgs {
    /// Net profit on the deal (may be negative)
    #[arg(long)]
    pub net_profit: Option<Decimal>,

    /// Hours spent on the deal
    #[arg(long, default_value = "0")]
    pub hours: Decimal,

    /// Target hourly rate
    #[arg(long, default_value = "0")]
    pub hourly_target: Decimal,

    /// Days from contract to close
    #[arg(long, default_value = "0")]
    pub days_to_close: Decimal,

    /// Cash put at risk (earnest money, marketing)
    #[arg(long, default_value = "0")]
    pub cash_invested: Decimal,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_roi(args: RoiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let roi_input: RoiInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => RoiInput {
            net_profit: args
                .net_profit
                .ok_or("--net-profit is required (or provide --input)")?,
            time_investment_hours: args.hours,
            hourly_target: args.hourly_target,
            days_to_close: args.days_to_close,
            cash_invested: args.cash_invested,
        },
    };
    let result = roi::analyze_roi(&roi_input)?;
    Ok(serde_json::to_value(result)?)
}
