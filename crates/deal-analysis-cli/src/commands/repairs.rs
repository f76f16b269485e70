use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_analysis_core::repairs::{self, RepairInput, RepairQuantities, RepairRates};

use crate::input;

/// Arguments for the repair estimate
#[derive(Args)]
pub struct RepairsArgs {
    /// Flat repair total when no itemized sheet is given
    #[arg(long)]
    pub repairs: Option<Decimal>,

    /// Itemized quantity sheet (JSON or YAML)
    #[arg(long)]
    pub items: Option<String>,

    /// Repair rate table (JSON or YAML), defaults to the built-in rates
    #[arg(long)]
    pub rates: Option<String>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_repairs(args: RepairsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut repair_input: RepairInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let items: Option<RepairQuantities> = match args.items {
                Some(ref path) => Some(input::file::read_structured(path)?),
                None => None,
            };
            if items.is_none() && args.repairs.is_none() {
                return Err("--repairs or --items <sheet> is required (or provide --input)".into());
            }
            RepairInput {
                repairs: args.repairs.unwrap_or_default(),
                items,
                rates: None,
            }
        }
    };

    if let Some(ref path) = args.rates {
        let rates: RepairRates = input::file::read_structured(path)?;
        repair_input.rates = Some(rates);
    }
    if let Some(ref rates) = repair_input.rates {
        rates.validate()?;
    }

    let result = repairs::analyze_repairs(&repair_input)?;
    Ok(serde_json::to_value(result)?)
}
