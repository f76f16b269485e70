use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_analysis_core::arv::{self, ArvInput, ComparableSale};

use crate::input;

/// Arguments for the after-repair value estimate
#[derive(Args)]
pub struct ArvArgs {
    /// Comparable sale as PRICE:SQFT (repeat up to three times)
    #[arg(long = "comp", value_parser = parse_comp)]
    pub comps: Vec<ComparableSale>,

    /// Square footage of the subject property
    #[arg(long)]
    pub subject_sqft: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_arv(args: ArvArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let arv_input: ArvInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            if args.comps.is_empty() {
                return Err("at least one --comp PRICE:SQFT is required (or provide --input)".into());
            }
            ArvInput {
                comparable_sales: args.comps,
                subject_sqft: args.subject_sqft.unwrap_or_default(),
            }
        }
    };
    let result = arv::analyze_arv(&arv_input)?;
    Ok(serde_json::to_value(result)?)
}

/// `245000:1500` -> sale at $245,000 over 1,500 sqft. The footage may be
/// omitted (`245000`).
fn parse_comp(raw: &str) -> Result<ComparableSale, String> {
    let (price, sqft) = match raw.split_once(':') {
        Some((p, s)) => (p, Some(s)),
        None => (raw, None),
    };
    let price: Decimal = price
        .trim()
        .parse()
        .map_err(|e| format!("invalid comparable price '{price}': {e}"))?;
    let sqft: Decimal = match sqft {
        Some(s) => s
            .trim()
            .parse()
            .map_err(|e| format!("invalid comparable square footage '{s}': {e}"))?,
        None => Decimal::ZERO,
    };
    Ok(ComparableSale::new(price, sqft))
}
