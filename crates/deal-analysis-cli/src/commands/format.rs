use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use deal_analysis_core::formatting;

#[derive(Debug, Clone, ValueEnum)]
pub enum FormatKind {
    /// Whole-dollar currency ($125,000)
    Currency,
    /// Value already x100 (81.5%)
    Percent,
    /// Fraction shown as a percentage (0.815 -> 81.5%)
    Rate,
    /// Price per square foot ($166.75)
    PerSqft,
    /// Lenient parse of display text back to a number
    Parse,
}

/// Arguments for display formatting
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FormatArgs {
    /// What to do with the value
    #[arg(long, value_enum, default_value = "currency")]
    pub kind: FormatKind,

    /// Value to format (or text to parse)
    pub value: String,
}

pub fn run_format(args: FormatArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amount = || -> Result<Decimal, String> {
        args.value
            .trim()
            .parse()
            .map_err(|e| format!("'{}' is not a number: {}", args.value, e))
    };
    let formatted = match args.kind {
        FormatKind::Currency => formatting::format_currency(amount()?),
        FormatKind::Percent => formatting::format_percent(amount()?),
        FormatKind::Rate => formatting::format_rate_percent(amount()?),
        FormatKind::PerSqft => formatting::format_per_sqft(amount()?),
        FormatKind::Parse => formatting::parse_amount(&args.value).to_string(),
    };
    Ok(json!({ "input": args.value, "formatted": formatted }))
}
