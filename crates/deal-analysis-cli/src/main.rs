mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::analysis::AnalyzeArgs;
use commands::arv::ArvArgs;
use commands::format::FormatArgs;
use commands::offers::OffersArgs;
use commands::profitability::ProfitArgs;
use commands::repairs::RepairsArgs;
use commands::roi::RoiArgs;
use commands::tax_delinquent::TaxDelinquentArgs;

/// Wholesale real-estate deal analysis
#[derive(Parser)]
#[command(
    name = "dealcalc",
    version,
    about = "Wholesale real-estate deal analysis",
    long_about = "A CLI for analysing wholesale real-estate deals with decimal precision. \
                  Estimates after-repair value from comparables, prices repairs, computes \
                  MAO/LAO offers, scores profitability and plans tax-delinquent scenarios."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Emit debug diagnostics on stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis: ARV, repairs, offers, profitability, ROI
    Analyze(AnalyzeArgs),
    /// Estimate after-repair value from comparable sales
    Arv(ArvArgs),
    /// Estimate repair costs (flat or itemized)
    Repairs(RepairsArgs),
    /// Rapid, custom-percentage and buyer-focused offers
    Offers(OffersArgs),
    /// Score deal profitability (0-100) and grade it
    Profit(ProfitArgs),
    /// Wholesaler ROI: hourly rate, cash-on-cash, annualized
    Roi(RoiArgs),
    /// Offer scenarios for a property with a tax lien
    TaxDelinquent(TaxDelinquentArgs),
    /// Format or parse a display value
    Format(FormatArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analysis::run_analyze(args),
        Commands::Arv(args) => commands::arv::run_arv(args),
        Commands::Repairs(args) => commands::repairs::run_repairs(args),
        Commands::Offers(args) => commands::offers::run_offers(args),
        Commands::Profit(args) => commands::profitability::run_profit(args),
        Commands::Roi(args) => commands::roi::run_roi(args),
        Commands::TaxDelinquent(args) => commands::tax_delinquent::run_tax_delinquent(args),
        Commands::Format(args) => commands::format::run_format(args),
        Commands::Version => {
            println!("dealcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
