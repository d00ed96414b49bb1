mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::growth::GrowthArgs;
use commands::margin::MarginTaxArgs;
use commands::spreads::SpreadArgs;

/// Trade and wealth calculators with decimal precision
#[derive(Parser)]
#[command(
    name = "spreadmaster",
    version,
    about = "Trade and wealth calculators with decimal precision",
    long_about = "A CLI for sizing margin-funded trades after interest and tax, \
                  analysing bull and bear vertical call spreads, and projecting \
                  yearly compound growth with contributions."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Net profit of a margin-funded trade after interest and capital gains tax
    MarginTax(MarginTaxArgs),
    /// Bull or bear vertical call spread metrics and expiry payoff
    Spread(SpreadArgs),
    /// Year-by-year compound growth projection
    Growth(GrowthArgs),
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

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "spreadmaster=debug"
    } else {
        "spreadmaster=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // stdout carries the calculation output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::MarginTax(args) => commands::margin::run_margin_tax(args),
        Commands::Spread(args) => commands::spreads::run_spread(args),
        Commands::Growth(args) => commands::growth::run_growth(args),
        Commands::Version => {
            println!("spreadmaster {}", env!("CARGO_PKG_VERSION"));
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
