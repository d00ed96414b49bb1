use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use spreadmaster_core::derivatives::spreads::{self, OptionsSpreadInput, SpreadStrategy};

use crate::input;

/// Arguments for the vertical call spread calculator
#[derive(Args)]
pub struct SpreadArgs {
    /// Spread variant, bull-call or bear-call [default: bull-call]
    #[arg(long)]
    pub strategy: Option<SpreadStrategy>,

    /// Current price of the underlying
    #[arg(long)]
    pub stock_price: Option<Decimal>,

    /// Lower strike (bought in a bull call, sold in a bear call)
    #[arg(long)]
    pub long_strike: Option<Decimal>,

    /// Higher strike (sold in a bull call, bought in a bear call)
    #[arg(long)]
    pub short_strike: Option<Decimal>,

    /// Per-share premium of the lower-strike leg
    #[arg(long)]
    pub long_premium: Option<Decimal>,

    /// Per-share premium of the higher-strike leg
    #[arg(long)]
    pub short_premium: Option<Decimal>,

    /// Number of contracts, 100 shares each [default: 1]
    #[arg(long)]
    pub contracts: Option<u32>,

    /// Days until expiry (informational)
    #[arg(long)]
    pub days_to_expiry: Option<u32>,

    /// Also emit the payoff at expiry across a price range
    #[arg(long)]
    pub payoff_table: bool,

    /// Low end of the payoff price range (default: stock price - 30%)
    #[arg(long, requires = "high")]
    pub low: Option<Decimal>,

    /// High end of the payoff price range (default: stock price + 30%)
    #[arg(long, requires = "low")]
    pub high: Option<Decimal>,

    /// Number of intervals in the payoff table
    #[arg(long)]
    pub steps: Option<u32>,

    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

impl SpreadArgs {
    fn flags_given(&self) -> bool {
        self.stock_price.is_some()
            || self.long_strike.is_some()
            || self.short_strike.is_some()
            || self.long_premium.is_some()
            || self.short_premium.is_some()
            || self.strategy.is_some()
            || self.contracts.is_some()
            || self.days_to_expiry.is_some()
    }

    fn to_input(&self) -> Result<OptionsSpreadInput, Box<dyn std::error::Error>> {
        Ok(OptionsSpreadInput {
            strategy: self.strategy.unwrap_or_default(),
            stock_price: self
                .stock_price
                .ok_or("--stock-price is required (or provide --input)")?,
            long_strike: self
                .long_strike
                .ok_or("--long-strike is required (or provide --input)")?,
            short_strike: self
                .short_strike
                .ok_or("--short-strike is required (or provide --input)")?,
            long_premium: self
                .long_premium
                .ok_or("--long-premium is required (or provide --input)")?,
            short_premium: self
                .short_premium
                .ok_or("--short-premium is required (or provide --input)")?,
            contracts: self.contracts.unwrap_or(1),
            days_to_expiry: self.days_to_expiry,
        })
    }

    fn price_range(&self) -> Option<(Decimal, Decimal)> {
        self.low.zip(self.high)
    }
}

pub fn run_spread(args: SpreadArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let spread_input: OptionsSpreadInput =
        match input::load(args.input.as_deref(), args.flags_given())? {
            Some(loaded) => loaded,
            None => args.to_input()?,
        };
    let analysis = spreads::analyze_options_spread(&spread_input)?;
    let mut value = serde_json::to_value(analysis)?;

    if args.payoff_table {
        let table = spreads::payoff_table(&spread_input, args.price_range(), args.steps)?;
        if let Value::Object(ref mut envelope) = value {
            envelope.insert("payoff_table".to_string(), serde_json::to_value(table)?);
        }
    }

    Ok(value)
}
