use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use spreadmaster_core::margin::tax::{
    self, DurationUnit, MarginTaxInput, DEFAULT_CAPITAL_GAINS_TAX_PCT, DEFAULT_MARGIN_RATE_PCT,
};

use crate::input;

/// Arguments for the margin-funded trade calculator
#[derive(Args)]
pub struct MarginTaxArgs {
    /// Capital deployed in the trade (e.g. 10000)
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Percent move on the position; negative for a loss (e.g. 12.5)
    #[arg(long, allow_hyphen_values = true)]
    pub percent_gain: Option<Decimal>,

    /// Holding period length, in --unit
    #[arg(long)]
    pub duration: Option<Decimal>,

    /// Holding period unit, days or months [default: days]
    #[arg(long)]
    pub unit: Option<DurationUnit>,

    /// Annual margin interest rate in percent [default: 12.575]
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Capital gains tax rate in percent [default: 24]
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

impl MarginTaxArgs {
    fn flags_given(&self) -> bool {
        self.principal.is_some()
            || self.percent_gain.is_some()
            || self.duration.is_some()
            || self.unit.is_some()
            || self.rate.is_some()
            || self.tax_rate.is_some()
    }

    fn to_input(&self) -> Result<MarginTaxInput, Box<dyn std::error::Error>> {
        Ok(MarginTaxInput {
            principal: self
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            percent_gain: self
                .percent_gain
                .ok_or("--percent-gain is required (or provide --input)")?,
            duration: self
                .duration
                .ok_or("--duration is required (or provide --input)")?,
            duration_unit: self.unit.unwrap_or_default(),
            annual_interest_rate: self.rate.unwrap_or(DEFAULT_MARGIN_RATE_PCT),
            capital_gains_tax_rate: self.tax_rate.unwrap_or(DEFAULT_CAPITAL_GAINS_TAX_PCT),
        })
    }
}

pub fn run_margin_tax(args: MarginTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let margin_input: MarginTaxInput =
        match input::load(args.input.as_deref(), args.flags_given())? {
            Some(loaded) => loaded,
            None => args.to_input()?,
        };
    let result = tax::analyze_margin_tax(&margin_input)?;
    Ok(serde_json::to_value(result)?)
}
