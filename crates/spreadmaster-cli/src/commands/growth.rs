use chrono::Datelike;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use spreadmaster_core::wealth::growth::{self, YearlyGrowthInput, DEFAULT_HORIZON_YEARS};

use crate::input;

/// Arguments for the yearly growth projection
#[derive(Args)]
pub struct GrowthArgs {
    /// Starting balance
    #[arg(long)]
    pub initial: Option<Decimal>,

    /// Annual growth rate in percent (may be negative)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Amount added at the end of every year
    #[arg(long)]
    pub contribution: Option<Decimal>,

    /// Projection horizon in years [default: 25]
    #[arg(long)]
    pub years: Option<u32>,

    /// Calendar year the projection starts from (default: current year)
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

impl GrowthArgs {
    fn flags_given(&self) -> bool {
        self.initial.is_some()
            || self.rate.is_some()
            || self.contribution.is_some()
            || self.years.is_some()
            || self.start_year.is_some()
    }

    fn to_input(&self) -> Result<YearlyGrowthInput, Box<dyn std::error::Error>> {
        Ok(YearlyGrowthInput {
            initial_amount: self
                .initial
                .ok_or("--initial is required (or provide --input)")?,
            annual_growth_rate_pct: self
                .rate
                .ok_or("--rate is required (or provide --input)")?,
            annual_contribution: self.contribution,
            horizon_years: Some(self.years.unwrap_or(DEFAULT_HORIZON_YEARS)),
            start_year: self.start_year,
        })
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn run_growth(args: GrowthArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut growth_input: YearlyGrowthInput =
        match input::load(args.input.as_deref(), args.flags_given())? {
            Some(loaded) => loaded,
            None => args.to_input()?,
        };
    if growth_input.start_year.is_none() {
        growth_input.start_year = Some(args.start_year.unwrap_or_else(current_year));
    }
    let result = growth::analyze_yearly_growth(&growth_input)?;
    Ok(serde_json::to_value(result)?)
}
