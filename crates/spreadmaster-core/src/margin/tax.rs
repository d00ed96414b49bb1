use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::SpreadMasterError;
use crate::types::{ensure_bounded, pct_to_rate, with_metadata, ComputationOutput, Money, Percent};
use crate::SpreadMasterResult;

/// Day-count basis for interest proration.
pub const DAYS_PER_YEAR: Decimal = dec!(365);

/// Broker margin rate pre-filled on the calculator form.
pub const DEFAULT_MARGIN_RATE_PCT: Percent = dec!(12.575);

/// Capital-gains tax rate pre-filled on the calculator form.
pub const DEFAULT_CAPITAL_GAINS_TAX_PCT: Percent = dec!(24);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Unit of the holding-period length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationUnit {
    #[default]
    #[serde(alias = "days")]
    Days,
    #[serde(alias = "months")]
    Months,
}

impl FromStr for DurationUnit {
    type Err = SpreadMasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" | "days" => Ok(DurationUnit::Days),
            "m" | "month" | "months" => Ok(DurationUnit::Months),
            other => Err(SpreadMasterError::invalid(
                "duration_unit",
                format!("Unknown unit '{other}' (expected days or months)"),
            )),
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationUnit::Days => write!(f, "days"),
            DurationUnit::Months => write!(f, "months"),
        }
    }
}

fn default_margin_rate() -> Percent {
    DEFAULT_MARGIN_RATE_PCT
}

fn default_tax_rate() -> Percent {
    DEFAULT_CAPITAL_GAINS_TAX_PCT
}

/// A leveraged position held for a period and closed at a gain or loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginTaxInput {
    /// Capital deployed in the position.
    pub principal: Money,
    /// Price move of the stock over the holding period, in percent.
    pub percent_gain: Percent,
    pub duration: Decimal,
    #[serde(default)]
    pub duration_unit: DurationUnit,
    #[serde(default = "default_margin_rate")]
    pub annual_interest_rate: Percent,
    #[serde(default = "default_tax_rate")]
    pub capital_gains_tax_rate: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginTaxResult {
    /// Holding period in whole days (display value; interest uses the
    /// unrounded period).
    pub holding_days: u32,
    pub gross_profit: Money,
    pub interest_cost: Money,
    pub tax_owed: Money,
    pub net_profit: Money,
    pub net_roi_pct: Percent,
    pub stock_gain_pct: Percent,
    /// Percentage points lost to interest and tax.
    pub diff_pct: Percent,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Normalise the holding period to (possibly fractional) days.
pub fn holding_period_days(duration: Decimal, unit: DurationUnit) -> Decimal {
    match unit {
        DurationUnit::Days => duration,
        DurationUnit::Months => duration * DAYS_PER_YEAR / dec!(12),
    }
}

fn validate_input(input: &MarginTaxInput) -> SpreadMasterResult<()> {
    ensure_bounded("principal", input.principal)?;
    ensure_bounded("percent_gain", input.percent_gain)?;
    ensure_bounded("duration", input.duration)?;
    ensure_bounded("annual_interest_rate", input.annual_interest_rate)?;

    if input.principal <= Decimal::ZERO {
        return Err(SpreadMasterError::invalid(
            "principal",
            "Principal must be positive (net ROI is undefined for zero principal)",
        ));
    }
    if input.duration <= Decimal::ZERO {
        return Err(SpreadMasterError::invalid(
            "duration",
            "Holding period must be positive",
        ));
    }
    if input.annual_interest_rate < Decimal::ZERO {
        return Err(SpreadMasterError::invalid(
            "annual_interest_rate",
            "Margin interest rate cannot be negative",
        ));
    }
    if input.capital_gains_tax_rate < Decimal::ZERO
        || input.capital_gains_tax_rate > Decimal::ONE_HUNDRED
    {
        return Err(SpreadMasterError::invalid(
            "capital_gains_tax_rate",
            "Tax rate must be between 0 and 100 percent",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Net profit on a margin position after simple-prorated interest and
/// capital-gains tax. Losses are neither taxed nor rebated.
pub fn compute_margin_tax(input: &MarginTaxInput) -> SpreadMasterResult<MarginTaxResult> {
    validate_input(input)?;

    let days = holding_period_days(input.duration, input.duration_unit);
    let holding_days = days
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .ok_or_else(|| SpreadMasterError::invalid("duration", "Holding period is too long"))?;

    let overflow = |field: &str| {
        SpreadMasterError::invalid(field, "Result exceeds the representable range")
    };

    let gross_profit = input
        .principal
        .checked_mul(pct_to_rate(input.percent_gain))
        .ok_or_else(|| overflow("percent_gain"))?;
    let interest_cost = input
        .principal
        .checked_mul(pct_to_rate(input.annual_interest_rate))
        .and_then(|annual| annual.checked_mul(days / DAYS_PER_YEAR))
        .ok_or_else(|| overflow("annual_interest_rate"))?;
    // Tax rate is capped at 100%, so this cannot exceed the gross profit
    let tax_owed = gross_profit.max(Decimal::ZERO) * pct_to_rate(input.capital_gains_tax_rate);
    let net_profit = gross_profit
        .checked_sub(interest_cost)
        .and_then(|after_interest| after_interest.checked_sub(tax_owed))
        .ok_or_else(|| overflow("annual_interest_rate"))?;
    let net_roi_pct = net_profit
        .checked_div(input.principal)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| overflow("annual_interest_rate"))?;

    Ok(MarginTaxResult {
        holding_days,
        gross_profit,
        interest_cost,
        tax_owed,
        net_profit,
        net_roi_pct,
        stock_gain_pct: input.percent_gain,
        diff_pct: input.percent_gain - net_roi_pct,
    })
}

/// [`compute_margin_tax`] wrapped in the standard output envelope.
pub fn analyze_margin_tax(
    input: &MarginTaxInput,
) -> SpreadMasterResult<ComputationOutput<MarginTaxResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compute_margin_tax(input)?;

    if result.gross_profit > Decimal::ZERO && result.net_profit < Decimal::ZERO {
        warnings.push(format!(
            "Interest and tax ({}) exceed the gross gain ({}); the position loses money",
            (result.interest_cost + result.tax_owed).round_dp(2),
            result.gross_profit.round_dp(2),
        ));
    }
    if input.percent_gain < dec!(-100) {
        warnings.push("Percent gain below -100% exceeds the full position value".to_string());
    }
    for w in &warnings {
        tracing::warn!(warning = %w, "margin tax");
    }

    tracing::debug!(
        holding_days = result.holding_days,
        net_profit = %result.net_profit,
        net_roi_pct = %result.net_roi_pct,
        "margin tax computed"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Margin Position Net Profit — Simple Interest Proration, Tax on Gains Only",
        &serde_json::json!({
            "day_count": "ACT/365",
            "days_per_month": "365/12",
            "interest": "simple, prorated daily",
            "tax_base": "positive gross profit only",
            "duration_unit": input.duration_unit.to_string(),
            "annual_interest_rate_pct": input.annual_interest_rate.to_string(),
            "capital_gains_tax_rate_pct": input.capital_gains_tax_rate.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn default_input() -> MarginTaxInput {
        MarginTaxInput {
            principal: dec!(10_000),
            percent_gain: dec!(12.5),
            duration: dec!(45),
            duration_unit: DurationUnit::Days,
            annual_interest_rate: dec!(12.575),
            capital_gains_tax_rate: dec!(24),
        }
    }

    // -----------------------------------------------------------------------
    // 1. Worked example
    // -----------------------------------------------------------------------
    #[test]
    fn test_worked_example() {
        let r = compute_margin_tax(&default_input()).unwrap();

        assert_eq!(r.holding_days, 45);
        assert_eq!(r.gross_profit, dec!(1250));
        // 10000 * 0.12575 * 45/365 = 155.034...
        assert_eq!(r.interest_cost.round_dp(2), dec!(155.03));
        assert_eq!(r.tax_owed, dec!(300));
        assert_eq!(r.net_profit.round_dp(2), dec!(794.97));
        assert_eq!(r.net_roi_pct.round_dp(4), dec!(7.9497));
        assert_eq!(r.stock_gain_pct, dec!(12.5));
        assert_eq!(r.diff_pct.round_dp(4), dec!(4.5503));
    }

    // -----------------------------------------------------------------------
    // 2. Net profit identity is exact
    // -----------------------------------------------------------------------
    #[test]
    fn test_net_profit_identity() {
        for gain in [dec!(-35), dec!(0), dec!(3.3), dec!(12.5), dec!(250)] {
            let input = MarginTaxInput {
                percent_gain: gain,
                ..default_input()
            };
            let r = compute_margin_tax(&input).unwrap();
            assert_eq!(r.net_profit, r.gross_profit - r.interest_cost - r.tax_owed);
            assert_eq!(r.diff_pct, r.stock_gain_pct - r.net_roi_pct);
        }
    }

    // -----------------------------------------------------------------------
    // 3. Losses are not taxed
    // -----------------------------------------------------------------------
    #[test]
    fn test_loss_generates_no_tax() {
        let input = MarginTaxInput {
            percent_gain: dec!(-10),
            ..default_input()
        };
        let r = compute_margin_tax(&input).unwrap();
        assert_eq!(r.gross_profit, dec!(-1000));
        assert_eq!(r.tax_owed, Decimal::ZERO);
        assert_eq!(r.net_profit, dec!(-1000) - r.interest_cost);
        assert!(r.net_roi_pct < dec!(-10));
    }

    #[test]
    fn test_zero_gain_generates_no_tax() {
        let input = MarginTaxInput {
            percent_gain: Decimal::ZERO,
            ..default_input()
        };
        let r = compute_margin_tax(&input).unwrap();
        assert_eq!(r.tax_owed, Decimal::ZERO);
        assert_eq!(r.net_profit, -r.interest_cost);
    }

    // -----------------------------------------------------------------------
    // 4. Months are converted at 365/12 days
    // -----------------------------------------------------------------------
    #[test]
    fn test_months_conversion() {
        let input = MarginTaxInput {
            duration: dec!(6),
            duration_unit: DurationUnit::Months,
            annual_interest_rate: dec!(10),
            ..default_input()
        };
        let r = compute_margin_tax(&input).unwrap();
        // 6 * 365 / 12 = 182.5 -> rounds half away from zero
        assert_eq!(r.holding_days, 183);
        // Interest uses the unrounded 182.5 days: 10000 * 0.10 * 0.5
        assert_eq!(r.interest_cost, dec!(500));
    }

    #[test]
    fn test_one_month_rounds_down() {
        let days = holding_period_days(dec!(1), DurationUnit::Months);
        assert!(days > dec!(30.41) && days < dec!(30.42));

        let input = MarginTaxInput {
            duration: dec!(1),
            duration_unit: DurationUnit::Months,
            ..default_input()
        };
        assert_eq!(compute_margin_tax(&input).unwrap().holding_days, 30);
    }

    #[test]
    fn test_days_pass_through() {
        assert_eq!(holding_period_days(dec!(45), DurationUnit::Days), dec!(45));
    }

    // -----------------------------------------------------------------------
    // 5. Validation
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_principal_rejected() {
        let input = MarginTaxInput {
            principal: Decimal::ZERO,
            ..default_input()
        };
        let err = compute_margin_tax(&input).unwrap_err();
        assert_eq!(err.field(), Some("principal"));
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let input = MarginTaxInput {
            duration: dec!(-3),
            ..default_input()
        };
        let err = compute_margin_tax(&input).unwrap_err();
        assert_eq!(err.field(), Some("duration"));
    }

    #[test]
    fn test_tax_rate_out_of_range_rejected() {
        let input = MarginTaxInput {
            capital_gains_tax_rate: dec!(101),
            ..default_input()
        };
        let err = compute_margin_tax(&input).unwrap_err();
        assert_eq!(err.field(), Some("capital_gains_tax_rate"));
    }

    #[test]
    fn test_negative_interest_rejected() {
        let input = MarginTaxInput {
            annual_interest_rate: dec!(-1),
            ..default_input()
        };
        assert!(compute_margin_tax(&input).is_err());
    }

    #[test]
    fn test_huge_principal_rejected() {
        let input = MarginTaxInput {
            principal: dec!(10_000_000_000_000_000_000),
            ..default_input()
        };
        let err = compute_margin_tax(&input).unwrap_err();
        assert_eq!(err.field(), Some("principal"));
    }

    #[test]
    fn test_interest_overflow_rejected() {
        let input = MarginTaxInput {
            principal: dec!(1_000_000_000_000_000),
            annual_interest_rate: dec!(1_000_000_000_000_000),
            duration: dec!(1_000_000),
            ..default_input()
        };
        let err = compute_margin_tax(&input).unwrap_err();
        assert_eq!(err.field(), Some("annual_interest_rate"));
        assert!(analyze_margin_tax(&input).is_err());
    }

    #[test]
    fn test_largest_bounded_gain_still_computes() {
        let input = MarginTaxInput {
            principal: dec!(1_000_000_000_000_000),
            percent_gain: dec!(1_000_000_000_000_000),
            annual_interest_rate: Decimal::ZERO,
            ..default_input()
        };
        let r = compute_margin_tax(&input).unwrap();
        assert_eq!(r.gross_profit, dec!(10_000_000_000_000_000_000_000_000_000));
        assert_eq!(r.interest_cost, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 6. Idempotence
    // -----------------------------------------------------------------------
    #[test]
    fn test_idempotent() {
        let input = default_input();
        assert_eq!(
            compute_margin_tax(&input).unwrap(),
            compute_margin_tax(&input).unwrap()
        );
    }

    // -----------------------------------------------------------------------
    // 7. Envelope and warnings
    // -----------------------------------------------------------------------
    #[test]
    fn test_analyze_no_warnings_for_profitable_trade() {
        let out = analyze_margin_tax(&default_input()).unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.assumptions["day_count"], "ACT/365");
        assert_eq!(out.result, compute_margin_tax(&default_input()).unwrap());
    }

    #[test]
    fn test_analyze_warns_when_costs_exceed_gain() {
        // 1% gain over a year at 12.575% interest
        let input = MarginTaxInput {
            percent_gain: dec!(1),
            duration: dec!(365),
            ..default_input()
        };
        let out = analyze_margin_tax(&input).unwrap();
        assert!(out.result.net_profit < Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("exceed the gross gain"));
    }

    // -----------------------------------------------------------------------
    // 8. Serde defaults and unit parsing
    // -----------------------------------------------------------------------
    #[test]
    fn test_deserialize_with_form_defaults() {
        let input: MarginTaxInput = serde_json::from_str(
            r#"{ "principal": "10000", "percent_gain": "12.5", "duration": "45" }"#,
        )
        .unwrap();
        assert_eq!(input, default_input());
    }

    #[test]
    fn test_duration_unit_from_str() {
        assert_eq!("days".parse::<DurationUnit>().unwrap(), DurationUnit::Days);
        assert_eq!(" Months ".parse::<DurationUnit>().unwrap(), DurationUnit::Months);
        assert_eq!("m".parse::<DurationUnit>().unwrap(), DurationUnit::Months);
        assert!("weeks".parse::<DurationUnit>().is_err());
    }
}
