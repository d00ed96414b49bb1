//! Raw text-box records as submitted by a front end, and their conversion
//! into typed calculation inputs.
//!
//! Every numeric field arrives as a string. A required field that is blank or
//! not a finite number makes `parse` fail with `InvalidInput`; nothing is
//! computed from a partially valid form.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::SpreadMasterError;
use crate::SpreadMasterResult;

#[cfg(feature = "derivatives")]
use crate::derivatives::spreads::{OptionsSpreadInput, SpreadStrategy};
#[cfg(feature = "margin")]
use crate::margin::tax::{
    DurationUnit, MarginTaxInput, DEFAULT_CAPITAL_GAINS_TAX_PCT, DEFAULT_MARGIN_RATE_PCT,
};
#[cfg(feature = "wealth")]
use crate::wealth::growth::YearlyGrowthInput;

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// Strip currency symbols, thousands separators, a trailing percent sign and
/// surrounding whitespace.
fn clean(raw: &str) -> String {
    raw.trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | '$') && !c.is_whitespace())
        .collect()
}

/// Parse a required numeric field.
pub fn parse_decimal(field: &str, raw: &str) -> SpreadMasterResult<Decimal> {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return Err(SpreadMasterError::invalid(field, "Value is required"));
    }
    let parsed = if cleaned.contains(['e', 'E']) {
        Decimal::from_scientific(&cleaned)
    } else {
        Decimal::from_str(&cleaned)
    };
    parsed.map_err(|_| {
        SpreadMasterError::invalid(field, format!("'{}' is not a finite number", raw.trim()))
    })
}

/// Parse an optional numeric field; blank or unparseable text yields `None`.
pub fn parse_optional_decimal(raw: &str) -> Option<Decimal> {
    parse_decimal("", raw).ok()
}

/// Parse a field that must hold a positive whole number.
pub fn parse_count(field: &str, raw: &str) -> SpreadMasterResult<u32> {
    let value = parse_decimal(field, raw)?;
    if value <= Decimal::ZERO || !value.fract().is_zero() {
        return Err(SpreadMasterError::invalid(
            field,
            "Must be a positive whole number",
        ));
    }
    value
        .to_u32()
        .ok_or_else(|| SpreadMasterError::invalid(field, "Value is too large"))
}

// ---------------------------------------------------------------------------
// Margin
// ---------------------------------------------------------------------------

#[cfg(feature = "margin")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginTaxForm {
    pub principal: String,
    pub percent_gain: String,
    pub duration: String,
    pub duration_unit: String,
    pub annual_interest_rate: String,
    pub capital_gains_tax_rate: String,
}

#[cfg(feature = "margin")]
impl Default for MarginTaxForm {
    fn default() -> Self {
        Self {
            principal: String::new(),
            percent_gain: String::new(),
            duration: String::new(),
            duration_unit: DurationUnit::Days.to_string(),
            annual_interest_rate: DEFAULT_MARGIN_RATE_PCT.to_string(),
            capital_gains_tax_rate: DEFAULT_CAPITAL_GAINS_TAX_PCT.to_string(),
        }
    }
}

#[cfg(feature = "margin")]
impl MarginTaxForm {
    pub fn parse(&self) -> SpreadMasterResult<MarginTaxInput> {
        let duration_unit = if self.duration_unit.trim().is_empty() {
            DurationUnit::default()
        } else {
            self.duration_unit.parse()?
        };
        Ok(MarginTaxInput {
            principal: parse_decimal("principal", &self.principal)?,
            percent_gain: parse_decimal("percent_gain", &self.percent_gain)?,
            duration: parse_decimal("duration", &self.duration)?,
            duration_unit,
            annual_interest_rate: parse_decimal(
                "annual_interest_rate",
                &self.annual_interest_rate,
            )?,
            capital_gains_tax_rate: parse_decimal(
                "capital_gains_tax_rate",
                &self.capital_gains_tax_rate,
            )?,
        })
    }
}

// ---------------------------------------------------------------------------
// Options spread
// ---------------------------------------------------------------------------

#[cfg(feature = "derivatives")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsSpreadForm {
    pub strategy: String,
    pub stock_price: String,
    pub long_strike: String,
    pub short_strike: String,
    pub long_premium: String,
    pub short_premium: String,
    pub days_to_expiry: String,
    pub contracts: String,
}

#[cfg(feature = "derivatives")]
impl Default for OptionsSpreadForm {
    fn default() -> Self {
        Self {
            strategy: SpreadStrategy::BullCall.to_string(),
            stock_price: String::new(),
            long_strike: String::new(),
            short_strike: String::new(),
            long_premium: String::new(),
            short_premium: String::new(),
            days_to_expiry: String::new(),
            contracts: "1".to_string(),
        }
    }
}

#[cfg(feature = "derivatives")]
impl OptionsSpreadForm {
    pub fn parse(&self) -> SpreadMasterResult<OptionsSpreadInput> {
        let strategy = if self.strategy.trim().is_empty() {
            SpreadStrategy::default()
        } else {
            self.strategy.parse()?
        };
        Ok(OptionsSpreadInput {
            strategy,
            stock_price: parse_decimal("stock_price", &self.stock_price)?,
            long_strike: parse_decimal("long_strike", &self.long_strike)?,
            short_strike: parse_decimal("short_strike", &self.short_strike)?,
            long_premium: parse_decimal("long_premium", &self.long_premium)?,
            short_premium: parse_decimal("short_premium", &self.short_premium)?,
            contracts: parse_count("contracts", &self.contracts)?,
            days_to_expiry: parse_optional_decimal(&self.days_to_expiry)
                .and_then(|d| d.trunc().to_u32()),
        })
    }
}

// ---------------------------------------------------------------------------
// Yearly growth
// ---------------------------------------------------------------------------

#[cfg(feature = "wealth")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearlyGrowthForm {
    pub initial_amount: String,
    pub annual_growth_rate_pct: String,
    pub annual_contribution: String,
}

#[cfg(feature = "wealth")]
impl YearlyGrowthForm {
    /// Contribution is the one lenient field: blank or garbage means none.
    pub fn parse(&self) -> SpreadMasterResult<YearlyGrowthInput> {
        Ok(YearlyGrowthInput {
            initial_amount: parse_decimal("initial_amount", &self.initial_amount)?,
            annual_growth_rate_pct: parse_decimal(
                "annual_growth_rate_pct",
                &self.annual_growth_rate_pct,
            )?,
            annual_contribution: parse_optional_decimal(&self.annual_contribution),
            horizon_years: None,
            start_year: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_plain_and_decorated() {
        assert_eq!(parse_decimal("x", "12.5").unwrap(), dec!(12.5));
        assert_eq!(parse_decimal("x", "  10,000 ").unwrap(), dec!(10000));
        assert_eq!(parse_decimal("x", "$1,250.75").unwrap(), dec!(1250.75));
        assert_eq!(parse_decimal("x", "24%").unwrap(), dec!(24));
        assert_eq!(parse_decimal("x", "-3.5").unwrap(), dec!(-3.5));
        assert_eq!(parse_decimal("x", "1.5e3").unwrap(), dec!(1500));
    }

    #[test]
    fn test_parse_decimal_rejects_non_finite_and_blank() {
        for raw in ["", "   ", "NaN", "inf", "-Infinity", "abc", "12.5.1"] {
            let err = parse_decimal("principal", raw).unwrap_err();
            assert_eq!(err.field(), Some("principal"));
        }
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("contracts", "3").unwrap(), 3);
        assert_eq!(parse_count("contracts", "2.0").unwrap(), 2);
        assert!(parse_count("contracts", "0").is_err());
        assert!(parse_count("contracts", "1.5").is_err());
        assert!(parse_count("contracts", "-2").is_err());
    }

    #[cfg(feature = "margin")]
    #[test]
    fn test_margin_form_uses_prefilled_rates() {
        let form = MarginTaxForm {
            principal: "10,000".into(),
            percent_gain: "12.5".into(),
            duration: "45".into(),
            ..MarginTaxForm::default()
        };
        let input = form.parse().unwrap();
        assert_eq!(input.principal, dec!(10000));
        assert_eq!(input.annual_interest_rate, dec!(12.575));
        assert_eq!(input.capital_gains_tax_rate, dec!(24));
        assert_eq!(input.duration_unit, DurationUnit::Days);
    }

    #[cfg(feature = "margin")]
    #[test]
    fn test_margin_form_any_bad_field_fails() {
        let form = MarginTaxForm {
            principal: "10000".into(),
            percent_gain: "12.5".into(),
            duration: "45".into(),
            capital_gains_tax_rate: "".into(),
            ..MarginTaxForm::default()
        };
        let err = form.parse().unwrap_err();
        assert_eq!(err.field(), Some("capital_gains_tax_rate"));
    }

    #[cfg(feature = "margin")]
    #[test]
    fn test_margin_form_months() {
        let form: MarginTaxForm = serde_json::from_str(
            r#"{ "principal": "5000", "percent_gain": "8", "duration": "3", "duration_unit": "months" }"#,
        )
        .unwrap();
        assert_eq!(form.parse().unwrap().duration_unit, DurationUnit::Months);
    }

    #[cfg(feature = "derivatives")]
    #[test]
    fn test_spread_form_parses_worked_example() {
        let form = OptionsSpreadForm {
            strategy: "bear-call".into(),
            stock_price: "450.00".into(),
            long_strike: "440".into(),
            short_strike: "460".into(),
            long_premium: "15.50".into(),
            short_premium: "8.75".into(),
            days_to_expiry: "30".into(),
            ..OptionsSpreadForm::default()
        };
        let input = form.parse().unwrap();
        assert_eq!(input.strategy, SpreadStrategy::BearCall);
        assert_eq!(input.contracts, 1);
        assert_eq!(input.days_to_expiry, Some(30));
        assert_eq!(input.long_premium, dec!(15.50));
    }

    #[cfg(feature = "derivatives")]
    #[test]
    fn test_spread_form_blank_expiry_is_none() {
        let form = OptionsSpreadForm {
            stock_price: "450".into(),
            long_strike: "440".into(),
            short_strike: "460".into(),
            long_premium: "15.50".into(),
            short_premium: "8.75".into(),
            ..OptionsSpreadForm::default()
        };
        let input = form.parse().unwrap();
        assert_eq!(input.days_to_expiry, None);
        assert_eq!(input.strategy, SpreadStrategy::BullCall);
    }

    #[cfg(feature = "derivatives")]
    #[test]
    fn test_spread_form_bad_strategy() {
        let form = OptionsSpreadForm {
            strategy: "straddle".into(),
            ..OptionsSpreadForm::default()
        };
        let err = form.parse().unwrap_err();
        assert_eq!(err.field(), Some("strategy"));
    }

    #[cfg(feature = "wealth")]
    #[test]
    fn test_growth_form_contribution_defaults() {
        for raw in ["", "n/a"] {
            let form = YearlyGrowthForm {
                initial_amount: "10,000".into(),
                annual_growth_rate_pct: "7.00".into(),
                annual_contribution: raw.into(),
            };
            assert_eq!(form.parse().unwrap().annual_contribution, None);
        }
    }

    #[cfg(feature = "wealth")]
    #[test]
    fn test_growth_form_required_fields() {
        let form = YearlyGrowthForm {
            initial_amount: "10000".into(),
            annual_growth_rate_pct: "".into(),
            annual_contribution: "1200".into(),
        };
        let err = form.parse().unwrap_err();
        assert_eq!(err.field(), Some("annual_growth_rate_pct"));
    }
}
