use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::SpreadMasterError;
use crate::time_value::{checked_annuity_fv, checked_compound};
use crate::types::{ensure_bounded, pct_to_rate, with_metadata, ComputationOutput, Money, Percent};
use crate::SpreadMasterResult;

/// Projection horizon of the yearly growth table.
pub const DEFAULT_HORIZON_YEARS: u32 = 25;

pub const MAX_HORIZON_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyGrowthInput {
    pub initial_amount: Money,
    pub annual_growth_rate_pct: Percent,
    /// Paid at the end of each year. Absent means no contributions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_contribution: Option<Money>,
    /// Number of yearly points to produce (default 25).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_years: Option<u32>,
    /// Calendar year of "now"; points are labelled `start_year + offset`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
}

/// Portfolio state `year_offset` years from now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    pub year_offset: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_year: Option<i32>,
    pub projected_amount: Money,
    pub cumulative_contributions: Money,
    pub cumulative_profit: Money,
    pub cumulative_growth_pct: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyGrowthResult {
    pub points: Vec<YearPoint>,
    pub final_amount: Money,
    pub total_contributions: Money,
    pub total_profit: Money,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &YearlyGrowthInput) -> SpreadMasterResult<u32> {
    ensure_bounded("initial_amount", input.initial_amount)?;
    ensure_bounded("annual_growth_rate_pct", input.annual_growth_rate_pct)?;

    if input.initial_amount < Decimal::ZERO {
        return Err(SpreadMasterError::invalid(
            "initial_amount",
            "Initial amount cannot be negative",
        ));
    }
    if input.annual_growth_rate_pct < dec!(-100) {
        return Err(SpreadMasterError::invalid(
            "annual_growth_rate_pct",
            "Growth rate cannot be below -100%",
        ));
    }
    if let Some(contribution) = input.annual_contribution {
        ensure_bounded("annual_contribution", contribution)?;
        if contribution < Decimal::ZERO {
            return Err(SpreadMasterError::invalid(
                "annual_contribution",
                "Contribution cannot be negative",
            ));
        }
    }

    let horizon = input.horizon_years.unwrap_or(DEFAULT_HORIZON_YEARS);
    if horizon == 0 || horizon > MAX_HORIZON_YEARS {
        return Err(SpreadMasterError::invalid(
            "horizon_years",
            format!("Horizon must be between 1 and {MAX_HORIZON_YEARS} years"),
        ));
    }
    Ok(horizon)
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Year-by-year compound growth of an initial amount plus end-of-year
/// contributions.
pub fn project_yearly_growth(input: &YearlyGrowthInput) -> SpreadMasterResult<YearlyGrowthResult> {
    let horizon = validate_input(input)?;

    let rate = pct_to_rate(input.annual_growth_rate_pct);
    let contribution = input.annual_contribution.unwrap_or(Decimal::ZERO);
    let overflow = |year: u32| {
        SpreadMasterError::invalid(
            "annual_growth_rate_pct",
            format!("Projection exceeds the representable range at year {year}"),
        )
    };

    let mut points = Vec::with_capacity(horizon as usize);
    for i in 1..=horizon {
        let fv_initial = checked_compound(rate, i)
            .and_then(|factor| input.initial_amount.checked_mul(factor))
            .ok_or_else(|| overflow(i))?;
        let fv_contributions = checked_annuity_fv(contribution, rate, i).ok_or_else(|| overflow(i))?;
        let projected_amount = fv_initial
            .checked_add(fv_contributions)
            .ok_or_else(|| overflow(i))?;

        let cumulative_contributions = input.initial_amount + contribution * Decimal::from(i);
        let cumulative_profit = projected_amount - cumulative_contributions;
        let cumulative_growth_pct = if cumulative_contributions > Decimal::ZERO {
            cumulative_profit
                .checked_div(cumulative_contributions)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or_else(|| overflow(i))?
        } else {
            Decimal::ZERO
        };

        points.push(YearPoint {
            year_offset: i,
            calendar_year: input.start_year.and_then(|y| y.checked_add_unsigned(i)),
            projected_amount,
            cumulative_contributions,
            cumulative_profit,
            cumulative_growth_pct,
        });
    }

    let (final_amount, total_contributions, total_profit) = points
        .last()
        .map(|p| (p.projected_amount, p.cumulative_contributions, p.cumulative_profit))
        .unwrap_or_default();

    Ok(YearlyGrowthResult {
        points,
        final_amount,
        total_contributions,
        total_profit,
    })
}

/// [`project_yearly_growth`] wrapped in the standard output envelope.
pub fn analyze_yearly_growth(
    input: &YearlyGrowthInput,
) -> SpreadMasterResult<ComputationOutput<YearlyGrowthResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = project_yearly_growth(input)?;

    let contributes = input.annual_contribution.is_some_and(|c| c > Decimal::ZERO);
    if input.annual_growth_rate_pct < Decimal::ZERO && contributes {
        warnings.push(
            "Negative growth rate: contributions are summed without compounding".to_string(),
        );
    }
    if result.total_profit < Decimal::ZERO {
        warnings.push(format!(
            "Projection loses {} against total contributions",
            result.total_profit.abs().round_dp(2)
        ));
    }
    for w in &warnings {
        tracing::warn!(warning = %w, "yearly growth");
    }

    tracing::debug!(
        years = result.points.len(),
        final_amount = %result.final_amount,
        total_profit = %result.total_profit,
        "yearly growth projected"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Compound Growth — Annual Compounding with End-of-Year Contributions",
        &serde_json::json!({
            "compounding": "annual",
            "contribution_timing": "end of year (ordinary annuity)",
            "annual_growth_rate_pct": input.annual_growth_rate_pct.to_string(),
            "annual_contribution": input.annual_contribution.unwrap_or(Decimal::ZERO).to_string(),
            "horizon_years": result.points.len(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
