use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::SpreadMasterError;
use crate::types::{ensure_bounded, with_metadata, ComputationOutput, Money, Percent};
use crate::SpreadMasterResult;

/// Shares controlled by one listed option contract.
pub const CONTRACT_MULTIPLIER: Decimal = dec!(100);

/// Price steps used for a payoff table when none are requested.
pub const DEFAULT_PAYOFF_STEPS: u32 = 20;

/// Upper bound on payoff table resolution.
pub const MAX_PAYOFF_STEPS: u32 = 10_000;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Vertical call spread variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpreadStrategy {
    /// Buy the lower-strike call, sell the higher-strike call (net debit).
    #[default]
    #[serde(alias = "bull-call", alias = "bull_call")]
    BullCall,
    /// Sell the lower-strike call, buy the higher-strike call (net credit).
    #[serde(alias = "bear-call", alias = "bear_call")]
    BearCall,
}

impl SpreadStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            SpreadStrategy::BullCall => "Bull Call Spread",
            SpreadStrategy::BearCall => "Bear Call Spread",
        }
    }

    /// Whether opening the spread pays or collects premium.
    pub fn premium_flow(&self) -> PremiumFlow {
        match self {
            SpreadStrategy::BullCall => PremiumFlow::Debit,
            SpreadStrategy::BearCall => PremiumFlow::Credit,
        }
    }
}

impl FromStr for SpreadStrategy {
    type Err = SpreadMasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "bullcall" | "bullcallspread" => Ok(SpreadStrategy::BullCall),
            "bearcall" | "bearcallspread" => Ok(SpreadStrategy::BearCall),
            _ => Err(SpreadMasterError::invalid(
                "strategy",
                format!("Unknown strategy '{}' (expected bull-call or bear-call)", s.trim()),
            )),
        }
    }
}

impl fmt::Display for SpreadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpreadStrategy::BullCall => write!(f, "bull-call"),
            SpreadStrategy::BearCall => write!(f, "bear-call"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PremiumFlow {
    Debit,
    Credit,
}

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

fn default_contracts() -> u32 {
    1
}

/// A two-leg vertical call spread.
///
/// The `long_*` fields always describe the lower-strike leg and the
/// `short_*` fields the higher-strike leg. In a bull call the lower leg is
/// bought; in a bear call it is sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsSpreadInput {
    #[serde(default)]
    pub strategy: SpreadStrategy,
    pub stock_price: Money,
    pub long_strike: Money,
    pub short_strike: Money,
    pub long_premium: Money,
    pub short_premium: Money,
    #[serde(default = "default_contracts")]
    pub contracts: u32,
    /// Informational only; payoffs are evaluated at expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_to_expiry: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsSpreadResult {
    pub strategy: SpreadStrategy,
    pub premium_flow: PremiumFlow,
    /// Positive for a debit paid, negative for a credit received.
    pub net_debit_or_credit: Money,
    pub max_profit: Money,
    pub max_loss: Money,
    /// Conventional quoted breakeven: lower strike plus the signed net
    /// premium per share (debit for a bull call, `short - long` for a bear call).
    pub breakeven: Money,
    /// Underlying price at which the expiry payoff is exactly zero.
    pub zero_payoff_price: Money,
    pub return_on_risk_pct: Percent,
    /// Payoff if the underlying finishes at the current stock price.
    pub profit_at_expiry: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffPoint {
    pub underlying_price: Money,
    pub payoff: Money,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Dollar levels of a validated spread.
struct SpreadLevels {
    multiplier: Decimal,
    net_debit: Money,
    max_profit: Money,
    max_loss: Money,
}

fn spread_levels(input: &OptionsSpreadInput) -> SpreadLevels {
    let multiplier = Decimal::from(input.contracts) * CONTRACT_MULTIPLIER;
    let width = (input.short_strike - input.long_strike) * multiplier;

    match input.strategy {
        SpreadStrategy::BullCall => {
            let net_debit = (input.long_premium - input.short_premium) * multiplier;
            SpreadLevels {
                multiplier,
                net_debit,
                max_profit: width - net_debit,
                max_loss: net_debit,
            }
        }
        SpreadStrategy::BearCall => {
            let net_debit = (input.short_premium - input.long_premium) * multiplier;
            let credit = net_debit.abs();
            SpreadLevels {
                multiplier,
                net_debit,
                max_profit: credit,
                max_loss: width - credit,
            }
        }
    }
}

/// Piecewise expiry payoff: flat below the lower strike, flat above the
/// upper strike, linear in between. Continuous at both strikes.
fn payoff_with_levels(input: &OptionsSpreadInput, levels: &SpreadLevels, price: Money) -> Money {
    let intrinsic = (price - input.long_strike) * levels.multiplier;
    match input.strategy {
        SpreadStrategy::BullCall => {
            if price <= input.long_strike {
                -levels.net_debit
            } else if price >= input.short_strike {
                levels.max_profit
            } else {
                intrinsic - levels.net_debit
            }
        }
        SpreadStrategy::BearCall => {
            if price <= input.long_strike {
                levels.max_profit
            } else if price >= input.short_strike {
                -levels.max_loss
            } else {
                levels.max_profit - intrinsic
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &OptionsSpreadInput) -> SpreadMasterResult<()> {
    let prices = [
        ("stock_price", input.stock_price),
        ("long_strike", input.long_strike),
        ("short_strike", input.short_strike),
    ];
    for (field, value) in prices {
        ensure_bounded(field, value)?;
        if value <= Decimal::ZERO {
            return Err(SpreadMasterError::invalid(field, "Price must be positive"));
        }
    }

    let premiums = [
        ("long_premium", input.long_premium),
        ("short_premium", input.short_premium),
    ];
    for (field, value) in premiums {
        ensure_bounded(field, value)?;
        if value < Decimal::ZERO {
            return Err(SpreadMasterError::invalid(field, "Premium cannot be negative"));
        }
    }

    if input.contracts == 0 {
        return Err(SpreadMasterError::invalid(
            "contracts",
            "At least one contract is required",
        ));
    }

    if input.long_strike >= input.short_strike {
        return Err(SpreadMasterError::invalid(
            "short_strike",
            "Higher strike must be above the lower strike",
        ));
    }

    // Lower-strike call is always worth at least the higher-strike call, and
    // the premium difference can never exceed the strike width.
    let premium_diff = input.long_premium - input.short_premium;
    if premium_diff < Decimal::ZERO {
        let reason = match input.strategy {
            SpreadStrategy::BullCall => {
                "Premium paid for the lower strike must be at least the premium received for the higher strike"
            }
            SpreadStrategy::BearCall => {
                "Premium received for the lower strike must be at least the premium paid for the higher strike"
            }
        };
        return Err(SpreadMasterError::invalid("long_premium", reason));
    }
    if premium_diff > input.short_strike - input.long_strike {
        return Err(SpreadMasterError::invalid(
            "long_premium",
            "Net premium exceeds the strike width",
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Max profit, max loss, breakeven and expiry payoff of a vertical call
/// spread.
pub fn compute_options_spread(input: &OptionsSpreadInput) -> SpreadMasterResult<OptionsSpreadResult> {
    validate_input(input)?;

    let levels = spread_levels(input);

    let breakeven = match input.strategy {
        SpreadStrategy::BullCall => input.long_strike + (input.long_premium - input.short_premium),
        SpreadStrategy::BearCall => input.long_strike + (input.short_premium - input.long_premium),
    };
    // Debit recovered or credit eroded: one net premium above the lower strike.
    let zero_payoff_price = input.long_strike + (input.long_premium - input.short_premium);

    let return_on_risk_pct = if levels.max_loss > Decimal::ZERO {
        levels.max_profit / levels.max_loss * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    Ok(OptionsSpreadResult {
        strategy: input.strategy,
        premium_flow: input.strategy.premium_flow(),
        net_debit_or_credit: levels.net_debit,
        max_profit: levels.max_profit,
        max_loss: levels.max_loss,
        breakeven,
        zero_payoff_price,
        return_on_risk_pct,
        profit_at_expiry: payoff_with_levels(input, &levels, input.stock_price),
    })
}

/// Payoff at expiry if the underlying settles at `price`.
pub fn payoff_at(input: &OptionsSpreadInput, price: Money) -> SpreadMasterResult<Money> {
    validate_input(input)?;
    ensure_bounded("price", price)?;
    if price < Decimal::ZERO {
        return Err(SpreadMasterError::invalid("price", "Price cannot be negative"));
    }
    Ok(payoff_with_levels(input, &spread_levels(input), price))
}

/// Expiry payoff across a price range (default: stock price +/- 30%).
pub fn payoff_table(
    input: &OptionsSpreadInput,
    price_range: Option<(Money, Money)>,
    steps: Option<u32>,
) -> SpreadMasterResult<Vec<PayoffPoint>> {
    validate_input(input)?;

    let thirty_pct = input.stock_price * dec!(0.30);
    let (low, high) = price_range.unwrap_or((
        input.stock_price - thirty_pct,
        input.stock_price + thirty_pct,
    ));
    ensure_bounded("price_range", low)?;
    ensure_bounded("price_range", high)?;

    // Prices cannot be negative
    let low = low.max(Decimal::ZERO);

    if low >= high {
        return Err(SpreadMasterError::invalid(
            "price_range",
            "Low price must be less than high price",
        ));
    }

    let steps = steps.unwrap_or(DEFAULT_PAYOFF_STEPS);
    if steps == 0 || steps > MAX_PAYOFF_STEPS {
        return Err(SpreadMasterError::invalid(
            "price_steps",
            format!("Price steps must be between 1 and {MAX_PAYOFF_STEPS}"),
        ));
    }

    let levels = spread_levels(input);
    let step_size = (high - low) / Decimal::from(steps);
    let table = (0..=steps)
        .map(|i| {
            let price = low + step_size * Decimal::from(i);
            PayoffPoint {
                underlying_price: price,
                payoff: payoff_with_levels(input, &levels, price),
            }
        })
        .collect();
    Ok(table)
}

/// [`compute_options_spread`] wrapped in the standard output envelope.
pub fn analyze_options_spread(
    input: &OptionsSpreadInput,
) -> SpreadMasterResult<ComputationOutput<OptionsSpreadResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compute_options_spread(input)?;

    if input.stock_price >= input.short_strike {
        warnings.push(match input.strategy {
            SpreadStrategy::BullCall => {
                "Stock is at or above the higher strike: spread is at max profit".to_string()
            }
            SpreadStrategy::BearCall => {
                "Stock is at or above the higher strike: spread is at max loss".to_string()
            }
        });
    } else if input.stock_price <= input.long_strike {
        warnings.push(match input.strategy {
            SpreadStrategy::BullCall => {
                "Stock is at or below the lower strike: spread expires worthless".to_string()
            }
            SpreadStrategy::BearCall => {
                "Stock is at or below the lower strike: full credit is kept".to_string()
            }
        });
    }
    if result.max_loss > Decimal::ZERO && result.return_on_risk_pct < dec!(10) {
        warnings.push(format!(
            "Return on risk is only {}%",
            result.return_on_risk_pct.round_dp(2)
        ));
    }
    for w in &warnings {
        tracing::warn!(warning = %w, "options spread");
    }

    tracing::debug!(
        strategy = %input.strategy,
        max_profit = %result.max_profit,
        max_loss = %result.max_loss,
        breakeven = %result.breakeven,
        "options spread computed"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Vertical Call Spread — Expiry Payoff",
        &serde_json::json!({
            "strategy": input.strategy.name(),
            "contracts": input.contracts,
            "contract_multiplier": CONTRACT_MULTIPLIER.to_string(),
            "days_to_expiry": input.days_to_expiry,
            "payoff": "intrinsic value at expiry, commissions and early exercise ignored",
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
