//! Display rules shared by every front end.

use rust_decimal::{Decimal, RoundingStrategy};

fn round_half_up(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Dollar amount to `places` decimals with no thousands grouping, sign in
/// front of the symbol: `$1325.00`, `-$675.00`.
pub fn format_currency(value: Decimal, places: u32) -> String {
    let body = format!("{:.*}", places as usize, round_half_up(value.abs(), places));
    if value < Decimal::ZERO {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

pub fn format_percent(value: Decimal, places: u32) -> String {
    format!("{:.*}%", places as usize, round_half_up(value, places))
}

/// Currency formatting for host floats. Non-finite values render as zero
/// (`$0.00` at two places).
pub fn format_currency_f64(value: f64, places: u32) -> String {
    if !value.is_finite() {
        return format!("${:.*}", places as usize, 0.0);
    }
    let body = format!("{:.*}", places as usize, value.abs());
    if value < 0.0 {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Percent formatting for host floats. Non-finite values render as zero
/// (`0.00%` at two places).
pub fn format_percent_f64(value: f64, places: u32) -> String {
    if !value.is_finite() {
        return format!("{:.*}%", places as usize, 0.0);
    }
    format!("{:.*}%", places as usize, value)
}

/// Width of a comparison bar: |value| clamped to 0..=100.
pub fn bar_width_pct(value: Decimal) -> Decimal {
    value.abs().min(Decimal::ONE_HUNDRED)
}
