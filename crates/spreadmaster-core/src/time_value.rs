use rust_decimal::Decimal;

use crate::types::{Money, Rate};

/// (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// Returns `None` when the factor no longer fits in a Decimal.
pub fn checked_compound(rate: Rate, n: u32) -> Option<Decimal> {
    let factor = Decimal::ONE.checked_add(rate)?;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.checked_mul(factor)?;
    }
    Some(result)
}

/// Future value of an ordinary annuity of `payment` per period for `n`
/// periods.
///
/// Uses `payment * ((1 + r)^n - 1) / r` for positive rates. A zero or
/// negative rate falls back to the plain sum `payment * n`.
pub fn checked_annuity_fv(payment: Money, rate: Rate, n: u32) -> Option<Money> {
    if payment.is_zero() {
        return Some(Decimal::ZERO);
    }
    if rate <= Decimal::ZERO {
        return payment.checked_mul(Decimal::from(n));
    }
    let growth = checked_compound(rate, n)?.checked_sub(Decimal::ONE)?;
    payment.checked_mul(growth)?.checked_div(rate)
}
