use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::SpreadMasterError;
use crate::SpreadMasterResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages as entered by a user (12.5 = 12.5%). Divide by 100 before
/// using one as a rate.
pub type Percent = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Convert a whole-number percentage into a decimal rate.
pub fn pct_to_rate(pct: Percent) -> Rate {
    pct / Decimal::ONE_HUNDRED
}

/// Largest absolute value accepted for any single input field. Keeps the
/// product of any two inputs inside the 96-bit Decimal mantissa; longer
/// chains use checked arithmetic.
pub const MAX_INPUT_MAGNITUDE: Decimal = dec!(1_000_000_000_000_000);

/// Reject values whose magnitude could overflow downstream arithmetic.
pub fn ensure_bounded(field: &str, value: Decimal) -> SpreadMasterResult<()> {
    if value.abs() > MAX_INPUT_MAGNITUDE {
        return Err(SpreadMasterError::invalid(
            field,
            format!("Magnitude must not exceed {}", MAX_INPUT_MAGNITUDE),
        ));
    }
    Ok(())
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
