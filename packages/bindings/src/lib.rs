use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use spreadmaster_core::derivatives::spreads::{self, OptionsSpreadInput};
use spreadmaster_core::forms::{MarginTaxForm, OptionsSpreadForm, YearlyGrowthForm};
use spreadmaster_core::margin::tax::{self, MarginTaxInput};
use spreadmaster_core::wealth::growth::{self, YearlyGrowthInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_json<'a, T: Deserialize<'a>>(input_json: &'a str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn to_json(value: &impl serde::Serialize) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Typed inputs
// ---------------------------------------------------------------------------

#[napi]
pub fn margin_tax(input_json: String) -> NapiResult<String> {
    let input: MarginTaxInput = parse_json(&input_json)?;
    let output = tax::analyze_margin_tax(&input).map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn options_spread(input_json: String) -> NapiResult<String> {
    let input: OptionsSpreadInput = parse_json(&input_json)?;
    let output = spreads::analyze_options_spread(&input).map_err(to_napi_error)?;
    to_json(&output)
}

/// Spread fields plus optional `price_low` / `price_high` / `price_steps`.
#[derive(Deserialize)]
struct PayoffTableRequest {
    #[serde(flatten)]
    spread: OptionsSpreadInput,
    price_low: Option<Decimal>,
    price_high: Option<Decimal>,
    price_steps: Option<u32>,
}

#[napi]
pub fn spread_payoff_table(input_json: String) -> NapiResult<String> {
    let request: PayoffTableRequest = parse_json(&input_json)?;
    let range = match (request.price_low, request.price_high) {
        (Some(low), Some(high)) => Some((low, high)),
        (None, None) => None,
        _ => {
            return Err(to_napi_error(
                "price_low and price_high must be supplied together",
            ))
        }
    };
    let table = spreads::payoff_table(&request.spread, range, request.price_steps)
        .map_err(to_napi_error)?;
    to_json(&table)
}

#[napi]
pub fn yearly_growth(input_json: String) -> NapiResult<String> {
    let input: YearlyGrowthInput = parse_json(&input_json)?;
    let output = growth::analyze_yearly_growth(&input).map_err(to_napi_error)?;
    to_json(&output)
}

// ---------------------------------------------------------------------------
// Raw form fields
// ---------------------------------------------------------------------------

#[napi]
pub fn margin_tax_form(form_json: String) -> NapiResult<String> {
    let form: MarginTaxForm = parse_json(&form_json)?;
    let input = form.parse().map_err(to_napi_error)?;
    let output = tax::analyze_margin_tax(&input).map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn options_spread_form(form_json: String) -> NapiResult<String> {
    let form: OptionsSpreadForm = parse_json(&form_json)?;
    let input = form.parse().map_err(to_napi_error)?;
    let output = spreads::analyze_options_spread(&input).map_err(to_napi_error)?;
    to_json(&output)
}

/// Growth form fields plus an optional `start_year` for calendar labels.
#[derive(Deserialize)]
struct GrowthFormRequest {
    #[serde(flatten)]
    form: YearlyGrowthForm,
    start_year: Option<i32>,
}

#[napi]
pub fn yearly_growth_form(form_json: String) -> NapiResult<String> {
    let request: GrowthFormRequest = parse_json(&form_json)?;
    let mut input = request.form.parse().map_err(to_napi_error)?;
    input.start_year = request.start_year;
    let output = growth::analyze_yearly_growth(&input).map_err(to_napi_error)?;
    to_json(&output)
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(value: f64) -> String {
    spreadmaster_core::format::format_currency_f64(value, 2)
}

#[napi]
pub fn format_percent(value: f64) -> String {
    spreadmaster_core::format::format_percent_f64(value, 2)
}
