use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use spreadmaster_core::derivatives::spreads::{self, OptionsSpreadInput, SpreadStrategy};
use spreadmaster_core::forms::{MarginTaxForm, OptionsSpreadForm};
use spreadmaster_core::format::{format_currency, format_percent};
use spreadmaster_core::margin::tax::{self, DurationUnit, MarginTaxInput};

// ===========================================================================
// End-to-end trade calculations: raw form fields -> analysis -> display.
// ===========================================================================

// ---------------------------------------------------------------------------
// Margin trade
// ---------------------------------------------------------------------------

#[test]
fn test_margin_form_to_display() {
    let form = MarginTaxForm {
        principal: "10,000".into(),
        percent_gain: "12.5".into(),
        duration: "45".into(),
        ..MarginTaxForm::default()
    };
    let input = form.parse().unwrap();
    let output = tax::analyze_margin_tax(&input).unwrap();
    let r = &output.result;

    assert_eq!(r.holding_days, 45);
    assert_eq!(format_currency(r.gross_profit, 2), "$1250.00");
    assert_eq!(format_currency(r.interest_cost, 2), "$155.03");
    assert_eq!(format_currency(r.tax_owed, 2), "$300.00");
    assert_eq!(format_currency(r.net_profit, 2), "$794.97");
    assert_eq!(format_percent(r.net_roi_pct, 2), "7.95%");
    assert!(output.warnings.is_empty());
}

#[test]
fn test_margin_loss_is_not_taxed_and_interest_still_accrues() {
    let input = MarginTaxInput {
        principal: dec!(20000),
        percent_gain: dec!(-5),
        duration: dec!(2),
        duration_unit: DurationUnit::Months,
        annual_interest_rate: dec!(10),
        capital_gains_tax_rate: dec!(24),
    };
    let output = tax::analyze_margin_tax(&input).unwrap();
    let r = &output.result;

    assert_eq!(r.tax_owed, Decimal::ZERO);
    assert!(r.interest_cost > Decimal::ZERO);
    assert_eq!(r.net_profit, r.gross_profit - r.interest_cost);
    assert!(r.net_roi_pct < dec!(-5));
    assert!(output.warnings.is_empty());
}

#[test]
fn test_margin_form_reports_failing_field() {
    let form = MarginTaxForm {
        principal: "10000".into(),
        percent_gain: "lots".into(),
        duration: "45".into(),
        ..MarginTaxForm::default()
    };
    let err = form.parse().unwrap_err();
    assert_eq!(err.field(), Some("percent_gain"));
}

// ---------------------------------------------------------------------------
// Vertical spreads
// ---------------------------------------------------------------------------

#[test]
fn test_bull_call_form_to_payoff_table() {
    let form = OptionsSpreadForm {
        stock_price: "450".into(),
        long_strike: "440".into(),
        short_strike: "460".into(),
        long_premium: "15.50".into(),
        short_premium: "8.75".into(),
        ..OptionsSpreadForm::default()
    };
    let input = form.parse().unwrap();
    assert_eq!(input.strategy, SpreadStrategy::BullCall);
    assert_eq!(input.contracts, 1);

    let result = spreads::compute_options_spread(&input).unwrap();
    assert_eq!(result.max_profit, dec!(1325));
    assert_eq!(result.max_loss, dec!(675));
    assert_eq!(result.breakeven, dec!(446.75));

    let table = spreads::payoff_table(&input, Some((dec!(430), dec!(470))), Some(8)).unwrap();
    assert_eq!(table.len(), 9);
    assert_eq!(table.first().unwrap().payoff, -result.max_loss);
    assert_eq!(table.last().unwrap().payoff, result.max_profit);
    for pair in table.windows(2) {
        assert!(pair[1].payoff >= pair[0].payoff, "bull payoff must not decrease");
    }
}

#[test]
fn test_bear_call_breakeven_and_zero_payoff() {
    let input = OptionsSpreadInput {
        strategy: SpreadStrategy::BearCall,
        stock_price: dec!(100),
        long_strike: dec!(105),
        short_strike: dec!(110),
        long_premium: dec!(2.40),
        short_premium: dec!(0.90),
        contracts: 3,
        days_to_expiry: Some(21),
    };
    let result = spreads::compute_options_spread(&input).unwrap();

    assert_eq!(result.max_profit, dec!(450));
    assert_eq!(result.max_loss, dec!(1050));
    assert_eq!(result.max_profit + result.max_loss, dec!(1500));
    // 105 + (0.90 - 2.40)
    assert_eq!(result.breakeven, dec!(103.5));
    assert_eq!(result.zero_payoff_price, dec!(106.5));
    assert_eq!(spreads::payoff_at(&input, result.zero_payoff_price).unwrap(), Decimal::ZERO);
    assert_eq!(result.profit_at_expiry, result.max_profit);
}

#[test]
fn test_identical_inputs_give_identical_results() {
    let input = OptionsSpreadInput {
        strategy: SpreadStrategy::BullCall,
        stock_price: dec!(52),
        long_strike: dec!(50),
        short_strike: dec!(55),
        long_premium: dec!(3.10),
        short_premium: dec!(1.20),
        contracts: 2,
        days_to_expiry: None,
    };
    let a = spreads::compute_options_spread(&input).unwrap();
    let b = spreads::compute_options_spread(&input).unwrap();
    assert_eq!(a, b);
}
