use lease_calc_core::installment::{AmortizationMethod, CalculationInput};
use lease_calc_core::quote::{facility_quote, FacilityQuoteInput};
use lease_calc_core::schedule::amortization_schedule;
use lease_calc_core::types::PaymentTiming;
use lease_calc_core::LeaseCalcError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Facility quote
// ===========================================================================

#[test]
fn test_quote_from_json_document() {
    let input: FacilityQuoteInput = serde_json::from_str(
        r#"{"lease_amount": "100000", "effective_rate_percent": "12", "requested_tenure": "36", "upfront": "2"}"#,
    )
    .unwrap();
    let quote = facility_quote(&input);
    assert!(quote.valid, "{}", quote.error_message);
    assert_eq!(quote.lease_rental, dec!(3257.05));
    assert_eq!(quote.reducing_rate, dec!(10.64));
    assert_eq!(quote.total_amount, dec!(117253.66));
    assert_eq!(quote.total_interest, dec!(17253.66));
}

#[test]
fn test_quote_without_upfront_keeps_rate() {
    let quote = facility_quote(&FacilityQuoteInput {
        lease_amount: dec!(100000),
        effective_rate_percent: dec!(12),
        requested_tenure: dec!(36),
        upfront: Decimal::ZERO,
    });
    assert!(quote.valid);
    assert_eq!(quote.lease_rental, dec!(3321.43));
    assert_eq!(quote.reducing_rate, dec!(12.00));
}

#[test]
fn test_quote_rejects_fractional_tenure() {
    let quote = facility_quote(&FacilityQuoteInput {
        lease_amount: dec!(100000),
        effective_rate_percent: dec!(12),
        requested_tenure: dec!(36.5),
        upfront: Decimal::ZERO,
    });
    assert!(!quote.valid);
    assert_eq!(quote.lease_rental, Decimal::ZERO);
    assert_eq!(quote.error_message, "Number of periods must be a positive integer");
}

// ===========================================================================
// Amortization schedule
// ===========================================================================

fn assert_closes(rows: &[lease_calc_core::schedule::ScheduleRow]) {
    let last = rows.last().expect("schedule has rows");
    assert_eq!(last.ending_balance, Decimal::ZERO);
    for pair in rows.windows(2) {
        assert_eq!(pair[0].ending_balance, pair[1].beginning_balance);
    }
    for row in rows {
        assert_eq!(row.payment, row.interest + row.principal);
    }
}

#[test]
fn test_schedule_reference_loan() {
    let schedule = amortization_schedule(&CalculationInput::new(dec!(100000), dec!(12), 36, 0)).unwrap();
    assert_eq!(schedule.installment, dec!(3321.43));
    assert_eq!(schedule.rows.len(), 36);
    assert_eq!(schedule.rows[0].period, 1);
    assert_eq!(schedule.rows[0].interest, dec!(1000.00));
    assert_eq!(schedule.rows[0].principal, dec!(2321.43));
    assert_closes(&schedule.rows);
    // cent rounding per row keeps the total within a dollar of the priced total
    assert!((schedule.total_payments - dec!(119571.52)).abs() < dec!(1));
    assert_eq!(schedule.total_payments - dec!(100000), schedule.total_interest);
}

#[test]
fn test_schedule_rows_chain_for_every_method() {
    let base = CalculationInput::new(dec!(48000), dec!(10.5), 24, 2);
    let inputs = [
        base.clone(),
        base.clone().with_method(AmortizationMethod::StandardEmi),
        base.clone().with_method(AmortizationMethod::AnnuityPv),
        base.with_method(AmortizationMethod::AnnuityPv)
            .with_timing(PaymentTiming::Begin),
    ];
    for input in &inputs {
        let schedule = amortization_schedule(input).unwrap();
        assert_eq!(schedule.method, input.method);
        assert_eq!(schedule.rows[0].beginning_balance, dec!(48000));
        assert_closes(&schedule.rows);
    }
}

#[test]
fn test_schedule_emi_needs_positive_net_principal() {
    let input = CalculationInput::new(dec!(10), dec!(12), 36, 12)
        .with_method(AmortizationMethod::StandardEmi);
    let err = amortization_schedule(&input).unwrap_err();
    assert_eq!(
        err,
        LeaseCalcError::InvalidInput {
            field: "upfronts".into(),
            reason: "Net principal must be greater than 0".into(),
        }
    );
}

#[test]
fn test_schedule_reports_validation_failure() {
    let err = amortization_schedule(&CalculationInput::new(dec!(0), dec!(12), 36, 0)).unwrap_err();
    assert_eq!(
        err,
        LeaseCalcError::InvalidInput {
            field: "calculation_input".into(),
            reason: "Capital must be greater than 0".into(),
        }
    );
}

#[test]
fn test_schedule_rejects_terms_beyond_a_century() {
    // the installment itself is still priceable at this length
    let input = CalculationInput::new(dec!(100000), dec!(0.0000001), 4_000_000_000, 0);
    assert!(lease_calc_core::compute_installment(&input).valid);

    let err = amortization_schedule(&input).unwrap_err();
    match err {
        LeaseCalcError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}
