use lease_calc_core::installment::{compute_installment, CalculationInput};
use lease_calc_core::rate_solver::{self, RateSolverInput, MAX_ITERATIONS};
use lease_calc_core::types::PaymentTiming;
use lease_calc_core::{effective_rate, EffectiveRateInput, LeaseCalcError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Round trips against the installment calculator
// ===========================================================================

#[test]
fn test_round_trip_reference_loan() {
    let priced = compute_installment(&CalculationInput::new(dec!(100000), dec!(12), 36, 0));
    assert!(priced.valid);

    let input = RateSolverInput::new(36, -priced.installment, dec!(100000)).with_guess(dec!(0.01));
    let solved = rate_solver::solve_rate(&input).unwrap();
    assert!(
        (solved - dec!(0.01)).abs() < dec!(0.000001),
        "expected ~0.01, got {solved}"
    );
}

#[test]
fn test_round_trip_across_realistic_loans() {
    // terms and annual rates a lease desk would actually quote
    let cases: [(u32, Decimal); 6] = [
        (1, dec!(1)),
        (12, dec!(5)),
        (36, dec!(12)),
        (60, dec!(18)),
        (120, dec!(8)),
        (360, dec!(6)),
    ];
    for (term, annual) in cases {
        let priced = compute_installment(&CalculationInput::new(dec!(50000), annual, term, 0));
        assert!(priced.valid, "{}", priced.error_message);

        let input = RateSolverInput::new(i64::from(term), -priced.installment, dec!(50000))
            .with_guess(dec!(0.01));
        let solved = rate_solver::solve_rate(&input)
            .unwrap_or_else(|e| panic!("term {term} at {annual}% failed: {e}"));
        let expected = annual / dec!(1200);
        // the installment is rounded to cents, so allow a little slack
        assert!(
            (solved - expected).abs() < dec!(0.0001),
            "term {term} at {annual}%: expected {expected}, got {solved}"
        );
    }
}

// ===========================================================================
// Failure kinds
// ===========================================================================

#[test]
fn test_zero_periods_is_invalid_periods() {
    let input = RateSolverInput::new(0, dec!(-3321.43), dec!(100000));
    assert_eq!(rate_solver::solve_rate(&input), Err(LeaseCalcError::InvalidPeriods));
}

#[test]
fn test_no_root_does_not_converge() {
    // both legs are inflows, so no rate balances them
    let err = rate_solver::rate(12, dec!(100), dec!(1000), dec!(0), PaymentTiming::End, dec!(0.1))
        .unwrap_err();
    match err {
        LeaseCalcError::NonConvergent { iterations, .. } => assert_eq!(iterations, MAX_ITERATIONS),
        other => panic!("expected NonConvergent, got {other:?}"),
    }
}

fn thirty_year_input(guess: Decimal) -> RateSolverInput {
    let priced = compute_installment(&CalculationInput::new(dec!(100000), dec!(12), 360, 0));
    assert_eq!(priced.installment, dec!(1028.61));
    RateSolverInput::new(360, -priced.installment, dec!(100000)).with_guess(guess)
}

#[test]
fn test_thirty_year_loan_converges_across_guesses() {
    for guess in [dec!(0.01), dec!(0.1), dec!(0.15), dec!(0.2), dec!(0.25), dec!(0.3)] {
        let solved = rate_solver::solve_rate(&thirty_year_input(guess))
            .unwrap_or_else(|e| panic!("guess {guess} failed: {e}"));
        assert!(
            (solved - dec!(0.01)).abs() < dec!(0.000001),
            "guess {guess}: expected ~0.01, got {solved}"
        );
    }
}

#[test]
fn test_thirty_year_loan_failing_guesses_are_typed() {
    // from 0.001 the first step overshoots below -1 and the iterates run away
    let err = rate_solver::solve_rate(&thirty_year_input(dec!(0.001))).unwrap_err();
    assert!(matches!(err, LeaseCalcError::NonFinite { .. }), "got {err:?}");

    // from 0.5 the iterates creep down too slowly to land within the cap
    let err = rate_solver::solve_rate(&thirty_year_input(dec!(0.5))).unwrap_err();
    match err {
        LeaseCalcError::NonConvergent { iterations, .. } => assert_eq!(iterations, MAX_ITERATIONS),
        other => panic!("expected NonConvergent, got {other:?}"),
    }
}

#[test]
fn test_negative_periods_from_json() {
    let input: RateSolverInput =
        serde_json::from_str(r#"{"periods": -12, "payment": "-100", "present_value": "1000"}"#)
            .unwrap();
    assert_eq!(rate_solver::solve_rate(&input), Err(LeaseCalcError::InvalidPeriods));
}

#[test]
fn test_input_defaults_from_json() {
    let input: RateSolverInput =
        serde_json::from_str(r#"{"periods": 36, "payment": "-3321.43", "present_value": "100000"}"#)
            .unwrap();
    assert_eq!(input.guess, dec!(0.1));
    assert_eq!(input.future_value, Decimal::ZERO);
    assert_eq!(input.timing, PaymentTiming::End);
}

#[test]
fn test_balloon_future_value() {
    // 24 payments of 400 on 10,000 with a 1,000 balloon still outstanding
    let input = RateSolverInput::new(24, dec!(-400), dec!(10000))
        .with_future_value(dec!(-1000))
        .with_guess(dec!(0.01));
    let solved = rate_solver::solve_rate(&input).unwrap();
    assert!(solved > Decimal::ZERO && solved < dec!(0.02), "got {solved}");
}

// ===========================================================================
// Effective rate
// ===========================================================================

#[test]
fn test_effective_rate_and_error_display() {
    let result = effective_rate(&EffectiveRateInput {
        capital: dec!(100000),
        effective_rate_percent: dec!(12),
        term_months: dec!(36),
        upfronts: dec!(0),
    });
    assert!(result.valid);
    assert_eq!(result.annual_rate_percent, dec!(12.00));
    assert_eq!(
        LeaseCalcError::InvalidPeriods.to_string(),
        "Number of periods must be greater than 0"
    );
}
