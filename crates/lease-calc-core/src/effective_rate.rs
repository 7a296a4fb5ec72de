//! Reducing (annualized) rate implied by an effective lease rate.
//!
//! The installment is first priced with the upfront-deferred formula at the
//! effective rate; the rate solver then finds the plain annuity rate over the
//! full term that the same installment would repay.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::installment::{
    raw_installment, round_money, validate_terms, AmortizationMethod, RateLabel,
};
use crate::rate_solver::{rate, RateSummary};
use crate::time_value::monthly_rate_from_percent;
use crate::types::{Money, PaymentTiming};

/// Seed for the solver; a 1% monthly rate is close for ordinary leases.
pub const SOLVER_GUESS: Decimal = dec!(0.01);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveRateInput {
    /// Amount financed
    pub capital: Money,
    /// Effective annual rate as a percentage
    pub effective_rate_percent: Decimal,
    pub term_months: Decimal,
    #[serde(default)]
    pub upfronts: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveRateResult {
    /// Installment at the effective rate, rounded to cents
    pub installment: Money,
    /// Solved monthly rate as a percentage, 4 decimal places
    pub monthly_rate_percent: Decimal,
    /// Monthly rate times twelve as a percentage, 2 decimal places
    pub annual_rate_percent: Decimal,
    pub valid: bool,
    pub error_message: String,
}

impl EffectiveRateResult {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            installment: Decimal::ZERO,
            monthly_rate_percent: Decimal::ZERO,
            annual_rate_percent: Decimal::ZERO,
            valid: false,
            error_message: message.into(),
        }
    }
}

/// Back out the reducing rate for an effective-rate lease.
pub fn effective_rate(input: &EffectiveRateInput) -> EffectiveRateResult {
    let terms = match validate_terms(
        input.capital,
        input.effective_rate_percent,
        input.term_months,
        input.upfronts,
        RateLabel::Effective,
    ) {
        Ok(terms) => terms,
        Err(message) => return EffectiveRateResult::invalid(message),
    };

    let monthly_effective = monthly_rate_from_percent(input.effective_rate_percent);
    let Some(raw) = raw_installment(
        AmortizationMethod::UpfrontDeferred,
        input.capital,
        monthly_effective,
        terms,
        PaymentTiming::End,
    ) else {
        return EffectiveRateResult::invalid("Error calculating interest rate");
    };

    // the unrounded installment keeps the solved rate free of cent noise
    let monthly_rate = match rate(
        i64::from(terms.term),
        -raw.installment,
        input.capital,
        Decimal::ZERO,
        PaymentTiming::End,
        SOLVER_GUESS,
    ) {
        Ok(r) => r,
        Err(e) => return EffectiveRateResult::invalid(e.to_string()),
    };

    let summary = RateSummary::from_periodic(monthly_rate);
    EffectiveRateResult {
        installment: round_money(raw.installment),
        monthly_rate_percent: summary.monthly_rate_percent,
        annual_rate_percent: summary.annual_rate_percent,
        valid: true,
        error_message: String::new(),
    }
}
