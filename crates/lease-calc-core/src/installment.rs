//! Periodic lease installment from capital, annual rate, term and upfronts.
//!
//! Three amortization methods are supported. They agree when there are no
//! upfront months and payments fall at period end, and diverge otherwise:
//!
//! - `UpfrontDeferred`: `upfronts` installments are collected at inception
//!   and the rest of the term amortizes in arrears,
//!   `P = C·r / (u·r + 1 − (1+r)^−(n−u))`.
//! - `StandardEmi`: the upfront amount is netted off the capital and the net
//!   principal amortizes over the full term, `P = (C − u)·r / (1 − (1+r)^−n)`.
//! - `AnnuityPv`: the generic annuity present-value form over the full term,
//!   honouring payment timing, `P = C·r / ((1 − (1+r)^−n)(1 + r·t))`.
//!
//! Invalid input never produces an error: the result carries `valid = false`
//! and a message naming the first failed check.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::time_value::{annuity_factor, monthly_rate_from_percent, pmt};
use crate::types::{Money, PaymentTiming, Rate};

/// Decimal places for every monetary output.
pub const MONEY_DP: u32 = 2;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which installment formula to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmortizationMethod {
    /// Upfront months collected at inception, remainder paid in arrears
    #[default]
    UpfrontDeferred,
    /// Level EMI on capital net of the upfront amount
    StandardEmi,
    /// Generic annuity present value over the full term
    AnnuityPv,
}

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Inputs to the installment calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Amount financed
    pub capital: Money,
    /// Annual interest rate as a percentage (12 = 12%)
    pub annual_rate_percent: Decimal,
    /// Lease term in months; must be a positive whole number
    pub term_months: Decimal,
    /// Upfront months; must be a whole number below the term
    #[serde(default)]
    pub upfronts: Decimal,
    /// Installment formula
    #[serde(default)]
    pub method: AmortizationMethod,
    /// Payment timing, only read by `AnnuityPv`
    #[serde(default)]
    pub timing: PaymentTiming,
}

impl CalculationInput {
    /// Input for the default `UpfrontDeferred` method with whole-month terms.
    pub fn new(capital: Money, annual_rate_percent: Decimal, term_months: u32, upfronts: u32) -> Self {
        Self {
            capital,
            annual_rate_percent,
            term_months: Decimal::from(term_months),
            upfronts: Decimal::from(upfronts),
            method: AmortizationMethod::default(),
            timing: PaymentTiming::default(),
        }
    }

    pub fn with_method(mut self, method: AmortizationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_timing(mut self, timing: PaymentTiming) -> Self {
        self.timing = timing;
        self
    }
}

/// Installment calculator outcome. Check `valid` before reading the figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Periodic installment, rounded to cents
    pub installment: Money,
    /// Installment times the full term, rounded to cents
    pub total_amount: Money,
    /// Total amount less the principal, rounded to cents
    pub total_interest: Money,
    pub valid: bool,
    /// Empty when `valid`
    pub error_message: String,
}

impl CalculationResult {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            installment: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            valid: false,
            error_message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Wording differs slightly between the installment and effective-rate forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RateLabel {
    Interest,
    Effective,
}

/// Term and upfronts once they are known to be whole months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LeaseTerms {
    pub term: u32,
    pub upfronts: u32,
}

/// Checks in a fixed order; the first failure wins.
pub(crate) fn validate_terms(
    capital: Money,
    annual_rate_percent: Decimal,
    term_months: Decimal,
    upfronts: Decimal,
    label: RateLabel,
) -> Result<LeaseTerms, &'static str> {
    if capital <= Decimal::ZERO {
        return Err("Capital must be greater than 0");
    }
    if annual_rate_percent <= Decimal::ZERO {
        return Err(match label {
            RateLabel::Interest => "Interest rate must be greater than 0",
            RateLabel::Effective => "Effective rate must be greater than 0",
        });
    }

    let periods_message = match label {
        RateLabel::Interest => "Number of periods must be a positive integer (months)",
        RateLabel::Effective => "Number of periods must be a positive integer",
    };
    if term_months <= Decimal::ZERO || !term_months.fract().is_zero() {
        return Err(periods_message);
    }
    let term = term_months.to_u32().ok_or(periods_message)?;

    if upfronts < Decimal::ZERO {
        return Err("Upfronts cannot be negative");
    }
    if !upfronts.fract().is_zero() {
        return Err("Upfronts must be a whole number of months");
    }
    if upfronts >= term_months {
        return Err("Upfronts must be less than the number of periods");
    }
    // upfronts < term <= u32::MAX here
    let upfronts = upfronts
        .to_u32()
        .ok_or("Upfronts must be less than the number of periods")?;

    Ok(LeaseTerms { term, upfronts })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the periodic installment, total paid and total interest.
pub fn compute_installment(input: &CalculationInput) -> CalculationResult {
    let terms = match validate_terms(
        input.capital,
        input.annual_rate_percent,
        input.term_months,
        input.upfronts,
        RateLabel::Interest,
    ) {
        Ok(terms) => terms,
        Err(message) => return CalculationResult::invalid(message),
    };

    if input.method == AmortizationMethod::StandardEmi
        && input.capital - input.upfronts <= Decimal::ZERO
    {
        return CalculationResult::invalid("Net principal must be greater than 0");
    }

    let monthly_rate = monthly_rate_from_percent(input.annual_rate_percent);
    let Some(raw) = raw_installment(
        input.method,
        input.capital,
        monthly_rate,
        terms,
        input.timing,
    ) else {
        return CalculationResult::invalid("Installment could not be computed for these inputs");
    };

    let Some(total_amount) = raw.installment.checked_mul(Decimal::from(terms.term)) else {
        return CalculationResult::invalid("Installment could not be computed for these inputs");
    };
    let total_interest = total_amount - raw.principal;

    debug!(
        method = ?input.method,
        installment = %raw.installment,
        term = terms.term,
        upfronts = terms.upfronts,
        "installment computed"
    );

    CalculationResult {
        installment: round_money(raw.installment),
        total_amount: round_money(total_amount),
        total_interest: round_money(total_interest),
        valid: true,
        error_message: String::new(),
    }
}

/// Round half away from zero on the cent boundary.
pub fn round_money(value: Money) -> Money {
    round_to(value, MONEY_DP)
}

pub(crate) fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Unrounded installment together with the principal it amortizes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawInstallment {
    pub installment: Money,
    pub principal: Money,
}

/// `None` when an intermediate value leaves the decimal range.
pub(crate) fn raw_installment(
    method: AmortizationMethod,
    capital: Money,
    monthly_rate: Rate,
    terms: LeaseTerms,
    timing: PaymentTiming,
) -> Option<RawInstallment> {
    let upfronts = Decimal::from(terms.upfronts);
    match method {
        AmortizationMethod::UpfrontDeferred => {
            // C·r / (u·r + 1 − (1+r)^−(n−u)) is C over u plus the arrears factor
            let remaining = terms.term - terms.upfronts;
            let factor = annuity_factor(monthly_rate, remaining, PaymentTiming::End).ok()?;
            let installment = capital.checked_div(upfronts.checked_add(factor)?)?;
            Some(RawInstallment {
                installment,
                principal: capital,
            })
        }
        AmortizationMethod::StandardEmi => {
            let net = capital.checked_sub(upfronts)?;
            let payment = pmt(monthly_rate, terms.term, net, Decimal::ZERO, PaymentTiming::End).ok()?;
            Some(RawInstallment {
                installment: -payment,
                principal: net,
            })
        }
        AmortizationMethod::AnnuityPv => {
            let payment = pmt(monthly_rate, terms.term, capital, Decimal::ZERO, timing).ok()?;
            Some(RawInstallment {
                installment: -payment,
                principal: capital,
            })
        }
    }
}
