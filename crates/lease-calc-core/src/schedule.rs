//! Month-by-month amortization schedule for a priced installment.
//!
//! Payments are whole cents; interest is rounded to cents each period and
//! the last row absorbs the residual so the closing balance is exactly zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LeaseCalcError;
use crate::installment::{
    raw_installment, round_money, validate_terms, AmortizationMethod, CalculationInput, RateLabel,
};
use crate::time_value::monthly_rate_from_percent;
use crate::types::{Money, PaymentTiming, Rate};
use crate::LeaseCalcResult;

/// Longest schedule that will be built: one hundred years of monthly rows.
pub const MAX_SCHEDULE_MONTHS: u32 = 1200;

/// A single row in the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Period number; 0 is the inception payment, if any
    pub period: u32,
    pub beginning_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub ending_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub method: AmortizationMethod,
    /// Level installment, rounded to cents
    pub installment: Money,
    pub rows: Vec<ScheduleRow>,
    pub total_payments: Money,
    pub total_interest: Money,
}

/// Build the schedule for `input` using the selected method.
pub fn amortization_schedule(input: &CalculationInput) -> LeaseCalcResult<ScheduleOutput> {
    let terms = validate_terms(
        input.capital,
        input.annual_rate_percent,
        input.term_months,
        input.upfronts,
        RateLabel::Interest,
    )
    .map_err(|reason| LeaseCalcError::InvalidInput {
        field: "calculation_input".into(),
        reason: reason.into(),
    })?;

    if terms.term > MAX_SCHEDULE_MONTHS {
        return Err(LeaseCalcError::InvalidInput {
            field: "term_months".into(),
            reason: format!("Schedules are limited to {MAX_SCHEDULE_MONTHS} months"),
        });
    }

    if input.method == AmortizationMethod::StandardEmi
        && input.capital - input.upfronts <= Decimal::ZERO
    {
        return Err(LeaseCalcError::InvalidInput {
            field: "upfronts".into(),
            reason: "Net principal must be greater than 0".into(),
        });
    }

    let monthly_rate = monthly_rate_from_percent(input.annual_rate_percent);
    let raw = raw_installment(input.method, input.capital, monthly_rate, terms, input.timing)
        .filter(|raw| raw.installment.checked_mul(Decimal::from(terms.term)).is_some())
        .ok_or_else(|| LeaseCalcError::InvalidInput {
            field: "capital".into(),
            reason: "Installment could not be computed for these inputs".into(),
        })?;
    let installment = round_money(raw.installment);

    let inception_payment = match input.method {
        AmortizationMethod::UpfrontDeferred => installment
            .checked_mul(Decimal::from(terms.upfronts))
            .ok_or_else(out_of_range)?,
        AmortizationMethod::StandardEmi => input.upfronts,
        AmortizationMethod::AnnuityPv => Decimal::ZERO,
    };
    let regular_periods = match input.method {
        AmortizationMethod::UpfrontDeferred => terms.term - terms.upfronts,
        AmortizationMethod::StandardEmi | AmortizationMethod::AnnuityPv => terms.term,
    };
    let in_advance =
        input.method == AmortizationMethod::AnnuityPv && input.timing == PaymentTiming::Begin;

    let mut rows = Vec::with_capacity(regular_periods as usize + 1);
    let mut balance = input.capital;

    if inception_payment > Decimal::ZERO {
        let ending_balance = balance
            .checked_sub(inception_payment)
            .ok_or_else(out_of_range)?;
        rows.push(ScheduleRow {
            period: 0,
            beginning_balance: balance,
            payment: inception_payment,
            interest: Decimal::ZERO,
            principal: inception_payment,
            ending_balance,
        });
        balance = ending_balance;
    }

    for period in 1..=regular_periods {
        let is_last = period == regular_periods;
        let row = if in_advance {
            advance_row(period, balance, installment, monthly_rate, is_last)
        } else {
            arrears_row(period, balance, installment, monthly_rate, is_last)
        }
        .ok_or_else(out_of_range)?;
        balance = row.ending_balance;
        rows.push(row);
    }

    let total_payments = checked_total(rows.iter().map(|r| r.payment)).ok_or_else(out_of_range)?;
    let total_interest = checked_total(rows.iter().map(|r| r.interest)).ok_or_else(out_of_range)?;

    Ok(ScheduleOutput {
        method: input.method,
        installment,
        rows,
        total_payments,
        total_interest,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn out_of_range() -> LeaseCalcError {
    LeaseCalcError::InvalidInput {
        field: "capital".into(),
        reason: "Schedule could not be computed for these inputs".into(),
    }
}

fn checked_total(values: impl Iterator<Item = Money>) -> Option<Money> {
    values.fold(Some(Decimal::ZERO), |acc, v| acc?.checked_add(v))
}

/// Interest accrues on the opening balance, then the payment is made.
fn arrears_row(
    period: u32,
    balance: Money,
    installment: Money,
    rate: Rate,
    is_last: bool,
) -> Option<ScheduleRow> {
    let interest = round_money(balance.checked_mul(rate)?);
    let payment = if is_last {
        balance.checked_add(interest)?
    } else {
        installment
    };
    let principal = payment.checked_sub(interest)?;
    Some(ScheduleRow {
        period,
        beginning_balance: balance,
        payment,
        interest,
        principal,
        ending_balance: balance.checked_sub(principal)?,
    })
}

/// The payment is made first, then interest accrues on what is left.
fn advance_row(
    period: u32,
    balance: Money,
    installment: Money,
    rate: Rate,
    is_last: bool,
) -> Option<ScheduleRow> {
    let (payment, interest) = if is_last {
        (balance, Decimal::ZERO)
    } else {
        let outstanding = balance.checked_sub(installment)?;
        (installment, round_money(outstanding.checked_mul(rate)?))
    };
    let principal = payment.checked_sub(interest)?;
    Some(ScheduleRow {
        period,
        beginning_balance: balance,
        payment,
        interest,
        principal,
        ending_balance: balance.checked_sub(principal)?,
    })
}
