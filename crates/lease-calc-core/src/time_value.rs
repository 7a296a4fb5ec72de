use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LeaseCalcError;
use crate::types::{Money, PaymentTiming, Rate};
use crate::LeaseCalcResult;

/// Annual percentage (e.g. 12 for 12%) to a monthly decimal rate.
pub fn monthly_rate_from_percent(annual_rate_percent: Decimal) -> Rate {
    annual_rate_percent / dec!(1200)
}

/// `(1 + rate)^-nper`, or `None` when it leaves the decimal range.
///
/// For positive rates the factor is built from `1/(1+rate)`, so long terms
/// shrink towards zero instead of overflowing.
pub(crate) fn discount_factor(rate: Rate, nper: u32) -> Option<Decimal> {
    let growth = Decimal::ONE.checked_add(rate)?;
    if growth >= Decimal::ONE {
        Decimal::ONE
            .checked_div(growth)?
            .checked_powi(i64::from(nper))
    } else {
        Decimal::ONE.checked_div(growth.checked_powi(i64::from(nper))?)
    }
}

fn out_of_range(field: &str) -> LeaseCalcError {
    LeaseCalcError::InvalidInput {
        field: field.into(),
        reason: "Result is outside the decimal range".into(),
    }
}

/// Present value of one unit paid every period for `nper` periods.
///
/// For `PaymentTiming::Begin` each payment is pulled forward one period.
pub fn annuity_factor(rate: Rate, nper: u32, timing: PaymentTiming) -> LeaseCalcResult<Decimal> {
    if rate.is_zero() {
        return Ok(Decimal::from(nper));
    }
    if rate <= dec!(-1) {
        return Err(LeaseCalcError::InvalidInput {
            field: "rate".into(),
            reason: "Rate must be greater than -100%".into(),
        });
    }

    let discount = discount_factor(rate, nper).ok_or_else(|| out_of_range("rate"))?;
    Decimal::ONE
        .checked_sub(discount)
        .and_then(|v| v.checked_div(rate))
        .and_then(|v| v.checked_mul(rate.checked_mul(timing.factor())?.checked_add(Decimal::ONE)?))
        .ok_or_else(|| out_of_range("rate"))
}

/// Payment (PMT): level payment that retires `present_value`, leaving
/// `future_value`. Sign convention as spreadsheets: a loan received gives a
/// negative payment.
pub fn pmt(
    rate: Rate,
    nper: u32,
    present_value: Money,
    future_value: Money,
    timing: PaymentTiming,
) -> LeaseCalcResult<Money> {
    if nper == 0 {
        return Err(LeaseCalcError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    let annuity = annuity_factor(rate, nper, timing)?;
    if annuity.is_zero() {
        return Err(LeaseCalcError::InvalidInput {
            field: "rate".into(),
            reason: "PMT annuity factor is zero".into(),
        });
    }
    let discount = if rate.is_zero() {
        Decimal::ONE
    } else {
        discount_factor(rate, nper).ok_or_else(|| out_of_range("rate"))?
    };

    future_value
        .checked_mul(discount)
        .and_then(|fv| present_value.checked_add(fv))
        .and_then(|total| total.checked_div(annuity))
        .map(|payment| -payment)
        .ok_or_else(|| out_of_range("present_value"))
}
