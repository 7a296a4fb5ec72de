//! Implied periodic rate of an annuity (spreadsheet `RATE`) by Newton-Raphson.
//!
//! Solves `f(r) = 0` for
//!
//! ```text
//! f(r) = pv·(1+r)^n + pmt·(1/r + t)·((1+r)^n − 1) + fv
//! ```
//!
//! with `t` = 0 for payments in arrears and 1 for payments in advance. Close
//! to zero the closed form divides by `r`, so the linearisation
//! `pv·(1 + n·r) + pmt·(1 + r·t)·n + fv` is used instead.
//!
//! For `r > 0`, `f` and `f'` are both divided by `(1+r)^(n−1)` before use.
//! The Newton step `f/f'` is unchanged, but only discount factors are
//! formed, so long terms at high guesses stay inside the decimal range.
//!
//! All arithmetic is checked; a value leaving the decimal range is reported
//! as `NonFinite` rather than panicking.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::LeaseCalcError;
use crate::installment::round_to;
use crate::types::{Money, PaymentTiming, Rate};
use crate::LeaseCalcResult;

pub const MAX_ITERATIONS: u32 = 100;
pub const PRECISION: Decimal = dec!(0.00000001);
pub const DEFAULT_GUESS: Rate = dec!(0.1);

fn default_guess() -> Rate {
    DEFAULT_GUESS
}

/// Inputs to the rate solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSolverInput {
    /// Number of payment periods; zero or negative is `InvalidPeriods`
    pub periods: i64,
    /// Payment per period; negative for money paid out
    pub payment: Money,
    /// Present value; positive for a loan received
    pub present_value: Money,
    /// Balance left after the last payment
    #[serde(default)]
    pub future_value: Money,
    #[serde(default)]
    pub timing: PaymentTiming,
    /// Starting rate for the iteration
    #[serde(default = "default_guess")]
    pub guess: Rate,
}

impl RateSolverInput {
    pub fn new(periods: i64, payment: Money, present_value: Money) -> Self {
        Self {
            periods,
            payment,
            present_value,
            future_value: Decimal::ZERO,
            timing: PaymentTiming::End,
            guess: DEFAULT_GUESS,
        }
    }

    pub fn with_future_value(mut self, future_value: Money) -> Self {
        self.future_value = future_value;
        self
    }

    pub fn with_timing(mut self, timing: PaymentTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_guess(mut self, guess: Rate) -> Self {
        self.guess = guess;
        self
    }
}

/// A solved periodic rate with the display forms callers usually want.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSummary {
    /// Periodic rate as a decimal fraction
    pub rate: Rate,
    /// Periodic rate as a percentage, 4 decimal places
    pub monthly_rate_percent: Decimal,
    /// Periodic rate times twelve as a percentage, 2 decimal places
    pub annual_rate_percent: Decimal,
}

impl RateSummary {
    pub fn from_periodic(rate: Rate) -> Self {
        Self {
            rate,
            monthly_rate_percent: round_to(rate * dec!(100), 4),
            annual_rate_percent: round_to(rate * dec!(1200), 2),
        }
    }
}

/// Solve for the periodic rate described by `input`.
pub fn solve_rate(input: &RateSolverInput) -> LeaseCalcResult<Rate> {
    rate(
        input.periods,
        input.payment,
        input.present_value,
        input.future_value,
        input.timing,
        input.guess,
    )
}

/// Periodic interest rate of an annuity, as a decimal fraction.
///
/// Single-shot: a failure is returned as-is and the caller decides whether
/// to retry with another `guess`.
pub fn rate(
    periods: i64,
    payment: Money,
    present_value: Money,
    future_value: Money,
    timing: PaymentTiming,
    guess: Rate,
) -> LeaseCalcResult<Rate> {
    let outcome = newton_raphson(periods, payment, present_value, future_value, timing, guess);
    if let Err(e) = &outcome {
        warn!(periods, %payment, %present_value, %guess, error = %e, "rate solve failed");
    }
    outcome
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn newton_raphson(
    periods: i64,
    payment: Money,
    present_value: Money,
    future_value: Money,
    timing: PaymentTiming,
    guess: Rate,
) -> LeaseCalcResult<Rate> {
    if periods <= 0 {
        return Err(LeaseCalcError::InvalidPeriods);
    }

    let annuity = Annuity {
        periods,
        payment,
        present_value,
        future_value,
        timing: timing.factor(),
    };

    let mut x0 = guess;
    let mut last_delta = Decimal::MAX;

    for iteration in 0..MAX_ITERATIONS {
        let (value, derivative) = annuity
            .evaluate(x0)
            .ok_or(LeaseCalcError::NonFinite { iteration })?;

        if derivative.abs() < PRECISION {
            return Err(LeaseCalcError::ZeroDerivative {
                iteration,
                rate: x0,
            });
        }

        let x1 = value
            .checked_div(derivative)
            .and_then(|step| x0.checked_sub(step))
            .ok_or(LeaseCalcError::NonFinite { iteration })?;
        let delta = x1
            .checked_sub(x0)
            .ok_or(LeaseCalcError::NonFinite { iteration })?
            .abs();

        trace!(iteration, rate = %x1, %delta, "newton step");

        if delta < PRECISION {
            debug!(iterations = iteration + 1, rate = %x1, "rate converged");
            return Ok(x1);
        }

        last_delta = delta;
        x0 = x1;
    }

    Err(LeaseCalcError::NonConvergent {
        iterations: MAX_ITERATIONS,
        last_delta,
    })
}

/// Annuity cash-flow terms; `timing` is already the 0/1 multiplier.
struct Annuity {
    periods: i64,
    payment: Money,
    present_value: Money,
    future_value: Money,
    timing: Decimal,
}

impl Annuity {
    /// `(f(rate), f'(rate))`, or `None` on decimal overflow.
    fn evaluate(&self, rate: Rate) -> Option<(Decimal, Decimal)> {
        if rate.abs() < PRECISION {
            self.evaluate_near_zero(rate)
        } else {
            self.evaluate_closed_form(rate)
        }
    }

    fn evaluate_near_zero(&self, rate: Rate) -> Option<(Decimal, Decimal)> {
        let n = Decimal::from(self.periods);

        let pv_leg = self.present_value.checked_mul(Decimal::ONE + n * rate)?;
        let pmt_leg = self
            .payment
            .checked_mul(Decimal::ONE + rate * self.timing)?
            .checked_mul(n)?;
        let value = pv_leg.checked_add(pmt_leg)?.checked_add(self.future_value)?;

        let derivative = self
            .present_value
            .checked_mul(n)?
            .checked_add(self.payment.checked_mul(self.timing)?.checked_mul(n)?)?;

        Some((value, derivative))
    }

    fn evaluate_closed_form(&self, rate: Rate) -> Option<(Decimal, Decimal)> {
        let n = Decimal::from(self.periods);
        let growth = Decimal::ONE.checked_add(rate)?;
        let annuity_leg = self
            .payment
            .checked_mul(Decimal::ONE.checked_div(rate)?.checked_add(self.timing)?)?;

        // value = pv·lead·(1+r) + leg·accrued + fv·tail
        // slope = (pv + leg)·n·lead − pmt·accrued/r²
        let (lead, accrued, tail) = if growth >= Decimal::ONE {
            // everything scaled by (1+r)^-(n-1)
            let discount = Decimal::ONE
                .checked_div(growth)?
                .checked_powi(self.periods - 1)?;
            (Decimal::ONE, growth.checked_sub(discount)?, discount)
        } else {
            // periods >= 1, so the exponent is never negative
            let fvif_prev = growth.checked_powi(self.periods - 1)?;
            let accrued = fvif_prev.checked_mul(growth)?.checked_sub(Decimal::ONE)?;
            (fvif_prev, accrued, Decimal::ONE)
        };

        let value = self
            .present_value
            .checked_mul(lead)?
            .checked_mul(growth)?
            .checked_add(annuity_leg.checked_mul(accrued)?)?
            .checked_add(self.future_value.checked_mul(tail)?)?;

        let pv_term = self.present_value.checked_mul(n)?.checked_mul(lead)?;
        let pmt_term = annuity_leg.checked_mul(n)?.checked_mul(lead)?;
        let rate_term = self
            .payment
            .checked_mul(accrued)?
            .checked_div(rate.checked_mul(rate)?)?;
        let derivative = pv_term.checked_add(pmt_term)?.checked_sub(rate_term)?;

        Some((value, derivative))
    }
}
