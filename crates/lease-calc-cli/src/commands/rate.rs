use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use lease_calc_core::effective_rate::{self, EffectiveRateInput};
use lease_calc_core::rate_solver::{self, RateSolverInput, RateSummary, DEFAULT_GUESS};
use lease_calc_core::types::with_metadata;

use super::{elapsed_us, TimingArg};
use crate::input;

/// Arguments for solving the implied periodic rate
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RateArgs {
    /// Number of payment periods
    #[arg(long)]
    pub periods: Option<i64>,

    /// Payment per period (negative for money paid out)
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Present value (positive for a loan received)
    #[arg(long, alias = "pv")]
    pub present_value: Option<Decimal>,

    /// Balance left after the last payment
    #[arg(long, alias = "fv", default_value = "0")]
    pub future_value: Decimal,

    /// Payment timing
    #[arg(long, value_enum, default_value = "end")]
    pub timing: TimingArg,

    /// Starting rate for Newton-Raphson
    #[arg(long)]
    pub guess: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the reducing rate implied by an effective rate
#[derive(Args)]
pub struct EffectiveRateArgs {
    /// Amount financed
    #[arg(long)]
    pub capital: Option<Decimal>,

    /// Effective annual rate as a percentage
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<Decimal>,

    /// Upfront months collected at inception
    #[arg(long, default_value = "0")]
    pub upfronts: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_rate(args: RateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let solver_input: RateSolverInput = match input::read_document(args.input.as_deref())? {
        Some(doc) => doc,
        None => RateSolverInput {
            periods: args
                .periods
                .ok_or("--periods is required (or provide --input)")?,
            payment: args
                .payment
                .ok_or("--payment is required (or provide --input)")?,
            present_value: args
                .present_value
                .ok_or("--present-value is required (or provide --input)")?,
            future_value: args.future_value,
            timing: args.timing.into(),
            guess: args.guess.unwrap_or(DEFAULT_GUESS),
        },
    };

    let start = Instant::now();
    let rate = rate_solver::solve_rate(&solver_input)?;
    let output = with_metadata(
        "Newton-Raphson on the annuity value function",
        &solver_input,
        Vec::new(),
        elapsed_us(start),
        RateSummary::from_periodic(rate),
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_effective_rate(args: EffectiveRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rate_input: EffectiveRateInput = match input::read_document(args.input.as_deref())? {
        Some(doc) => doc,
        None => EffectiveRateInput {
            capital: args
                .capital
                .ok_or("--capital is required (or provide --input)")?,
            effective_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
            upfronts: args.upfronts,
        },
    };

    let start = Instant::now();
    let result = effective_rate::effective_rate(&rate_input);
    let mut warnings = Vec::new();
    if !result.valid {
        warnings.push(result.error_message.clone());
    }
    let output = with_metadata(
        "Upfront-deferred installment, reducing rate by Newton-Raphson",
        &rate_input,
        warnings,
        elapsed_us(start),
        result,
    );
    Ok(serde_json::to_value(output)?)
}
