use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use lease_calc_core::installment::{self, AmortizationMethod, CalculationInput};
use lease_calc_core::schedule;
use lease_calc_core::types::with_metadata;

use super::{elapsed_us, MethodArg, TimingArg};
use crate::input;

/// Arguments shared by the installment and schedule commands
#[derive(Args)]
pub struct InstallmentArgs {
    /// Amount financed
    #[arg(long)]
    pub capital: Option<Decimal>,

    /// Annual interest rate as a percentage (e.g. 12 for 12%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<Decimal>,

    /// Upfront months collected at inception
    #[arg(long, default_value = "0")]
    pub upfronts: Decimal,

    /// Installment formula
    #[arg(long, value_enum, default_value = "upfront-deferred")]
    pub method: MethodArg,

    /// Payment timing (annuity-pv only)
    #[arg(long, value_enum, default_value = "end")]
    pub timing: TimingArg,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn calculation_input(args: InstallmentArgs) -> Result<CalculationInput, Box<dyn std::error::Error>> {
    if let Some(doc) = input::read_document(args.input.as_deref())? {
        return Ok(doc);
    }
    Ok(CalculationInput {
        capital: args
            .capital
            .ok_or("--capital is required (or provide --input)")?,
        annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
        term_months: args.term.ok_or("--term is required (or provide --input)")?,
        upfronts: args.upfronts,
        method: args.method.into(),
        timing: args.timing.into(),
    })
}

fn methodology(method: AmortizationMethod) -> &'static str {
    match method {
        AmortizationMethod::UpfrontDeferred => "Upfront-deferred amortization",
        AmortizationMethod::StandardEmi => "Standard EMI on net principal",
        AmortizationMethod::AnnuityPv => "Annuity present value",
    }
}

pub fn run_installment(args: InstallmentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let calc_input = calculation_input(args)?;
    let start = Instant::now();
    let result = installment::compute_installment(&calc_input);

    let mut warnings = Vec::new();
    if !result.valid {
        warnings.push(result.error_message.clone());
    }

    let output = with_metadata(
        methodology(calc_input.method),
        &calc_input,
        warnings,
        elapsed_us(start),
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_schedule(args: InstallmentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let calc_input = calculation_input(args)?;
    let start = Instant::now();
    let result = schedule::amortization_schedule(&calc_input)?;
    let output = with_metadata(
        methodology(calc_input.method),
        &calc_input,
        Vec::new(),
        elapsed_us(start),
        result,
    );
    Ok(serde_json::to_value(output)?)
}
