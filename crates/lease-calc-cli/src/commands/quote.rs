use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use lease_calc_core::quote::{self, FacilityQuoteInput};
use lease_calc_core::types::with_metadata;

use super::elapsed_us;
use crate::input;

/// Arguments for a lease facility quote
#[derive(Args)]
pub struct QuoteArgs {
    /// Lease amount
    #[arg(long)]
    pub lease_amount: Option<Decimal>,

    /// Effective annual rate as a percentage
    #[arg(long)]
    pub effective_rate: Option<Decimal>,

    /// Requested tenure in months
    #[arg(long)]
    pub tenure: Option<Decimal>,

    /// Upfront months
    #[arg(long, default_value = "0")]
    pub upfront: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_quote(args: QuoteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let quote_input: FacilityQuoteInput = match input::read_document(args.input.as_deref())? {
        Some(doc) => doc,
        None => FacilityQuoteInput {
            lease_amount: args
                .lease_amount
                .ok_or("--lease-amount is required (or provide --input)")?,
            effective_rate_percent: args
                .effective_rate
                .ok_or("--effective-rate is required (or provide --input)")?,
            requested_tenure: args
                .tenure
                .ok_or("--tenure is required (or provide --input)")?,
            upfront: args.upfront,
        },
    };

    let start = Instant::now();
    let result = quote::facility_quote(&quote_input);
    let mut warnings = Vec::new();
    if !result.valid {
        warnings.push(result.error_message.clone());
    }
    let output = with_metadata(
        "Lease rental with reducing rate",
        &quote_input,
        warnings,
        elapsed_us(start),
        result,
    );
    Ok(serde_json::to_value(output)?)
}
