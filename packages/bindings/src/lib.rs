use napi::Result as NapiResult;
use napi_derive::napi;

use lease_calc_core::rate_solver::RateSummary;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Installment
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_installment(input_json: String) -> NapiResult<String> {
    let input: lease_calc_core::installment::CalculationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lease_calc_core::installment::compute_installment(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: lease_calc_core::installment::CalculationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        lease_calc_core::schedule::amortization_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

#[napi]
pub fn solve_rate(input_json: String) -> NapiResult<String> {
    let input: lease_calc_core::rate_solver::RateSolverInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rate = lease_calc_core::rate_solver::solve_rate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&RateSummary::from_periodic(rate)).map_err(to_napi_error)
}

#[napi]
pub fn effective_rate(input_json: String) -> NapiResult<String> {
    let input: lease_calc_core::effective_rate::EffectiveRateInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lease_calc_core::effective_rate::effective_rate(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

#[napi]
pub fn facility_quote(input_json: String) -> NapiResult<String> {
    let input: lease_calc_core::quote::FacilityQuoteInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lease_calc_core::quote::facility_quote(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}
