pub mod effective_rate;
pub mod error;
pub mod installment;
pub mod quote;
pub mod rate_solver;
pub mod time_value;
pub mod types;

#[cfg(feature = "schedule")]
pub mod schedule;

pub use effective_rate::{effective_rate, EffectiveRateInput, EffectiveRateResult};
pub use error::LeaseCalcError;
pub use installment::{compute_installment, AmortizationMethod, CalculationInput, CalculationResult};
pub use quote::{facility_quote, FacilityQuote, FacilityQuoteInput};
pub use rate_solver::{solve_rate, RateSolverInput, RateSummary};
pub use types::*;

/// Standard result type for all lease-calc operations
pub type LeaseCalcResult<T> = Result<T, LeaseCalcError>;
