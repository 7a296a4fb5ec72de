//! Lease facility quote: rental and reducing rate for a requested facility.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::effective_rate::{effective_rate, EffectiveRateInput};
use crate::installment::{compute_installment, CalculationInput};
use crate::types::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityQuoteInput {
    pub lease_amount: Money,
    /// Effective annual rate as a percentage
    pub effective_rate_percent: Decimal,
    /// Tenure in months
    pub requested_tenure: Decimal,
    /// Upfront months
    #[serde(default)]
    pub upfront: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityQuote {
    /// Monthly lease rental
    pub lease_rental: Money,
    /// Annualized reducing rate as a percentage
    pub reducing_rate: Decimal,
    pub total_amount: Money,
    pub total_interest: Money,
    pub valid: bool,
    pub error_message: String,
}

impl FacilityQuote {
    fn invalid(message: String) -> Self {
        Self {
            lease_rental: Decimal::ZERO,
            reducing_rate: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            valid: false,
            error_message: message,
        }
    }
}

/// Price the rental, then back out the reducing rate from it.
///
/// Both steps validate the same fields; when they fail, the message is the
/// effective-rate wording, since that check runs last.
pub fn facility_quote(input: &FacilityQuoteInput) -> FacilityQuote {
    let installment = compute_installment(&CalculationInput {
        capital: input.lease_amount,
        annual_rate_percent: input.effective_rate_percent,
        term_months: input.requested_tenure,
        upfronts: input.upfront,
        method: Default::default(),
        timing: Default::default(),
    });
    let reducing = effective_rate(&EffectiveRateInput {
        capital: input.lease_amount,
        effective_rate_percent: input.effective_rate_percent,
        term_months: input.requested_tenure,
        upfronts: input.upfront,
    });
    if !reducing.valid {
        return FacilityQuote::invalid(reducing.error_message);
    }
    if !installment.valid {
        return FacilityQuote::invalid(installment.error_message);
    }

    FacilityQuote {
        lease_rental: installment.installment,
        reducing_rate: reducing.annual_rate_percent,
        total_amount: installment.total_amount,
        total_interest: installment.total_interest,
        valid: true,
        error_message: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_for_vehicle_lease() {
        let quote = facility_quote(&FacilityQuoteInput {
            lease_amount: dec!(100000),
            effective_rate_percent: dec!(12),
            requested_tenure: dec!(36),
            upfront: dec!(2),
        });
        assert!(quote.valid, "{}", quote.error_message);
        assert_eq!(quote.lease_rental, dec!(3257.05));
        assert_eq!(quote.reducing_rate, dec!(10.64));
        assert_eq!(quote.total_amount, dec!(117253.66));
    }

    #[test]
    fn test_zero_rate_uses_effective_rate_wording() {
        let quote = facility_quote(&FacilityQuoteInput {
            lease_amount: dec!(100000),
            effective_rate_percent: dec!(0),
            requested_tenure: dec!(36),
            upfront: dec!(0),
        });
        assert!(!quote.valid);
        assert_eq!(quote.reducing_rate, Decimal::ZERO);
        assert_eq!(quote.error_message, "Effective rate must be greater than 0");
    }

    #[test]
    fn test_quote_surfaces_first_validation_message() {
        let quote = facility_quote(&FacilityQuoteInput {
            lease_amount: dec!(100000),
            effective_rate_percent: dec!(12),
            requested_tenure: dec!(12),
            upfront: dec!(12),
        });
        assert!(!quote.valid);
        assert_eq!(quote.lease_rental, Decimal::ZERO);
        assert_eq!(
            quote.error_message,
            "Upfronts must be less than the number of periods"
        );
    }
}
