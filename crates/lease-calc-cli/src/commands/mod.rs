pub mod installment;
pub mod quote;
pub mod rate;

use clap::ValueEnum;
use lease_calc_core::{AmortizationMethod, PaymentTiming};

/// `--method` values
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    UpfrontDeferred,
    StandardEmi,
    AnnuityPv,
}

impl From<MethodArg> for AmortizationMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::UpfrontDeferred => AmortizationMethod::UpfrontDeferred,
            MethodArg::StandardEmi => AmortizationMethod::StandardEmi,
            MethodArg::AnnuityPv => AmortizationMethod::AnnuityPv,
        }
    }
}

/// `--timing` values
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TimingArg {
    End,
    Begin,
}

impl From<TimingArg> for PaymentTiming {
    fn from(arg: TimingArg) -> Self {
        match arg {
            TimingArg::End => PaymentTiming::End,
            TimingArg::Begin => PaymentTiming::Begin,
        }
    }
}

pub(crate) fn elapsed_us(start: std::time::Instant) -> u64 {
    start.elapsed().as_micros() as u64
}
