mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::installment::InstallmentArgs;
use commands::quote::QuoteArgs;
use commands::rate::{EffectiveRateArgs, RateArgs};

/// Lease installment and implied-rate calculations
#[derive(Parser)]
#[command(
    name = "leasecalc",
    version,
    about = "Lease installment and implied-rate calculations",
    long_about = "A CLI for pricing lease installments with decimal precision. Supports \
                  upfront-deferred, standard EMI and annuity methods, implied rate \
                  solving, effective-to-reducing rate conversion, facility quotes and \
                  amortization schedules."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the monthly installment and totals
    Installment(InstallmentArgs),
    /// Solve the implied periodic rate of an annuity
    Rate(RateArgs),
    /// Convert an effective lease rate into a reducing rate
    EffectiveRate(EffectiveRateArgs),
    /// Quote a lease facility (rental, reducing rate, totals)
    Quote(QuoteArgs),
    /// Build a period-by-period amortization schedule
    Schedule(InstallmentArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "lease_calc_core=debug,leasecalc=debug"
    } else {
        "lease_calc_core=warn,leasecalc=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Installment(args) => commands::installment::run_installment(args),
        Commands::Rate(args) => commands::rate::run_rate(args),
        Commands::EffectiveRate(args) => commands::rate::run_effective_rate(args),
        Commands::Quote(args) => commands::quote::run_quote(args),
        Commands::Schedule(args) => commands::installment::run_schedule(args),
        Commands::Version => {
            println!("leasecalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
