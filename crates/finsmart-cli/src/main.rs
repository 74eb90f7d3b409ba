mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::loan::{CompareArgs, EstimateArgs, ScheduleArgs};

/// Consumer loan estimates with decimal precision
#[derive(Parser)]
#[command(
    name = "finsmart",
    version,
    about = "Consumer loan estimates with decimal precision",
    long_about = "Estimate fixed monthly installments for consumer loans using the \
                  reducing-balance method, print full amortization schedules, and \
                  rank lender offers by total interest."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine config file (JSON or YAML): bounds, rounding, reference rate
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate monthly payment, total interest and total repayment
    Estimate(EstimateArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Rank lender offers for the same loan by total interest
    Compare(CompareArgs),
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

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("FINSMART_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match cli.config.as_deref().map(input::file::read_config).transpose() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Estimate(args) => commands::loan::run_estimate(args, config.as_ref()),
        Commands::Schedule(args) => commands::loan::run_schedule(args, config.as_ref()),
        Commands::Compare(args) => commands::loan::run_compare(args, config.as_ref()),
        Commands::Version => {
            println!("finsmart {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
