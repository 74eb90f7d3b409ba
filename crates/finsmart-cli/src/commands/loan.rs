use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use finsmart_core::loan::comparison::{self, OfferComparisonInput};
use finsmart_core::loan::schedule::{self, ScheduleInput};
use finsmart_core::loan::{self, EngineConfig, LoanEstimateInput, RoundingMode};
use finsmart_core::presentation::format_estimate;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoundingArg {
    /// Round payment, total and interest separately
    Independent,
    /// Round the payment, derive total and interest from it
    Consistent,
}

impl From<RoundingArg> for RoundingMode {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::Independent => RoundingMode::Independent,
            RoundingArg::Consistent => RoundingMode::Consistent,
        }
    }
}

/// Arguments for a single loan estimate
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EstimateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed (VND)
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term_months: Option<i64>,

    /// Monthly rate in percent (defaults to the configured reference rate)
    #[arg(long, alias = "monthly-rate")]
    pub rate: Option<Decimal>,

    /// Rounding mode for the presented figures
    #[arg(long, value_enum)]
    pub rounding: Option<RoundingArg>,
}

/// Arguments for a month-by-month schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed (VND)
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term_months: Option<i64>,

    /// Monthly rate in percent (defaults to the configured reference rate)
    #[arg(long, alias = "monthly-rate")]
    pub rate: Option<Decimal>,

    /// Due date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for ranking lender offers
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file with principal, term_months and offers
    #[arg(long)]
    pub input: Option<String>,
}

const MISSING_INPUT: &str = "--principal and --term-months, --input <file.json>, or stdin required";

/// Flags take precedence over stdin so an idle pipe is never read.
fn has_loan_flags(principal: Option<Decimal>, term_months: Option<i64>) -> bool {
    principal.is_some() || term_months.is_some()
}

fn resolve_config(file_config: EngineConfig, cli_config: Option<&EngineConfig>) -> EngineConfig {
    match cli_config {
        Some(c) => c.clone(),
        None => file_config,
    }
}

pub fn run_estimate(
    args: EstimateArgs,
    config: Option<&EngineConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut estimate_input: LoanEstimateInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if !has_loan_flags(args.principal, args.term_months) {
        input::stdin::read_stdin()?.ok_or(MISSING_INPUT)?
    } else {
        LoanEstimateInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            monthly_rate_percent: args.rate,
            config: EngineConfig::default(),
        }
    };
    estimate_input.config = resolve_config(estimate_input.config, config);
    if let Some(rounding) = args.rounding {
        estimate_input.config.rounding = rounding.into();
    }
    debug!(?estimate_input, "running loan estimate");

    let result = loan::estimate_loan(&estimate_input)?;
    let display = format_estimate(&result.result);
    let mut value = serde_json::to_value(result)?;
    value["display"] = serde_json::to_value(display)?;
    Ok(value)
}

pub fn run_schedule(
    args: ScheduleArgs,
    config: Option<&EngineConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut schedule_input: ScheduleInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if !has_loan_flags(args.principal, args.term_months) {
        input::stdin::read_stdin()?.ok_or(MISSING_INPUT)?
    } else {
        ScheduleInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            monthly_rate_percent: args.rate,
            start_date: args.start_date,
            config: EngineConfig::default(),
        }
    };
    schedule_input.config = resolve_config(schedule_input.config, config);
    debug!(?schedule_input, "building amortization schedule");

    let result = schedule::build_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(
    args: CompareArgs,
    config: Option<&EngineConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut compare_input: OfferComparisonInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json> or stdin required for offer comparison".into());
    };
    compare_input.config = resolve_config(compare_input.config, config);
    debug!(offers = compare_input.offers.len(), "comparing loan offers");

    let result = comparison::compare_offers(&compare_input)?;
    Ok(serde_json::to_value(result)?)
}
