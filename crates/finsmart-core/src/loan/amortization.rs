//! Fixed-installment (reducing-balance) loan estimation.
//!
//! The monthly payment follows the standard annuity formula
//! `P * r * (1 + r)^n / ((1 + r)^n - 1)`, falling back to `P / n` when the
//! rate is zero. All arithmetic is in `rust_decimal::Decimal`; only the
//! presented figures are rounded to whole currency units.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::loan::policy::{EngineConfig, PolicyBounds, RoundingMode};
use crate::loan::validation::{validate, LoanQuote, ValidatedQuote};
use crate::time_value::{level_payment, round_currency};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinsmartResult;

/// Presented result of a loan estimate, in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanEstimate {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub rounding: RoundingMode,
}

impl LoanEstimate {
    /// Gap between `total_payment` and `monthly_payment * term_months`.
    /// Always zero under [`RoundingMode::Consistent`].
    pub fn rounding_drift(&self, term_months: u32) -> Money {
        self.total_payment - self.monthly_payment * Decimal::from(term_months)
    }
}

/// Compute the estimate for a quote that already passed validation.
///
/// Total over the validated domain except for arithmetic overflow under
/// extreme caller-supplied bounds, which is reported as out of range.
pub fn calculate(quote: &ValidatedQuote, rounding: RoundingMode) -> FinsmartResult<LoanEstimate> {
    let n = Decimal::from(quote.term_months());
    let principal = quote.principal();
    let rate = quote.monthly_rate();

    let payment = level_payment(principal, rate, quote.term_months())?;

    let estimate = if rate.is_zero() {
        let monthly_payment = round_currency(payment);
        let total_payment = match rounding {
            RoundingMode::Independent => round_currency(principal),
            RoundingMode::Consistent => monthly_payment * n,
        };
        LoanEstimate {
            monthly_payment,
            total_interest: Decimal::ZERO,
            total_payment,
            rounding,
        }
    } else {
        match rounding {
            RoundingMode::Independent => {
                let total = payment * n;
                LoanEstimate {
                    monthly_payment: round_currency(payment),
                    total_interest: round_currency(total - principal),
                    total_payment: round_currency(total),
                    rounding,
                }
            }
            RoundingMode::Consistent => {
                let monthly_payment = round_currency(payment);
                let total_payment = monthly_payment * n;
                LoanEstimate {
                    monthly_payment,
                    total_interest: round_currency(total_payment - principal)
                        .max(Decimal::ZERO),
                    total_payment,
                    rounding,
                }
            }
        }
    };

    debug!(
        principal = %principal,
        term_months = quote.term_months(),
        monthly_rate_percent = %quote.monthly_rate_percent(),
        monthly_payment = %estimate.monthly_payment,
        total_payment = %estimate.total_payment,
        "loan estimate computed"
    );

    Ok(estimate)
}

/// Validate then compute with independent rounding.
///
/// `bounds` defaults to [`PolicyBounds::default`] when `None`.
pub fn compute_loan_estimate(
    principal: Money,
    term_months: i64,
    monthly_rate_percent: Percent,
    bounds: Option<&PolicyBounds>,
) -> FinsmartResult<LoanEstimate> {
    let default_bounds;
    let bounds = match bounds {
        Some(b) => b,
        None => {
            default_bounds = PolicyBounds::default();
            &default_bounds
        }
    };
    let quote = LoanQuote::new(principal, term_months, monthly_rate_percent);
    let validated = validate(&quote, bounds)?;
    calculate(&validated, RoundingMode::Independent)
}

/// Validate then compute using the bounds and rounding mode of `config`.
pub fn compute_loan_estimate_with(
    quote: &LoanQuote,
    config: &EngineConfig,
) -> FinsmartResult<LoanEstimate> {
    let validated = validate(quote, &config.bounds)?;
    calculate(&validated, config.rounding)
}

/// Input for the envelope-returning estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanEstimateInput {
    pub principal: Money,
    pub term_months: i64,
    /// Falls back to the config's reference rate when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rate_percent: Option<Percent>,
    #[serde(default)]
    pub config: EngineConfig,
}

impl LoanEstimateInput {
    pub fn quote(&self) -> LoanQuote {
        LoanQuote::new(
            self.principal,
            self.term_months,
            self.monthly_rate_percent
                .unwrap_or(self.config.default_monthly_rate_percent),
        )
    }
}

/// Estimate a loan and wrap the result with methodology and warnings.
pub fn estimate_loan(input: &LoanEstimateInput) -> FinsmartResult<ComputationOutput<LoanEstimate>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.config.check()?;
    let quote = input.quote();
    if input.monthly_rate_percent.is_none() {
        warnings.push(format!(
            "No rate supplied; using reference rate {}%/month",
            quote.monthly_rate_percent
        ));
    }

    let validated = validate(&quote, &input.config.bounds)?;
    let estimate = calculate(&validated, input.config.rounding)?;

    if validated.monthly_rate_percent().is_zero() {
        warnings.push("Zero rate: principal is spread evenly, no interest accrues".into());
    }
    let drift = estimate.rounding_drift(validated.term_months());
    if !drift.is_zero() {
        warn!(%drift, "independent rounding drift in total payment");
        warnings.push(format!(
            "total_payment differs from monthly_payment x {} by {} due to independent rounding",
            validated.term_months(),
            drift
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance annuity: PMT = P*r*(1+r)^n / ((1+r)^n - 1), rounded half away from zero",
        &serde_json::json!({
            "principal": quote.principal.to_string(),
            "term_months": quote.term_months,
            "monthly_rate_percent": quote.monthly_rate_percent.to_string(),
            "rounding": input.config.rounding,
        }),
        warnings,
        elapsed,
        estimate,
    ))
}
