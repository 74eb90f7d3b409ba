use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FinsmartError;
use crate::loan::policy::PolicyBounds;
use crate::types::{Money, Percent, Rate};
use crate::FinsmartResult;

/// A loan request as entered by the borrower, before any checks.
///
/// `term_months` is signed so that a negative term from an untyped caller
/// is reported rather than wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub principal: Money,
    pub term_months: i64,
    pub monthly_rate_percent: Percent,
}

impl LoanQuote {
    pub fn new(principal: Money, term_months: i64, monthly_rate_percent: Percent) -> Self {
        Self {
            principal,
            term_months,
            monthly_rate_percent,
        }
    }
}

/// A quote that has passed [`validate`]. Only this module can build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidatedQuote {
    principal: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
}

impl ValidatedQuote {
    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn monthly_rate_percent(&self) -> Percent {
        self.monthly_rate_percent
    }

    /// Monthly rate as a decimal fraction (1.6% -> 0.016).
    pub fn monthly_rate(&self) -> Rate {
        self.monthly_rate_percent / Decimal::ONE_HUNDRED
    }
}

/// Check a raw quote against the configured policy bounds.
///
/// A zero term is reported as [`FinsmartError::DegenerateTerm`]; every other
/// violation is [`FinsmartError::OutOfRange`]. Nothing is clamped.
pub fn validate(quote: &LoanQuote, bounds: &PolicyBounds) -> FinsmartResult<ValidatedQuote> {
    bounds.check()?;
    let result = check_quote(quote, bounds);
    if let Err(ref e) = result {
        debug!(?quote, error = %e, "loan quote rejected");
    }
    result
}

fn check_quote(quote: &LoanQuote, bounds: &PolicyBounds) -> FinsmartResult<ValidatedQuote> {
    if quote.term_months == 0 {
        return Err(FinsmartError::DegenerateTerm { term_months: 0 });
    }
    if quote.principal <= Decimal::ZERO {
        return Err(FinsmartError::out_of_range(
            "principal",
            format!("must be positive, got {}", quote.principal),
        ));
    }
    if quote.term_months < 0 {
        return Err(FinsmartError::out_of_range(
            "term_months",
            format!("must be positive, got {}", quote.term_months),
        ));
    }
    if quote.monthly_rate_percent < Decimal::ZERO {
        return Err(FinsmartError::out_of_range(
            "monthly_rate_percent",
            format!("must be non-negative, got {}", quote.monthly_rate_percent),
        ));
    }

    if quote.principal < bounds.min_principal || quote.principal > bounds.max_principal {
        return Err(FinsmartError::out_of_range(
            "principal",
            format!(
                "{} is outside [{}, {}]",
                quote.principal, bounds.min_principal, bounds.max_principal
            ),
        ));
    }

    let term_months = u32::try_from(quote.term_months).map_err(|_| {
        FinsmartError::out_of_range(
            "term_months",
            format!("{} exceeds the supported maximum", quote.term_months),
        )
    })?;
    if term_months < bounds.min_term_months || term_months > bounds.max_term_months {
        return Err(FinsmartError::out_of_range(
            "term_months",
            format!(
                "{} is outside [{}, {}]",
                term_months, bounds.min_term_months, bounds.max_term_months
            ),
        ));
    }
    if term_months % bounds.term_step_months != 0 {
        return Err(FinsmartError::out_of_range(
            "term_months",
            format!(
                "{} is not a multiple of {} months",
                term_months, bounds.term_step_months
            ),
        ));
    }

    if let Some(max_rate) = bounds.max_monthly_rate_percent {
        if quote.monthly_rate_percent > max_rate {
            return Err(FinsmartError::out_of_range(
                "monthly_rate_percent",
                format!(
                    "{}% exceeds the {}% ceiling",
                    quote.monthly_rate_percent, max_rate
                ),
            ));
        }
    }

    Ok(ValidatedQuote {
        principal: quote.principal,
        term_months,
        monthly_rate_percent: quote.monthly_rate_percent,
    })
}
