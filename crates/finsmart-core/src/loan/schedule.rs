//! Month-by-month reducing-balance schedule for a fixed-installment loan.
//!
//! Each row charges interest on the opening balance at the monthly rate; the
//! rest of the installment retires principal. Row amounts are rounded to
//! whole currency units and the final installment absorbs the residual so
//! the loan closes at exactly zero.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::FinsmartError;
use crate::loan::amortization::calculate;
use crate::loan::policy::{EngineConfig, RoundingMode};
use crate::loan::validation::{validate, LoanQuote, ValidatedQuote};
use crate::time_value::round_currency;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinsmartResult;

/// Longest schedule that will be materialised (100 years of monthly rows).
pub const MAX_SCHEDULE_PERIODS: u32 = 1_200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    pub term_months: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rate_percent: Option<Percent>,
    /// Due date of the first installment; later rows fall one month apart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub config: EngineConfig,
}

/// A single month in the schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub monthly_payment: Money,
    pub final_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub rows: Vec<ScheduleRow>,
}

/// Build the schedule for an already validated quote.
pub fn schedule_rows(
    quote: &ValidatedQuote,
    start_date: Option<NaiveDate>,
) -> FinsmartResult<AmortizationSchedule> {
    if quote.term_months() > MAX_SCHEDULE_PERIODS {
        return Err(FinsmartError::out_of_range(
            "term_months",
            format!(
                "{} months exceeds the {} month schedule limit",
                quote.term_months(),
                MAX_SCHEDULE_PERIODS
            ),
        ));
    }

    // The level installment is always the rounded payment itself.
    let monthly_payment = calculate(quote, RoundingMode::Consistent)?.monthly_payment;
    let rate = quote.monthly_rate();
    let term = quote.term_months();

    let mut rows = Vec::with_capacity(term as usize);
    let mut balance = quote.principal();
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for period in 1..=term {
        let opening = balance;
        let interest = round_currency(opening * rate);

        let principal = if period == term {
            opening
        } else {
            (monthly_payment - interest).max(Decimal::ZERO).min(opening)
        };
        let payment = principal + interest;
        balance = opening - principal;

        let due_date = match start_date {
            Some(d) => Some(d.checked_add_months(Months::new(period - 1)).ok_or_else(|| {
                FinsmartError::out_of_range(
                    "start_date",
                    format!("{d} plus {} months is not a representable date", period - 1),
                )
            })?),
            None => None,
        };

        total_interest += interest;
        total_paid += payment;
        rows.push(ScheduleRow {
            period,
            due_date,
            opening_balance: opening,
            payment,
            interest,
            principal,
            closing_balance: balance,
        });
    }

    let final_payment = rows.last().map(|r| r.payment).unwrap_or(Decimal::ZERO);
    debug!(
        periods = rows.len(),
        %total_interest,
        %final_payment,
        "amortization schedule built"
    );

    Ok(AmortizationSchedule {
        monthly_payment,
        final_payment,
        total_interest,
        total_paid,
        rows,
    })
}

/// Validate the input and build a full amortization schedule.
pub fn build_schedule(
    input: &ScheduleInput,
) -> FinsmartResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.config.check()?;
    let rate = input
        .monthly_rate_percent
        .unwrap_or(input.config.default_monthly_rate_percent);
    if input.monthly_rate_percent.is_none() {
        warnings.push(format!("No rate supplied; using reference rate {rate}%/month"));
    }
    let quote = LoanQuote::new(input.principal, input.term_months, rate);
    let validated = validate(&quote, &input.config.bounds)?;

    let schedule = schedule_rows(&validated, input.start_date)?;
    if schedule.final_payment != schedule.monthly_payment {
        warnings.push(format!(
            "Final installment adjusted to {} to close the balance",
            schedule.final_payment
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance amortization, interest on opening balance, whole-unit rounding",
        input,
        warnings,
        elapsed,
        schedule,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::policy::PolicyBounds;
    use rust_decimal_macros::dec;

    fn validated(principal: Decimal, term: i64, rate: Decimal) -> ValidatedQuote {
        validate(
            &LoanQuote::new(principal, term, rate),
            &PolicyBounds::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_first_row_interest_on_full_principal() {
        let s = schedule_rows(&validated(dec!(20_000_000), 12, dec!(1.6)), None).unwrap();
        let first = &s.rows[0];
        assert_eq!(first.opening_balance, dec!(20_000_000));
        assert_eq!(first.interest, dec!(320_000));
        assert_eq!(first.payment, dec!(1_845_041));
        assert_eq!(first.principal, dec!(1_525_041));
        assert_eq!(first.closing_balance, dec!(18_474_959));
    }

    #[test]
    fn test_schedule_closes_at_zero() {
        let s = schedule_rows(&validated(dec!(20_000_000), 12, dec!(1.6)), None).unwrap();
        assert_eq!(s.rows.len(), 12);
        assert_eq!(s.rows.last().unwrap().closing_balance, Decimal::ZERO);
        let repaid: Decimal = s.rows.iter().map(|r| r.principal).sum();
        assert_eq!(repaid, dec!(20_000_000));
        assert_eq!(s.total_paid, s.total_interest + dec!(20_000_000));
    }

    #[test]
    fn test_balances_chain() {
        let s = schedule_rows(&validated(dec!(50_000_000), 36, dec!(2.1)), None).unwrap();
        for pair in s.rows.windows(2) {
            assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
        }
    }

    #[test]
    fn test_zero_rate_schedule() {
        let s = schedule_rows(&validated(dec!(10_000_000), 6, Decimal::ZERO), None).unwrap();
        assert!(s.rows.iter().all(|r| r.interest.is_zero()));
        assert_eq!(s.total_interest, Decimal::ZERO);
        assert_eq!(s.monthly_payment, dec!(1_666_667));
        // 5 * 1,666,667 = 8,333,335, so the last row pays 1,666,665
        assert_eq!(s.final_payment, dec!(1_666_665));
    }

    #[test]
    fn test_due_dates_step_monthly() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let s = schedule_rows(&validated(dec!(10_000_000), 6, dec!(1.6)), Some(start)).unwrap();
        assert_eq!(s.rows[0].due_date, Some(start));
        // Clamped to the end of February
        assert_eq!(s.rows[1].due_date, NaiveDate::from_ymd_opt(2025, 2, 28));
        assert_eq!(s.rows[5].due_date, NaiveDate::from_ymd_opt(2025, 6, 30));
    }

    #[test]
    fn test_oversized_term_rejected_before_allocation() {
        let input = ScheduleInput {
            principal: dec!(1_000_000),
            term_months: 4_000_000_000,
            monthly_rate_percent: Some(Decimal::ZERO),
            start_date: None,
            config: EngineConfig {
                bounds: PolicyBounds::unrestricted(),
                ..EngineConfig::default()
            },
        };
        match build_schedule(&input) {
            Err(FinsmartError::OutOfRange { field, .. }) => assert_eq!(field, "term_months"),
            other => panic!("expected OutOfRange on term_months, got {other:?}"),
        }
    }

    #[test]
    fn test_schedule_at_period_limit() {
        let quote = validate(
            &LoanQuote::new(dec!(1_200_000_000), i64::from(MAX_SCHEDULE_PERIODS), Decimal::ZERO),
            &PolicyBounds::unrestricted(),
        )
        .unwrap();
        let s = schedule_rows(&quote, None).unwrap();
        assert_eq!(s.rows.len(), MAX_SCHEDULE_PERIODS as usize);
        assert_eq!(s.rows.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_build_schedule_rejects_bad_term() {
        let input = ScheduleInput {
            principal: dec!(20_000_000),
            term_months: 0,
            monthly_rate_percent: Some(dec!(1.6)),
            start_date: None,
            config: EngineConfig::default(),
        };
        assert!(matches!(
            build_schedule(&input),
            Err(FinsmartError::DegenerateTerm { .. })
        ));
    }
}
