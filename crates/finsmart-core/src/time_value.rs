use rust_decimal::prelude::*;
use rust_decimal::MathematicalOps;

use crate::error::FinsmartError;
use crate::types::{Money, Rate};
use crate::FinsmartResult;

/// Compound growth factor `(1 + rate)^nper`, by repeated multiplication.
pub fn compound_factor(rate: Rate, nper: u32) -> FinsmartResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| {
            FinsmartError::out_of_range(
                "monthly_rate_percent",
                format!("compounding {rate} over {nper} periods overflows decimal range"),
            )
        })
}

/// Level payment that fully amortises `principal` over `nper` periods.
///
/// Positive sign convention: a positive principal yields a positive payment.
/// The result is unrounded.
pub fn level_payment(principal: Money, rate: Rate, nper: u32) -> FinsmartResult<Money> {
    if nper == 0 {
        return Err(FinsmartError::DegenerateTerm { term_months: 0 });
    }

    let n = Decimal::from(nper);
    if rate.is_zero() {
        return Ok(principal / n);
    }

    let factor = compound_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(FinsmartError::out_of_range(
            "monthly_rate_percent",
            format!("rate {rate} is too small to resolve over {nper} periods"),
        ));
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| {
            FinsmartError::out_of_range(
                "principal",
                "payment computation overflows decimal range",
            )
        })
}

/// Round to whole currency units, half away from zero. Never returns `-0`.
pub fn round_currency(value: Money) -> Money {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_factor_basic() {
        assert_eq!(compound_factor(dec!(0.1), 2).unwrap(), dec!(1.21));
        assert_eq!(compound_factor(dec!(0.016), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_compound_factor_overflow_is_an_error() {
        let err = compound_factor(dec!(1000), 60).unwrap_err();
        assert!(matches!(err, FinsmartError::OutOfRange { .. }));
    }

    #[test]
    fn test_level_payment_zero_rate() {
        let pmt = level_payment(dec!(12_000_000), Decimal::ZERO, 12).unwrap();
        assert_eq!(pmt, dec!(1_000_000));
    }

    #[test]
    fn test_level_payment_one_period() {
        // One period: principal plus one period of interest
        let pmt = level_payment(dec!(1_000_000), dec!(0.02), 1).unwrap();
        assert_eq!(round_currency(pmt), dec!(1_020_000));
    }

    #[test]
    fn test_level_payment_zero_periods() {
        let err = level_payment(dec!(1_000_000), dec!(0.02), 0).unwrap_err();
        assert_eq!(err, FinsmartError::DegenerateTerm { term_months: 0 });
    }

    #[test]
    fn test_round_currency_midpoint_away_from_zero() {
        assert_eq!(round_currency(dec!(2.5)), dec!(3));
        assert_eq!(round_currency(dec!(-2.5)), dec!(-3));
        assert_eq!(round_currency(dec!(2.4999)), dec!(2));
    }

    #[test]
    fn test_round_currency_no_negative_zero() {
        let r = round_currency(dec!(-0.0000001));
        assert!(r.is_zero());
        assert!(!r.is_sign_negative());
    }
}
