use finsmart_core::loan::{
    compute_loan_estimate, compute_loan_estimate_with, EngineConfig, LoanQuote, PolicyBounds,
    RoundingMode,
};
use finsmart_core::presentation::format_estimate;
use finsmart_core::FinsmartError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Reference scenario
// ===========================================================================

#[test]
fn test_reference_scenario_20m_12m_1_6pct() {
    // r = 0.016, (1.016)^12 = 1.20983...
    // PMT = 1,845,041.1288; total = 22,140,493.5456; interest = 2,140,493.5456
    let est = compute_loan_estimate(dec!(20_000_000), 12, dec!(1.6), None).unwrap();
    assert_eq!(est.monthly_payment, dec!(1_845_041));
    assert_eq!(est.total_payment, dec!(22_140_494));
    assert_eq!(est.total_interest, dec!(2_140_494));
    assert_eq!(est.rounding, RoundingMode::Independent);
}

#[test]
fn test_reference_scenario_formatted() {
    let est = compute_loan_estimate(dec!(20_000_000), 12, dec!(1.6), None).unwrap();
    let f = format_estimate(&est);
    assert_eq!(f.monthly_payment, "1.845.041\u{a0}₫");
    assert_eq!(f.total_payment, "22.140.494\u{a0}₫");
    assert_eq!(f.total_interest, "2.140.494\u{a0}₫");
}

#[test]
fn test_consistent_rounding_mode() {
    let config = EngineConfig {
        rounding: RoundingMode::Consistent,
        ..EngineConfig::default()
    };
    let quote = LoanQuote::new(dec!(20_000_000), 12, dec!(1.6));
    let est = compute_loan_estimate_with(&quote, &config).unwrap();
    assert_eq!(est.total_payment, est.monthly_payment * dec!(12));
    assert_eq!(est.total_interest, est.total_payment - dec!(20_000_000));
    assert_eq!(est.total_payment, dec!(22_140_492));
}

// ===========================================================================
// Zero rate
// ===========================================================================

#[test]
fn test_zero_rate_across_policy_range() {
    for principal in [dec!(5_000_000), dec!(20_000_000), dec!(77_000_000), dec!(100_000_000)] {
        for term in (6..=60).step_by(6) {
            let est = compute_loan_estimate(principal, term, Decimal::ZERO, None).unwrap();
            let expected = (principal / Decimal::from(term))
                .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
            assert_eq!(est.monthly_payment, expected, "P={principal}, n={term}");
            assert_eq!(est.total_interest, Decimal::ZERO);
        }
    }
}

// ===========================================================================
// Monotonicity
// ===========================================================================

#[test]
fn test_rate_monotonicity() {
    let rates = [dec!(0.5), dec!(1.0), dec!(1.6), dec!(2.0), dec!(3.0)];
    let estimates: Vec<_> = rates
        .iter()
        .map(|r| compute_loan_estimate(dec!(20_000_000), 24, *r, None).unwrap())
        .collect();
    for pair in estimates.windows(2) {
        assert!(pair[1].monthly_payment > pair[0].monthly_payment);
        assert!(pair[1].total_interest > pair[0].total_interest);
    }
}

#[test]
fn test_term_monotonicity_12_vs_24() {
    let short = compute_loan_estimate(dec!(20_000_000), 12, dec!(1.6), None).unwrap();
    let long = compute_loan_estimate(dec!(20_000_000), 24, dec!(1.6), None).unwrap();
    assert_eq!(long.monthly_payment, dec!(1_010_117));
    assert_eq!(long.total_interest, dec!(4_242_804));
    assert!(long.monthly_payment < short.monthly_payment);
    assert!(long.total_interest > short.total_interest);
}

// ===========================================================================
// Determinism
// ===========================================================================

#[test]
fn test_repeated_calls_identical() {
    let a = compute_loan_estimate(dec!(63_000_000), 42, dec!(1.85), None).unwrap();
    let b = compute_loan_estimate(dec!(63_000_000), 42, dec!(1.85), None).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.monthly_payment.serialize(), b.monthly_payment.serialize());
}

// ===========================================================================
// Rejections
// ===========================================================================

#[test]
fn test_zero_term_degenerate() {
    let err = compute_loan_estimate(dec!(20_000_000), 0, dec!(1.6), None).unwrap_err();
    assert_eq!(err, FinsmartError::DegenerateTerm { term_months: 0 });
    assert!(err.is_validation());
}

#[test]
fn test_negative_principal_out_of_range() {
    let err = compute_loan_estimate(dec!(-1), 12, dec!(1.6), None).unwrap_err();
    assert!(matches!(err, FinsmartError::OutOfRange { ref field, .. } if field == "principal"));
    assert!(err.is_validation());
}

#[test]
fn test_caller_supplied_bounds() {
    let bounds = PolicyBounds {
        min_principal: dec!(1_000_000),
        max_principal: dec!(500_000_000),
        min_term_months: 3,
        max_term_months: 120,
        term_step_months: 3,
        max_monthly_rate_percent: Some(dec!(4)),
    };
    assert!(compute_loan_estimate(dec!(300_000_000), 99, dec!(1.2), Some(&bounds)).is_ok());
    assert!(compute_loan_estimate(dec!(300_000_000), 100, dec!(1.2), Some(&bounds)).is_err());
    assert!(compute_loan_estimate(dec!(300_000_000), 99, dec!(4.5), Some(&bounds)).is_err());
}

#[test]
fn test_extreme_rate_overflow_is_reported() {
    let bounds = PolicyBounds {
        max_term_months: 600,
        ..PolicyBounds::unrestricted()
    };
    let err = compute_loan_estimate(dec!(1_000_000), 600, dec!(500), Some(&bounds)).unwrap_err();
    assert!(matches!(err, FinsmartError::OutOfRange { .. }));
}
