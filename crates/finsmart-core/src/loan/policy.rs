//! Lending policy configuration: principal/term bounds, rounding mode and
//! the reference rate offered when a borrower has not picked one.
//!
//! Everything here is plain data passed in at call time, so different
//! products or markets can supply their own limits.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinsmartError;
use crate::types::{Money, Percent};
use crate::FinsmartResult;

/// Reference rate of the consumer-loan calculator, in percent per month.
pub const DEFAULT_MONTHLY_RATE_PERCENT: Percent = dec!(1.6);

/// Inclusive limits applied to a loan quote before computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyBounds {
    pub min_principal: Money,
    pub max_principal: Money,
    pub min_term_months: u32,
    pub max_term_months: u32,
    /// Terms must be a whole multiple of this many months.
    pub term_step_months: u32,
    /// Optional ceiling on the monthly rate, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_monthly_rate_percent: Option<Percent>,
}

impl Default for PolicyBounds {
    fn default() -> Self {
        Self {
            min_principal: dec!(5_000_000),
            max_principal: dec!(100_000_000),
            min_term_months: 6,
            max_term_months: 60,
            term_step_months: 6,
            max_monthly_rate_percent: None,
        }
    }
}

impl PolicyBounds {
    /// Bounds with no principal ceiling, any term from 1 month, step 1.
    pub fn unrestricted() -> Self {
        Self {
            min_principal: dec!(0.000001),
            max_principal: Decimal::MAX,
            min_term_months: 1,
            max_term_months: u32::MAX,
            term_step_months: 1,
            max_monthly_rate_percent: None,
        }
    }

    /// Reject bounds that no quote could ever satisfy.
    pub fn check(&self) -> FinsmartResult<()> {
        if self.min_principal <= Decimal::ZERO {
            return Err(FinsmartError::InvalidPolicy(format!(
                "min_principal must be positive, got {}",
                self.min_principal
            )));
        }
        if self.min_principal > self.max_principal {
            return Err(FinsmartError::InvalidPolicy(format!(
                "min_principal {} exceeds max_principal {}",
                self.min_principal, self.max_principal
            )));
        }
        if self.term_step_months == 0 {
            return Err(FinsmartError::InvalidPolicy(
                "term_step_months must be at least 1".into(),
            ));
        }
        if self.min_term_months == 0 {
            return Err(FinsmartError::InvalidPolicy(
                "min_term_months must be at least 1".into(),
            ));
        }
        if self.min_term_months > self.max_term_months {
            return Err(FinsmartError::InvalidPolicy(format!(
                "min_term_months {} exceeds max_term_months {}",
                self.min_term_months, self.max_term_months
            )));
        }
        if let Some(max_rate) = self.max_monthly_rate_percent {
            if max_rate < Decimal::ZERO {
                return Err(FinsmartError::InvalidPolicy(format!(
                    "max_monthly_rate_percent must be non-negative, got {max_rate}"
                )));
            }
        }
        Ok(())
    }
}

/// How the three presented amounts are rounded to whole currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round payment, total and interest separately from their unrounded
    /// values. `total_payment` can then drift from `monthly_payment * term`
    /// by up to `term / 2` units. Matches the figures borrowers already see.
    #[default]
    Independent,
    /// Round the payment only and derive total and interest from it.
    /// Interest is floored at zero: when a near-zero rate lets the rounded
    /// payment fall short of the principal, `total_payment - principal` is
    /// negative but `total_interest` reports 0.
    Consistent,
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub bounds: PolicyBounds,
    pub rounding: RoundingMode,
    pub default_monthly_rate_percent: Percent,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bounds: PolicyBounds::default(),
            rounding: RoundingMode::default(),
            default_monthly_rate_percent: DEFAULT_MONTHLY_RATE_PERCENT,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config document; missing fields fall back to defaults.
    pub fn from_json(json: &str) -> FinsmartResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    pub fn check(&self) -> FinsmartResult<()> {
        self.bounds.check()?;
        if self.default_monthly_rate_percent < Decimal::ZERO {
            return Err(FinsmartError::InvalidPolicy(format!(
                "default_monthly_rate_percent must be non-negative, got {}",
                self.default_monthly_rate_percent
            )));
        }
        Ok(())
    }
}
