//! Vietnamese-dong display formatting.
//!
//! Mirrors `vi-VN` currency formatting: whole dong, `.` as the thousands
//! separator, a non-breaking space, then the `₫` symbol.

use serde::{Deserialize, Serialize};

use crate::time_value::round_currency;
use crate::types::Money;

const THOUSANDS_SEPARATOR: char = '.';
const CURRENCY_SUFFIX: &str = "\u{a0}₫";

/// Format an amount as Vietnamese dong, e.g. `1.845.041 ₫`.
pub fn format_vnd(amount: Money) -> String {
    let rounded = round_currency(amount);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    format!("{sign}{grouped}{CURRENCY_SUFFIX}")
}

/// Display strings for the three figures of an estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedEstimate {
    pub monthly_payment: String,
    pub total_interest: String,
    pub total_payment: String,
}

#[cfg(feature = "loan")]
pub fn format_estimate(estimate: &crate::loan::LoanEstimate) -> FormattedEstimate {
    FormattedEstimate {
        monthly_payment: format_vnd(estimate.monthly_payment),
        total_interest: format_vnd(estimate.total_interest),
        total_payment: format_vnd(estimate.total_payment),
    }
}
