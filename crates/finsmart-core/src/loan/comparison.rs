use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinsmartError;
use crate::loan::amortization::{calculate, LoanEstimate};
use crate::loan::policy::EngineConfig;
use crate::loan::validation::{validate, LoanQuote};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinsmartResult;

/// A lender's advertised monthly rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOffer {
    pub name: String,
    pub monthly_rate_percent: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferComparisonInput {
    pub principal: Money,
    pub term_months: i64,
    pub offers: Vec<LoanOffer>,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedOffer {
    pub rank: u32,
    pub name: String,
    pub monthly_rate_percent: Percent,
    pub estimate: LoanEstimate,
    /// Extra interest versus the cheapest offer.
    pub extra_interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferComparison {
    pub cheapest: String,
    pub most_expensive: String,
    /// Interest saved by taking the cheapest offer over the dearest.
    pub max_saving: Money,
    pub offers: Vec<RankedOffer>,
}

/// Rank offers for the same principal and term by total interest.
pub fn compare_offers(
    input: &OfferComparisonInput,
) -> FinsmartResult<ComputationOutput<OfferComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.offers.is_empty() {
        return Err(FinsmartError::InsufficientData(
            "At least one offer is required for comparison".into(),
        ));
    }
    input.config.check()?;

    let mut scored: Vec<(&LoanOffer, LoanEstimate)> = Vec::with_capacity(input.offers.len());
    for offer in &input.offers {
        let quote = LoanQuote::new(input.principal, input.term_months, offer.monthly_rate_percent);
        let validated = validate(&quote, &input.config.bounds).map_err(|e| match e {
            FinsmartError::OutOfRange { field, reason } => FinsmartError::OutOfRange {
                field,
                reason: format!("{reason} (offer '{}')", offer.name),
            },
            other => other,
        })?;
        scored.push((offer, calculate(&validated, input.config.rounding)?));
    }

    scored.sort_by(|(a_offer, a), (b_offer, b)| {
        a.total_interest
            .cmp(&b.total_interest)
            .then_with(|| a_offer.name.cmp(&b_offer.name))
    });

    let cheapest_interest = scored[0].1.total_interest;
    let offers: Vec<RankedOffer> = scored
        .into_iter()
        .enumerate()
        .map(|(i, (offer, estimate))| RankedOffer {
            rank: i as u32 + 1,
            name: offer.name.clone(),
            monthly_rate_percent: offer.monthly_rate_percent,
            extra_interest: estimate.total_interest - cheapest_interest,
            estimate,
        })
        .collect();

    let cheapest = offers[0].name.clone();
    let most_expensive = offers[offers.len() - 1].name.clone();
    let max_saving = (offers[offers.len() - 1].estimate.total_interest - cheapest_interest)
        .max(Decimal::ZERO);
    if offers.len() == 1 {
        warnings.push("Only one offer supplied; nothing to compare against".into());
    }
    if offers
        .windows(2)
        .any(|w| w[0].estimate.total_interest == w[1].estimate.total_interest)
    {
        warnings.push("Some offers cost the same; ties are ordered by name".into());
    }

    let output = OfferComparison {
        cheapest,
        most_expensive,
        max_saving,
        offers,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance annuity per offer, ranked by total interest",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn offer(name: &str, rate: Decimal) -> LoanOffer {
        LoanOffer {
            name: name.into(),
            monthly_rate_percent: rate,
        }
    }

    fn input(offers: Vec<LoanOffer>) -> OfferComparisonInput {
        OfferComparisonInput {
            principal: dec!(20_000_000),
            term_months: 12,
            offers,
            config: EngineConfig::default(),
        }
    }

    #[test]
    fn test_offers_ranked_by_interest() {
        let out = compare_offers(&input(vec![
            offer("Cake", dec!(2.0)),
            offer("Tnex", dec!(1.67)),
            offer("Reference", dec!(1.6)),
        ]))
        .unwrap();
        let r = &out.result;
        let names: Vec<&str> = r.offers.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Reference", "Tnex", "Cake"]);
        assert_eq!(r.cheapest, "Reference");
        assert_eq!(r.most_expensive, "Cake");
        assert_eq!(r.offers[0].extra_interest, Decimal::ZERO);
        assert!(r.max_saving > Decimal::ZERO);
        assert_eq!(r.offers[2].rank, 3);
    }

    #[test]
    fn test_empty_offers_rejected() {
        assert!(matches!(
            compare_offers(&input(vec![])),
            Err(FinsmartError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_invalid_offer_named_in_error() {
        let err = compare_offers(&input(vec![offer("Bad", dec!(-1))])).unwrap_err();
        assert!(err.to_string().contains("Bad"));
    }

    #[test]
    fn test_ties_ordered_by_name() {
        let out = compare_offers(&input(vec![offer("B", dec!(1.5)), offer("A", dec!(1.5))]))
            .unwrap();
        assert_eq!(out.result.offers[0].name, "A");
        assert!(out.warnings.iter().any(|w| w.contains("ties")));
    }
}
