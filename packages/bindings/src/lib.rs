use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loan calculator
// ---------------------------------------------------------------------------

#[napi]
pub fn estimate_loan(input_json: String) -> NapiResult<String> {
    let input: finsmart_core::loan::LoanEstimateInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finsmart_core::loan::estimate_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let input: finsmart_core::loan::schedule::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finsmart_core::loan::schedule::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_offers(input_json: String) -> NapiResult<String> {
    let input: finsmart_core::loan::comparison::OfferComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        finsmart_core::loan::comparison::compare_offers(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Takes the amount as a decimal string to avoid float rounding in JS.
#[napi]
pub fn format_vnd(amount: String) -> NapiResult<String> {
    let amount = Decimal::from_str(amount.trim()).map_err(to_napi_error)?;
    Ok(finsmart_core::presentation::format_vnd(amount))
}
