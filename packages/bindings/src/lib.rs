use napi::Result as NapiResult;
use napi_derive::napi;

use crr_lattice_core::lattice::{self, ModelParameters};
use crr_lattice_core::reference;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_params(input_json: &str) -> NapiResult<ModelParameters> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Lattice pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn price_lattice(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output = lattice::price_option(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reference checks
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_lattice_methods(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output = reference::compare_methods(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn convergence_study(input_json: String, step_counts: Vec<u32>) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output = reference::convergence_study(&params, &step_counts).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn black_scholes_price(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let price = reference::black_scholes_price(&params).map_err(to_napi_error)?;
    Ok(price.to_string())
}
