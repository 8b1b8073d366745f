use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate(input_json: String) -> NapiResult<String> {
    let input: bondloan_core::simulator::SimulationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bondloan_core::simulator::run_simulation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity(input_json: String) -> NapiResult<String> {
    let input: bondloan_core::sensitivity::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bondloan_core::sensitivity::run_sensitivity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: bondloan_core::loan::amortization::AmortizationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bondloan_core::loan::amortization::build_amortization_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn bond2_projection(input_json: String) -> NapiResult<String> {
    let input: bondloan_core::bonds::sip_growth::Bond2Input =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        bondloan_core::bonds::sip_growth::project_bond2(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_tax(input_json: String) -> NapiResult<String> {
    let input: bondloan_core::tax::TaxInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bondloan_core::tax::compute_tax_from(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
