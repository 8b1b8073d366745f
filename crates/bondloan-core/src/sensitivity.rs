use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::SimulatorError;
use crate::simulator::{simulate, SimulationInput};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::SimulatorResult;

/// Safety cap on the number of sweep points.
const MAX_SWEEP_POINTS: usize = 1_000;

/// Simulation input that a sensitivity run sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepVariable {
    Principal,
    Bond1Rate,
    Bond2Rate,
    LoanRate,
    TenureMonths,
    InvestorTaxRate,
    Bond2TaxRate,
}

impl SweepVariable {
    fn apply(self, base: &SimulationInput, value: Decimal) -> SimulationInput {
        let mut input = base.clone();
        match self {
            SweepVariable::Principal => input.principal = value,
            SweepVariable::Bond1Rate => input.bond1_rate_pct = value,
            SweepVariable::Bond2Rate => input.bond2_rate_pct = value,
            SweepVariable::LoanRate => input.loan_rate_pct = value,
            SweepVariable::TenureMonths => {
                input.tenure_months = value.trunc().to_u32().unwrap_or(0);
            }
            SweepVariable::InvestorTaxRate => input.investor_tax_rate_pct = value,
            SweepVariable::Bond2TaxRate => input.bond2_tax_rate_pct = value,
        }
        input
    }
}

/// Input for a one-way sensitivity sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub base: SimulationInput,
    pub variable: SweepVariable,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub value: Decimal,
    pub net_gain: Money,
    pub annualized_return_pct: Percent,
    pub total_tax: Money,
}

/// Output of a one-way sensitivity sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable: SweepVariable,
    pub points: Vec<SensitivityPoint>,
    /// Point with the highest annualized return, if any succeeded.
    pub best: Option<SensitivityPoint>,
}

/// Generate the sweep values from min to max with step.
fn generate_sweep_values(input: &SensitivityInput) -> SimulatorResult<Vec<Decimal>> {
    if input.step <= Decimal::ZERO {
        return Err(SimulatorError::invalid("step", "Step must be positive"));
    }
    if input.min > input.max {
        return Err(SimulatorError::invalid("min", "Min must be <= max"));
    }

    let mut values = Vec::new();
    let mut current = input.min;
    while current <= input.max {
        if values.len() >= MAX_SWEEP_POINTS {
            return Err(SimulatorError::invalid(
                "step",
                format!("Sweep would exceed {MAX_SWEEP_POINTS} points"),
            ));
        }
        values.push(current);
        current += input.step;
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < input.max {
            values.push(input.max);
        }
    }

    Ok(values)
}

/// Re-run the simulation across a range of one input.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> SimulatorResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let values = generate_sweep_values(input)?;
    let mut points = Vec::with_capacity(values.len());

    for value in values {
        let scenario = input.variable.apply(&input.base, value);
        match simulate(&scenario) {
            Ok(r) => points.push(SensitivityPoint {
                value,
                net_gain: r.net_gain,
                annualized_return_pct: r.annualized_return_pct,
                total_tax: r.taxes.total_tax,
            }),
            Err(e) => warnings.push(format!("Skipped {value}: {e}")),
        }
    }

    let best = points
        .iter()
        .max_by(|a, b| a.annualized_return_pct.cmp(&b.annualized_return_pct))
        .cloned();

    let output = SensitivityOutput {
        variable: input.variable,
        points,
        best,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "One-way sensitivity of net gain and annualized return",
        &serde_json::json!({
            "variable": input.variable,
            "min": input.min.to_string(),
            "max": input.max.to_string(),
            "step": input.step.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
