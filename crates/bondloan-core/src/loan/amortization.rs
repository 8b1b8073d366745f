//! Reducing-balance loan amortization.
//!
//! The installment (EMI) is fixed for the life of the loan. Each month the
//! interest portion is charged on the balance outstanding before that month's
//! payment, and the rest of the installment retires principal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::SimulatorError;
use crate::time_value::{emi, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Month, Percent, MAX_TENURE_MONTHS};
use crate::SimulatorResult;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// A single month of the repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: Month,
    pub emi: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// Balance outstanding after this month's payment.
    pub remaining_principal: Money,
}

/// Input for a standalone amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    /// Annual loan rate in percent (10.0 = 10% p.a.).
    pub annual_rate_pct: Percent,
    pub months: Month,
}

/// Schedule plus the totals a borrower cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub emi: Money,
    pub total_interest: Money,
    /// EMI * months.
    pub total_paid: Money,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the month-by-month reducing-balance schedule for a loan.
pub fn compute_amortization(
    principal: Money,
    annual_rate_pct: Percent,
    months: Month,
) -> SimulatorResult<Vec<AmortizationRow>> {
    validate(principal, annual_rate_pct, months)?;

    let rate = monthly_rate(annual_rate_pct);
    let installment = emi(principal, rate, months)?;
    // Every running total (interest, amount paid) is bounded by EMI * months.
    if installment.checked_mul(Decimal::from(months)).is_none() {
        return Err(SimulatorError::out_of_range("principal"));
    }

    let mut schedule = Vec::with_capacity(months as usize);
    let mut remaining = principal;

    for month in 1..=months {
        let interest_portion = remaining * rate;
        let principal_portion = installment - interest_portion;
        // Final-month residue can land a hair below zero.
        remaining = (remaining - principal_portion).max(Decimal::ZERO);

        schedule.push(AmortizationRow {
            month,
            emi: installment,
            principal_portion,
            interest_portion,
            remaining_principal: remaining,
        });
    }

    Ok(schedule)
}

/// Sum of the interest portions over a schedule.
pub fn total_interest(schedule: &[AmortizationRow]) -> Money {
    schedule.iter().map(|r| r.interest_portion).sum()
}

/// Enveloped schedule with EMI, total interest and total paid.
pub fn build_amortization_schedule(
    input: &AmortizationInput,
) -> SimulatorResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let schedule = compute_amortization(input.principal, input.annual_rate_pct, input.months)?;

    if input.principal.is_zero() {
        warnings.push("Principal is zero; schedule carries no payments".into());
    }
    if input.annual_rate_pct.is_zero() {
        warnings.push("Zero loan rate; EMI is principal / months".into());
    }

    let installment = schedule.first().map(|r| r.emi).unwrap_or(Decimal::ZERO);
    let total_interest = total_interest(&schedule);
    let total_paid = installment * Decimal::from(input.months);

    let output = AmortizationOutput {
        emi: installment,
        total_interest,
        total_paid,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance EMI amortization",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "months": input.months,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(principal: Money, annual_rate_pct: Percent, months: Month) -> SimulatorResult<()> {
    if principal < Decimal::ZERO {
        return Err(SimulatorError::invalid(
            "principal",
            "Loan principal cannot be negative",
        ));
    }
    if months == 0 {
        return Err(SimulatorError::invalid(
            "months",
            "Loan tenure must be at least 1 month",
        ));
    }
    if months > MAX_TENURE_MONTHS {
        return Err(SimulatorError::invalid(
            "months",
            format!("Loan tenure cannot exceed {MAX_TENURE_MONTHS} months"),
        ));
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(SimulatorError::invalid(
            "annual_rate_pct",
            "Loan rate cannot be negative",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
