//! Tax on bond income and the loan interest deduction.
//!
//! Individuals pay their slab rate on bond 1 coupons and a separate
//! (capital gains) rate on the bond 2 gain, with no relief for personal loan
//! interest. Companies treat everything as business income: one rate on both
//! bonds, and loan interest is a deductible expense.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SimulatorError;
use crate::time_value::pct_to_fraction;
use crate::types::{Money, Percent};
use crate::SimulatorResult;

/// Default slab rate applied to the "Individual" preset.
pub const INDIVIDUAL_TAX_RATE_PCT: Decimal = dec!(30.0);
/// Default corporate rate applied to the "Private Ltd" preset.
pub const PRIVATE_LTD_TAX_RATE_PCT: Decimal = dec!(25.0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestorKind {
    #[default]
    Individual,
    Company,
}

impl fmt::Display for InvestorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvestorKind::Individual => write!(f, "individual"),
            InvestorKind::Company => write!(f, "company"),
        }
    }
}

/// Investor type presets offered on the input form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestorProfile {
    /// Individual at 30%.
    Individual,
    /// Private limited company at 25%.
    PrivateLimited,
    Custom {
        kind: InvestorKind,
        tax_rate_pct: Percent,
    },
}

impl InvestorProfile {
    pub fn kind(&self) -> InvestorKind {
        match self {
            InvestorProfile::Individual => InvestorKind::Individual,
            InvestorProfile::PrivateLimited => InvestorKind::Company,
            InvestorProfile::Custom { kind, .. } => *kind,
        }
    }

    pub fn tax_rate_pct(&self) -> Percent {
        match self {
            InvestorProfile::Individual => INDIVIDUAL_TAX_RATE_PCT,
            InvestorProfile::PrivateLimited => PRIVATE_LTD_TAX_RATE_PCT,
            InvestorProfile::Custom { tax_rate_pct, .. } => *tax_rate_pct,
        }
    }
}

/// Tax liability broken down by source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub bond1_tax: Money,
    pub bond2_tax: Money,
    /// Tax saved by deducting loan interest (companies only).
    pub loan_interest_deduction: Money,
    /// bond1_tax + bond2_tax - loan_interest_deduction. May be negative.
    pub total_tax: Money,
    /// Rate actually applied to bond 1 interest.
    pub bond1_tax_rate_pct: Percent,
    /// Rate actually applied to the bond 2 gain.
    pub bond2_tax_rate_pct: Percent,
}

/// Input for a standalone tax computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxInput {
    pub investor_kind: InvestorKind,
    pub bond1_total_interest: Money,
    pub bond2_gain: Money,
    pub total_loan_interest: Money,
    pub investor_tax_rate_pct: Percent,
    pub bond2_tax_rate_pct: Percent,
}

/// Compute tax for the given investor kind.
///
/// For companies `bond2_tax_rate_pct` is ignored and the deduction is not
/// capped, so a large loan interest bill can drive total tax below zero.
pub fn compute_tax(
    investor_kind: InvestorKind,
    bond1_total_interest: Money,
    bond2_gain: Money,
    total_loan_interest: Money,
    investor_tax_rate_pct: Percent,
    bond2_tax_rate_pct: Percent,
) -> SimulatorResult<TaxResult> {
    validate_rate("investor_tax_rate_pct", investor_tax_rate_pct)?;
    validate_rate("bond2_tax_rate_pct", bond2_tax_rate_pct)?;

    let investor_rate = pct_to_fraction(investor_tax_rate_pct);
    let bond1_tax = bond1_total_interest * investor_rate;

    let result = match investor_kind {
        InvestorKind::Individual => {
            let bond2_tax = bond2_gain * pct_to_fraction(bond2_tax_rate_pct);
            TaxResult {
                bond1_tax,
                bond2_tax,
                loan_interest_deduction: Decimal::ZERO,
                total_tax: checked_total(bond1_tax, bond2_tax, Decimal::ZERO)?,
                bond1_tax_rate_pct: investor_tax_rate_pct,
                bond2_tax_rate_pct,
            }
        }
        InvestorKind::Company => {
            let bond2_tax = bond2_gain * investor_rate;
            let loan_interest_deduction = total_loan_interest * investor_rate;
            TaxResult {
                bond1_tax,
                bond2_tax,
                loan_interest_deduction,
                total_tax: checked_total(bond1_tax, bond2_tax, loan_interest_deduction)?,
                bond1_tax_rate_pct: investor_tax_rate_pct,
                bond2_tax_rate_pct: investor_tax_rate_pct,
            }
        }
    };

    Ok(result)
}

/// [`compute_tax`] driven by a [`TaxInput`] record.
pub fn compute_tax_from(input: &TaxInput) -> SimulatorResult<TaxResult> {
    compute_tax(
        input.investor_kind,
        input.bond1_total_interest,
        input.bond2_gain,
        input.total_loan_interest,
        input.investor_tax_rate_pct,
        input.bond2_tax_rate_pct,
    )
}

fn checked_total(bond1_tax: Money, bond2_tax: Money, deduction: Money) -> SimulatorResult<Money> {
    bond1_tax
        .checked_add(bond2_tax)
        .and_then(|v| v.checked_sub(deduction))
        .ok_or_else(|| SimulatorError::out_of_range("bond2_gain"))
}

fn validate_rate(field: &str, pct: Percent) -> SimulatorResult<()> {
    if pct < Decimal::ZERO || pct > dec!(100) {
        return Err(SimulatorError::invalid(
            field,
            format!("Tax rate must be between 0 and 100 percent, got {pct}"),
        ));
    }
    Ok(())
}
