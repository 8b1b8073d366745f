//! End-to-end bond-loan simulation.
//!
//! The investor borrows `principal` and the same capital is modelled as
//! earning bond 1 coupons while also sitting in bond 2 as a lump sum. Each
//! month's bond 1 coupon is reinvested into bond 2 as an SIP. The loan is
//! repaid by EMI over the tenure. Net gain is what remains after loan
//! interest and tax.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::bonds::fixed_coupon::compute_bond1_interest;
use crate::bonds::sip_growth::{compute_bond2_growth, growth_projection, ProjectionRow};
use crate::error::SimulatorError;
use crate::loan::amortization::{compute_amortization, total_interest, AmortizationRow};
use crate::tax::{compute_tax, InvestorKind, InvestorProfile, TaxResult};
use crate::types::{
    with_metadata, ComputationOutput, Money, Month, Percent, MAX_TENURE_MONTHS,
};
use crate::SimulatorResult;

// ---------------------------------------------------------------------------
// Form bounds (soft limits, breaching them only warns)
// ---------------------------------------------------------------------------

const PRINCIPAL_MIN: Decimal = dec!(100_000);
const PRINCIPAL_MAX: Decimal = dec!(10_000_000);
const BOND_RATE_MIN: Decimal = dec!(1.0);
const BOND_RATE_MAX: Decimal = dec!(30.0);
const LOAN_RATE_MIN: Decimal = dec!(1.0);
const LOAN_RATE_MAX: Decimal = dec!(20.0);
const TENURE_MAX: Month = 60;
const INVESTOR_TAX_MIN: Decimal = dec!(0.1);
const INVESTOR_TAX_MAX: Decimal = dec!(35.0);
const BOND2_TAX_MAX: Decimal = dec!(30.0);

const MONTHS_PER_YEAR: Decimal = dec!(12);
const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Capital borrowed and invested.
    pub principal: Money,
    /// Bond 1 coupon, percent p.a.
    pub bond1_rate_pct: Percent,
    /// Bond 2 expected return, percent p.a.
    pub bond2_rate_pct: Percent,
    /// Loan rate, percent p.a. (reducing balance).
    pub loan_rate_pct: Percent,
    pub tenure_months: Month,
    pub investor_tax_rate_pct: Percent,
    /// Only applied to individuals.
    pub bond2_tax_rate_pct: Percent,
    #[serde(default)]
    pub investor_kind: InvestorKind,
}

impl SimulationInput {
    /// Build an input whose investor kind and tax rate come from a preset.
    pub fn from_profile(
        profile: InvestorProfile,
        principal: Money,
        bond1_rate_pct: Percent,
        bond2_rate_pct: Percent,
        loan_rate_pct: Percent,
        tenure_months: Month,
        bond2_tax_rate_pct: Percent,
    ) -> Self {
        SimulationInput {
            principal,
            bond1_rate_pct,
            bond2_rate_pct,
            loan_rate_pct,
            tenure_months,
            investor_tax_rate_pct: profile.tax_rate_pct(),
            bond2_tax_rate_pct,
            investor_kind: profile.kind(),
        }
    }
}

/// Figures behind the step-by-step methodology narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationBreakdown {
    pub monthly_bond1_interest: Money,
    pub emi: Money,
    pub bond2_lump_sum_value: Money,
    pub bond2_sip_value: Money,
    /// SIP contribution * months.
    pub sip_contributed: Money,
    /// bond2_sip_value - sip_contributed.
    pub sip_growth: Money,
    /// bond2_lump_sum_value - principal.
    pub lump_sum_growth: Money,
}

/// Portfolio value against the outstanding loan at a given month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub month: Month,
    pub portfolio_value: Money,
    pub loan_outstanding: Money,
    pub net_position: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub monthly_bond1_interest: Money,
    pub bond1_total_interest: Money,
    pub bond2_total_value: Money,
    pub bond2_gain: Money,
    pub emi: Money,
    pub total_loan_interest: Money,
    pub taxes: TaxResult,
    /// bond1_total_interest + bond2_gain
    pub total_gain: Money,
    /// total_gain - total_loan_interest - taxes.total_tax
    pub net_gain: Money,
    pub annualized_return_pct: Percent,
    pub amortization_schedule: Vec<AmortizationRow>,
    pub growth_projection: Vec<ProjectionRow>,
    pub timeline: Vec<TimelinePoint>,
    pub breakdown: CalculationBreakdown,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full simulation. Rejects invalid input before computing anything.
pub fn simulate(input: &SimulationInput) -> SimulatorResult<SimulationResult> {
    validate_input(input)?;
    log::debug!(
        "simulating principal={} bond1={}% bond2={}% loan={}% months={} kind={}",
        input.principal,
        input.bond1_rate_pct,
        input.bond2_rate_pct,
        input.loan_rate_pct,
        input.tenure_months,
        input.investor_kind
    );

    let months = input.tenure_months;

    let bond1 = compute_bond1_interest(input.principal, input.bond1_rate_pct, months)?;

    // Bond 1 coupons feed bond 2 as the monthly SIP.
    let sip = bond1.monthly_interest;
    let bond2 = compute_bond2_growth(input.principal, sip, input.bond2_rate_pct, months)?;
    let projection = growth_projection(input.principal, sip, input.bond2_rate_pct, months)?;

    let schedule = compute_amortization(input.principal, input.loan_rate_pct, months)?;
    let total_loan_interest = total_interest(&schedule);
    let emi = schedule.first().map(|r| r.emi).unwrap_or(Decimal::ZERO);

    let total_gain = bond1
        .total_interest
        .checked_add(bond2.gain)
        .ok_or_else(|| SimulatorError::out_of_range("principal"))?;

    let taxes = compute_tax(
        input.investor_kind,
        bond1.total_interest,
        bond2.gain,
        total_loan_interest,
        input.investor_tax_rate_pct,
        input.bond2_tax_rate_pct,
    )?;

    let net_gain = total_gain
        .checked_sub(total_loan_interest)
        .and_then(|v| v.checked_sub(taxes.total_tax))
        .ok_or_else(|| SimulatorError::out_of_range("principal"))?;
    let annualized_return_pct = annualized_return_pct(net_gain, input.principal, months)?;

    let timeline = build_timeline(&projection, &schedule);

    let sip_contributed = sip
        .checked_mul(Decimal::from(months))
        .ok_or_else(|| SimulatorError::out_of_range("tenure_months"))?;
    let breakdown = CalculationBreakdown {
        monthly_bond1_interest: bond1.monthly_interest,
        emi,
        bond2_lump_sum_value: bond2.lump_sum_value,
        bond2_sip_value: bond2.sip_value,
        sip_contributed,
        sip_growth: bond2.sip_value - sip_contributed,
        lump_sum_growth: bond2.lump_sum_value - input.principal,
    };

    Ok(SimulationResult {
        monthly_bond1_interest: bond1.monthly_interest,
        bond1_total_interest: bond1.total_interest,
        bond2_total_value: bond2.total_value,
        bond2_gain: bond2.gain,
        emi,
        total_loan_interest,
        taxes,
        total_gain,
        net_gain,
        annualized_return_pct,
        amortization_schedule: schedule,
        growth_projection: projection,
        timeline,
        breakdown,
    })
}

/// Enveloped simulation: result plus methodology, assumptions and
/// warnings for inputs outside the usual form bounds.
pub fn run_simulation(
    input: &SimulationInput,
) -> SimulatorResult<ComputationOutput<SimulationResult>> {
    let start = Instant::now();

    let result = simulate(input)?;
    let mut warnings = range_warnings(input);

    if input.loan_rate_pct > input.bond2_rate_pct {
        warnings.push(format!(
            "Loan rate {}% exceeds bond 2 return {}%; the reinvested capital earns less than it costs",
            input.loan_rate_pct, input.bond2_rate_pct
        ));
    }
    if result.taxes.total_tax < Decimal::ZERO {
        warnings.push(format!(
            "Loan interest deduction {} exceeds tax on bond income; total tax is negative",
            result.taxes.loan_interest_deduction.round_dp(2)
        ));
    }
    if result.net_gain < Decimal::ZERO {
        warnings.push(format!(
            "Strategy loses {} after loan interest and tax",
            result.net_gain.abs().round_dp(2)
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Bond-loan simulation — simple-interest bond 1, lump sum + SIP bond 2, reducing-balance loan, investor-type tax",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "bond1_rate_pct": input.bond1_rate_pct.to_string(),
            "bond2_rate_pct": input.bond2_rate_pct.to_string(),
            "loan_rate_pct": input.loan_rate_pct.to_string(),
            "tenure_months": input.tenure_months,
            "investor_kind": input.investor_kind,
            "investor_tax_rate_pct": input.investor_tax_rate_pct.to_string(),
            "bond2_tax_rate_pct": input.bond2_tax_rate_pct.to_string(),
            "bond1_interest_reinvested": true,
            "sip_timing": "start_of_month",
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// (net_gain / principal) * (12 / months) * 100
pub fn annualized_return_pct(
    net_gain: Money,
    principal: Money,
    months: Month,
) -> SimulatorResult<Percent> {
    if principal.is_zero() {
        return Err(SimulatorError::DivisionByZero {
            context: "annualized return on zero principal".into(),
        });
    }
    if months == 0 {
        return Err(SimulatorError::DivisionByZero {
            context: "annualized return over zero months".into(),
        });
    }
    net_gain
        .checked_div(principal)
        .and_then(|v| v.checked_mul(MONTHS_PER_YEAR / Decimal::from(months)))
        .and_then(|v| v.checked_mul(HUNDRED))
        .ok_or_else(|| SimulatorError::out_of_range("net_gain"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_timeline(projection: &[ProjectionRow], schedule: &[AmortizationRow]) -> Vec<TimelinePoint> {
    projection
        .iter()
        .zip(schedule)
        .map(|(p, a)| TimelinePoint {
            month: p.month,
            portfolio_value: p.portfolio_value,
            loan_outstanding: a.remaining_principal,
            net_position: p.portfolio_value - a.remaining_principal,
        })
        .collect()
}

fn validate_input(input: &SimulationInput) -> SimulatorResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(SimulatorError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if input.tenure_months == 0 {
        return Err(SimulatorError::invalid(
            "tenure_months",
            "Tenure must be at least 1 month",
        ));
    }
    if input.tenure_months > MAX_TENURE_MONTHS {
        return Err(SimulatorError::invalid(
            "tenure_months",
            format!("Tenure cannot exceed {MAX_TENURE_MONTHS} months"),
        ));
    }

    let pct_fields = [
        ("bond1_rate_pct", input.bond1_rate_pct),
        ("bond2_rate_pct", input.bond2_rate_pct),
        ("loan_rate_pct", input.loan_rate_pct),
        ("investor_tax_rate_pct", input.investor_tax_rate_pct),
        ("bond2_tax_rate_pct", input.bond2_tax_rate_pct),
    ];
    for (field, pct) in pct_fields {
        if pct < Decimal::ZERO || pct > HUNDRED {
            return Err(SimulatorError::invalid(
                field,
                format!("Percentage must be between 0 and 100, got {pct}"),
            ));
        }
    }
    Ok(())
}

fn range_warnings(input: &SimulationInput) -> Vec<String> {
    let mut warnings = Vec::new();

    if input.principal < PRINCIPAL_MIN || input.principal > PRINCIPAL_MAX {
        warnings.push(format!(
            "Principal {} outside typical range [{PRINCIPAL_MIN}, {PRINCIPAL_MAX}]",
            input.principal
        ));
    }
    for (label, pct) in [
        ("Bond 1 rate", input.bond1_rate_pct),
        ("Bond 2 rate", input.bond2_rate_pct),
    ] {
        if pct < BOND_RATE_MIN || pct > BOND_RATE_MAX {
            warnings.push(format!(
                "{label} {pct}% outside typical range [{BOND_RATE_MIN}%, {BOND_RATE_MAX}%]"
            ));
        }
    }
    if input.loan_rate_pct < LOAN_RATE_MIN || input.loan_rate_pct > LOAN_RATE_MAX {
        warnings.push(format!(
            "Loan rate {}% outside typical range [{LOAN_RATE_MIN}%, {LOAN_RATE_MAX}%]",
            input.loan_rate_pct
        ));
    }
    if input.tenure_months > TENURE_MAX {
        warnings.push(format!(
            "Tenure {} months exceeds typical maximum of {TENURE_MAX}",
            input.tenure_months
        ));
    }
    if input.investor_tax_rate_pct < INVESTOR_TAX_MIN
        || input.investor_tax_rate_pct > INVESTOR_TAX_MAX
    {
        warnings.push(format!(
            "Investor tax rate {}% outside typical range [{INVESTOR_TAX_MIN}%, {INVESTOR_TAX_MAX}%]",
            input.investor_tax_rate_pct
        ));
    }
    if input.bond2_tax_rate_pct > BOND2_TAX_MAX {
        warnings.push(format!(
            "Bond 2 tax rate {}% exceeds typical maximum of {BOND2_TAX_MAX}%",
            input.bond2_tax_rate_pct
        ));
    }
    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn default_input() -> SimulationInput {
        SimulationInput {
            principal: dec!(100_000),
            bond1_rate_pct: dec!(14),
            bond2_rate_pct: dec!(10),
            loan_rate_pct: dec!(10),
            tenure_months: 12,
            investor_tax_rate_pct: dec!(30),
            bond2_tax_rate_pct: dec!(15),
            investor_kind: InvestorKind::Individual,
        }
    }

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_zero_loan_rate_example() {
        let mut input = default_input();
        input.bond1_rate_pct = dec!(12);
        input.loan_rate_pct = Decimal::ZERO;

        let r = simulate(&input).unwrap();
        assert_eq!(r.monthly_bond1_interest, dec!(1000));
        assert_eq!(r.bond1_total_interest, dec!(12000));
        assert_eq!(r.emi, dec!(100_000) / dec!(12));
        assert_close(r.emi, dec!(8333.33), dec!(0.01));
        assert_eq!(r.total_loan_interest, Decimal::ZERO);
    }

    #[test]
    fn test_net_gain_identity() {
        let r = simulate(&default_input()).unwrap();
        assert_eq!(r.total_gain, r.bond1_total_interest + r.bond2_gain);
        assert_eq!(
            r.net_gain,
            r.total_gain - r.total_loan_interest - r.taxes.total_tax
        );
    }

    #[test]
    fn test_sip_is_bond1_coupon() {
        let r = simulate(&default_input()).unwrap();
        let b = &r.breakdown;
        assert_eq!(b.monthly_bond1_interest, r.monthly_bond1_interest);
        assert_eq!(b.sip_contributed, r.monthly_bond1_interest * dec!(12));
        assert_close(
            r.bond2_gain,
            b.lump_sum_growth + b.sip_growth,
            dec!(0.0000000001),
        );
    }

    #[test]
    fn test_schedules_cover_tenure() {
        let mut input = default_input();
        input.tenure_months = 36;
        let r = simulate(&input).unwrap();
        assert_eq!(r.amortization_schedule.len(), 36);
        assert_eq!(r.growth_projection.len(), 36);
        assert_eq!(r.timeline.len(), 36);

        let last = r.timeline.last().unwrap();
        assert_eq!(last.portfolio_value, r.bond2_total_value);
        assert_close(last.loan_outstanding, Decimal::ZERO, dec!(0.0001));
        assert_eq!(last.net_position, last.portfolio_value - last.loan_outstanding);
    }

    #[test]
    fn test_company_deduction_flows_into_net_gain() {
        let mut company = default_input();
        company.investor_kind = InvestorKind::Company;
        company.investor_tax_rate_pct = dec!(25);
        let r = simulate(&company).unwrap();

        assert_eq!(
            r.taxes.loan_interest_deduction,
            r.total_loan_interest * dec!(0.25)
        );
        assert_eq!(r.taxes.bond2_tax, r.bond2_gain * dec!(0.25));
    }

    #[test]
    fn test_annualized_return_formula() {
        let r = simulate(&default_input()).unwrap();
        let expected = r.net_gain / dec!(100_000) * dec!(100);
        assert_close(r.annualized_return_pct, expected, dec!(0.0000001));
    }

    #[test]
    fn test_annualized_scales_with_tenure() {
        let twelve = annualized_return_pct(dec!(5000), dec!(100_000), 12).unwrap();
        let twenty_four = annualized_return_pct(dec!(5000), dec!(100_000), 24).unwrap();
        assert_eq!(twelve, dec!(5));
        assert_eq!(twenty_four * dec!(2), twelve);
    }

    #[test]
    fn test_zero_principal_rejected() {
        let mut input = default_input();
        input.principal = Decimal::ZERO;
        let err = simulate(&input).unwrap_err();
        assert!(matches!(err, SimulatorError::InvalidInput { ref field, .. } if field == "principal"));
    }

    #[test]
    fn test_zero_tenure_rejected() {
        let mut input = default_input();
        input.tenure_months = 0;
        assert!(simulate(&input).is_err());
    }

    #[test]
    fn test_percentage_out_of_range_rejected() {
        let mut input = default_input();
        input.loan_rate_pct = dec!(150);
        assert!(simulate(&input).is_err());

        let mut input = default_input();
        input.bond2_tax_rate_pct = dec!(-5);
        assert!(simulate(&input).is_err());
    }

    #[test]
    fn test_tenure_above_hard_limit_rejected() {
        let mut input = default_input();
        input.tenure_months = MAX_TENURE_MONTHS + 1;
        match simulate(&input) {
            Err(SimulatorError::InvalidInput { field, .. }) => assert_eq!(field, "tenure_months"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }

        input.tenure_months = u32::MAX;
        assert!(simulate(&input).is_err());
    }

    #[test]
    fn test_unrepresentable_principal_is_error_not_panic() {
        let mut input = default_input();
        input.principal = dec!(10_000_000_000_000_000_000_000_000_000);
        input.bond2_rate_pct = dec!(100);
        input.tenure_months = 60;
        assert!(matches!(
            simulate(&input),
            Err(SimulatorError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_default_form_values_have_no_warnings() {
        let out = run_simulation(&default_input()).unwrap();
        assert!(out.warnings.is_empty(), "warnings: {:?}", out.warnings);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_out_of_form_range_warns() {
        let mut input = default_input();
        input.principal = dec!(50_000);
        input.tenure_months = 72;
        let out = run_simulation(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.starts_with("Principal")));
        assert!(out.warnings.iter().any(|w| w.starts_with("Tenure")));
    }

    #[test]
    fn test_losing_strategy_warns() {
        let mut input = default_input();
        input.bond1_rate_pct = dec!(1);
        input.bond2_rate_pct = dec!(1);
        input.loan_rate_pct = dec!(20);
        let out = run_simulation(&input).unwrap();
        assert!(out.result.net_gain < Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.starts_with("Strategy loses")));
        assert!(out.warnings.iter().any(|w| w.starts_with("Loan rate")));
    }

    #[test]
    fn test_from_profile() {
        let input = SimulationInput::from_profile(
            InvestorProfile::PrivateLimited,
            dec!(100_000),
            dec!(14),
            dec!(10),
            dec!(10),
            12,
            dec!(15),
        );
        assert_eq!(input.investor_kind, InvestorKind::Company);
        assert_eq!(input.investor_tax_rate_pct, dec!(25));
    }

    #[test]
    fn test_input_deserializes_without_kind() {
        let json = serde_json::json!({
            "principal": "100000",
            "bond1_rate_pct": "14",
            "bond2_rate_pct": "10",
            "loan_rate_pct": "10",
            "tenure_months": 12,
            "investor_tax_rate_pct": "30",
            "bond2_tax_rate_pct": "15"
        });
        let input: SimulationInput = serde_json::from_value(json).unwrap();
        assert_eq!(input, default_input());
    }
}
