//! Bond 2: a growth fund (debt mutual fund) holding a lump sum plus a
//! systematic investment plan (SIP) contributed at the start of each month.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SimulatorError;
use crate::time_value::{annuity_due_from_factor, compound, lump_sum_from_factor, monthly_rate};
use crate::types::{Money, Month, Percent, Rate, MAX_TENURE_MONTHS};
use crate::SimulatorResult;

/// Value of the growth fund at the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bond2Growth {
    pub lump_sum_value: Money,
    pub sip_value: Money,
    pub total_value: Money,
    /// total_value - principal - contribution * months
    pub gain: Money,
}

/// Running fund value at a given month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub month: Month,
    pub portfolio_value: Money,
}

/// Input for a standalone growth projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bond2Input {
    pub principal: Money,
    pub monthly_contribution: Money,
    pub annual_rate_pct: Percent,
    pub months: Month,
}

/// Projection output: horizon values plus the month-by-month path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bond2Output {
    pub growth: Bond2Growth,
    pub projection: Vec<ProjectionRow>,
}

/// Future value of lump sum + SIP after `months`.
pub fn compute_bond2_growth(
    principal: Money,
    monthly_contribution: Money,
    annual_rate_pct: Percent,
    months: Month,
) -> SimulatorResult<Bond2Growth> {
    validate(principal, monthly_contribution, annual_rate_pct, months)?;
    let rate = monthly_rate(annual_rate_pct);
    growth_at(principal, monthly_contribution, rate, months, compound(rate, months)?)
}

/// Running total value at every month 1..=months, using the same closed
/// forms as [`compute_bond2_growth`] with the month substituted for the
/// horizon.
pub fn growth_projection(
    principal: Money,
    monthly_contribution: Money,
    annual_rate_pct: Percent,
    months: Month,
) -> SimulatorResult<Vec<ProjectionRow>> {
    validate(principal, monthly_contribution, annual_rate_pct, months)?;
    let rate = monthly_rate(annual_rate_pct);
    let step = Decimal::ONE + rate;

    let mut rows = Vec::with_capacity(months as usize);
    // (1+r)^month, carried forward one multiplication per row
    let mut factor = Decimal::ONE;
    for month in 1..=months {
        factor = factor
            .checked_mul(step)
            .ok_or_else(|| SimulatorError::out_of_range("months"))?;
        let g = growth_at(principal, monthly_contribution, rate, month, factor)?;
        rows.push(ProjectionRow {
            month,
            portfolio_value: g.total_value,
        });
    }
    Ok(rows)
}

/// Horizon growth and projection path in one call.
pub fn project_bond2(input: &Bond2Input) -> SimulatorResult<Bond2Output> {
    let growth = compute_bond2_growth(
        input.principal,
        input.monthly_contribution,
        input.annual_rate_pct,
        input.months,
    )?;
    let projection = growth_projection(
        input.principal,
        input.monthly_contribution,
        input.annual_rate_pct,
        input.months,
    )?;
    Ok(Bond2Output { growth, projection })
}

fn growth_at(
    principal: Money,
    contribution: Money,
    rate: Rate,
    months: Month,
    factor: Decimal,
) -> SimulatorResult<Bond2Growth> {
    let lump_sum_value = lump_sum_from_factor(principal, factor)?;
    let sip_value = annuity_due_from_factor(contribution, rate, months, factor)?;
    let total_value = lump_sum_value
        .checked_add(sip_value)
        .ok_or_else(|| SimulatorError::out_of_range("principal"))?;
    let contributed = contribution
        .checked_mul(Decimal::from(months))
        .ok_or_else(|| SimulatorError::out_of_range("monthly_contribution"))?;
    let gain = total_value - principal - contributed;

    Ok(Bond2Growth {
        lump_sum_value,
        sip_value,
        total_value,
        gain,
    })
}

fn validate(
    principal: Money,
    contribution: Money,
    annual_rate_pct: Percent,
    months: Month,
) -> SimulatorResult<()> {
    if principal < Decimal::ZERO {
        return Err(SimulatorError::invalid(
            "principal",
            "Bond 2 lump sum cannot be negative",
        ));
    }
    if contribution < Decimal::ZERO {
        return Err(SimulatorError::invalid(
            "monthly_contribution",
            "SIP contribution cannot be negative",
        ));
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(SimulatorError::invalid(
            "bond2_rate_pct",
            "Bond 2 return rate cannot be negative",
        ));
    }
    if months > MAX_TENURE_MONTHS {
        return Err(SimulatorError::invalid(
            "months",
            format!("Projection horizon cannot exceed {MAX_TENURE_MONTHS} months"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lump_sum_only() {
        let g = compute_bond2_growth(dec!(100_000), Decimal::ZERO, dec!(12), 12).unwrap();
        // 100k * 1.01^12 ≈ 112682.50
        assert!((g.lump_sum_value - dec!(112682.50)).abs() < dec!(0.01));
        assert_eq!(g.sip_value, Decimal::ZERO);
        assert_eq!(g.gain, g.lump_sum_value - dec!(100_000));
    }

    #[test]
    fn test_sip_paid_in_advance() {
        let g = compute_bond2_growth(Decimal::ZERO, dec!(1000), dec!(12), 12).unwrap();
        assert!((g.sip_value - dec!(12809.33)).abs() < dec!(0.01));
        assert!((g.gain - dec!(809.33)).abs() < dec!(0.01));
    }

    #[test]
    fn test_zero_rate_sip_is_contribution_times_months() {
        let g = compute_bond2_growth(dec!(50_000), dec!(1500), Decimal::ZERO, 24).unwrap();
        assert_eq!(g.sip_value, dec!(36_000));
        assert_eq!(g.lump_sum_value, dec!(50_000));
        assert_eq!(g.gain, Decimal::ZERO);
    }

    #[test]
    fn test_projection_matches_horizon_and_is_non_decreasing() {
        let horizon = compute_bond2_growth(dec!(100_000), dec!(1166.67), dec!(10), 36).unwrap();
        let path = growth_projection(dec!(100_000), dec!(1166.67), dec!(10), 36).unwrap();

        assert_eq!(path.len(), 36);
        assert_eq!(path[0].month, 1);
        assert_eq!(path.last().unwrap().portfolio_value, horizon.total_value);
        for pair in path.windows(2) {
            assert!(pair[1].portfolio_value >= pair[0].portfolio_value);
        }
    }

    #[test]
    fn test_projection_empty_for_zero_months() {
        let path = growth_projection(dec!(100_000), dec!(1000), dec!(10), 0).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_projection_rows_match_horizon_at_every_month() {
        let path = growth_projection(dec!(250_000), dec!(2500), dec!(8), 24).unwrap();
        for row in &path {
            let g = compute_bond2_growth(dec!(250_000), dec!(2500), dec!(8), row.month).unwrap();
            assert_eq!(row.portfolio_value, g.total_value);
        }
    }

    #[test]
    fn test_projection_at_tenure_limit() {
        let path =
            growth_projection(dec!(100_000), dec!(1000), dec!(6), MAX_TENURE_MONTHS).unwrap();
        assert_eq!(path.len(), MAX_TENURE_MONTHS as usize);
    }

    #[test]
    fn test_horizon_above_limit_rejected() {
        let too_long = MAX_TENURE_MONTHS + 1;
        assert!(growth_projection(dec!(100_000), dec!(1000), dec!(10), too_long).is_err());
        assert!(compute_bond2_growth(dec!(100_000), dec!(1000), dec!(10), u32::MAX).is_err());
    }

    #[test]
    fn test_overflowing_growth_is_error_not_panic() {
        let huge = Decimal::MAX / dec!(2);
        let err = compute_bond2_growth(huge, Decimal::ZERO, dec!(100), 60).unwrap_err();
        assert!(matches!(err, SimulatorError::InvalidInput { .. }));
        assert!(growth_projection(huge, huge, Decimal::ZERO, 3).is_err());
    }

    #[test]
    fn test_negative_contribution_rejected() {
        assert!(compute_bond2_growth(dec!(100_000), dec!(-1), dec!(10), 12).is_err());
    }

    #[test]
    fn test_project_bond2_bundle() {
        let input = Bond2Input {
            principal: dec!(200_000),
            monthly_contribution: dec!(2000),
            annual_rate_pct: dec!(9),
            months: 18,
        };
        let out = project_bond2(&input).unwrap();
        assert_eq!(out.projection.len(), 18);
        assert_eq!(
            out.projection.last().unwrap().portfolio_value,
            out.growth.total_value
        );
    }
}
