//! Bond 1: a fixed-coupon bond paying simple interest monthly on the face
//! amount. Coupons are not compounded inside the bond; the simulator routes
//! them into bond 2 instead.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SimulatorError;
use crate::time_value::monthly_rate;
use crate::types::{Money, Month, Percent};
use crate::SimulatorResult;

/// Coupon income from the fixed bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bond1Interest {
    pub monthly_interest: Money,
    pub total_interest: Money,
}

/// Simple monthly interest: principal * pct / 12 / 100, paid for `months`.
pub fn compute_bond1_interest(
    principal: Money,
    annual_rate_pct: Percent,
    months: Month,
) -> SimulatorResult<Bond1Interest> {
    if principal < Decimal::ZERO {
        return Err(SimulatorError::invalid(
            "principal",
            "Bond 1 investment cannot be negative",
        ));
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(SimulatorError::invalid(
            "bond1_rate_pct",
            "Bond 1 coupon rate cannot be negative",
        ));
    }

    let monthly_interest = principal
        .checked_mul(monthly_rate(annual_rate_pct))
        .ok_or_else(|| SimulatorError::out_of_range("principal"))?;
    let total_interest = monthly_interest
        .checked_mul(Decimal::from(months))
        .ok_or_else(|| SimulatorError::out_of_range("months"))?;
    Ok(Bond1Interest {
        monthly_interest,
        total_interest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_twelve_percent_on_one_lakh() {
        let r = compute_bond1_interest(dec!(100_000), dec!(12), 12).unwrap();
        assert_eq!(r.monthly_interest, dec!(1000));
        assert_eq!(r.total_interest, dec!(12000));
    }

    #[test]
    fn test_interest_is_not_compounded() {
        let one = compute_bond1_interest(dec!(100_000), dec!(14), 12).unwrap();
        let two = compute_bond1_interest(dec!(100_000), dec!(14), 24).unwrap();
        assert_eq!(two.total_interest, one.total_interest * dec!(2));
    }

    #[test]
    fn test_overflowing_total_is_error() {
        assert!(compute_bond1_interest(Decimal::MAX, dec!(1200), 2).is_err());
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(compute_bond1_interest(dec!(100_000), dec!(-0.5), 12).is_err());
    }
}
