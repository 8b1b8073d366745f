use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::SimulatorError;
use crate::types::{Money, Percent, Rate};
use crate::SimulatorResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Convert an annual percentage (e.g. 12.0) into a monthly decimal rate (0.01).
pub fn monthly_rate(annual_pct: Percent) -> Rate {
    annual_pct / MONTHS_PER_YEAR / PERCENT
}

/// Convert a percentage into a decimal fraction (25.0 -> 0.25).
pub fn pct_to_fraction(pct: Percent) -> Rate {
    pct / PERCENT
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Rate, n: u32) -> SimulatorResult<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.checked_mul(factor).ok_or_else(|| {
            SimulatorError::invalid(
                "periods",
                format!("(1 + {rate})^{n} exceeds the representable decimal range"),
            )
        })?;
    }
    Ok(result)
}

/// Equated monthly installment on the reducing-balance method:
/// EMI = P * r * (1+r)^n / ((1+r)^n - 1), or P / n when r is zero.
pub fn emi(principal: Money, rate: Rate, nper: u32) -> SimulatorResult<Money> {
    if nper == 0 {
        return Err(SimulatorError::invalid(
            "months",
            "Number of periods must be > 0",
        ));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = compound(rate, nper)?;
    let denom = factor - Decimal::ONE;

    if denom.is_zero() {
        return Err(SimulatorError::DivisionByZero {
            context: "EMI annuity factor".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denom))
        .ok_or_else(|| SimulatorError::out_of_range("principal"))
}

/// Future value of a lump sum: PV * (1+r)^n
pub fn fv_lump_sum(present_value: Money, rate: Rate, nper: u32) -> SimulatorResult<Money> {
    lump_sum_from_factor(present_value, compound(rate, nper)?)
}

/// Future value of a level contribution paid at the start of each period
/// (annuity due): pmt * [((1+r)^n - 1) / r] * (1+r). Zero rate degenerates
/// to pmt * n.
pub fn fv_annuity_due(pmt: Money, rate: Rate, nper: u32) -> SimulatorResult<Money> {
    annuity_due_from_factor(pmt, rate, nper, compound(rate, nper)?)
}

/// [`fv_lump_sum`] with `(1+r)^n` already known.
pub(crate) fn lump_sum_from_factor(present_value: Money, factor: Decimal) -> SimulatorResult<Money> {
    present_value
        .checked_mul(factor)
        .ok_or_else(|| SimulatorError::out_of_range("principal"))
}

/// [`fv_annuity_due`] with `(1+r)^n` already known.
pub(crate) fn annuity_due_from_factor(
    pmt: Money,
    rate: Rate,
    nper: u32,
    factor: Decimal,
) -> SimulatorResult<Money> {
    let value = if rate.is_zero() {
        pmt.checked_mul(Decimal::from(nper))
    } else {
        (factor - Decimal::ONE)
            .checked_div(rate)
            .and_then(|v| pmt.checked_mul(v))
            .and_then(|v| v.checked_mul(Decimal::ONE + rate))
    };
    value.ok_or_else(|| SimulatorError::out_of_range("monthly_contribution"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_compound_basic() {
        // 1.1^3 = 1.331
        assert_eq!(compound(dec!(0.10), 3).unwrap(), dec!(1.331));
        assert_eq!(compound(dec!(0.10), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_compound_overflow_is_error() {
        assert!(compound(dec!(10), 1000).is_err());
    }

    #[test]
    fn test_overflowing_products_are_errors() {
        let huge = Decimal::MAX / dec!(2);
        assert!(fv_lump_sum(huge, dec!(0.5), 3).is_err());
        assert!(fv_annuity_due(huge, dec!(0.5), 3).is_err());
        assert!(fv_annuity_due(huge, Decimal::ZERO, 3).is_err());
        assert!(emi(Decimal::MAX, dec!(0.5), 2).is_err());
    }

    #[test]
    fn test_emi_standard_loan() {
        // 100k at 1% per month for 12 months -> ~8884.88
        let result = emi(dec!(100_000), dec!(0.01), 12).unwrap();
        assert!((result - dec!(8884.88)).abs() < dec!(0.01), "emi={result}");
    }

    #[test]
    fn test_emi_zero_rate() {
        let result = emi(dec!(120_000), Decimal::ZERO, 12).unwrap();
        assert_eq!(result, dec!(10_000));
    }

    #[test]
    fn test_emi_zero_periods() {
        assert!(emi(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_fv_annuity_due_basic() {
        // 1000/month at 1% for 12 months, paid in advance: ~12809.33
        let result = fv_annuity_due(dec!(1000), dec!(0.01), 12).unwrap();
        assert!((result - dec!(12809.33)).abs() < dec!(0.01), "fv={result}");
    }

    #[test]
    fn test_fv_annuity_due_zero_rate() {
        assert_eq!(
            fv_annuity_due(dec!(1000), Decimal::ZERO, 12).unwrap(),
            dec!(12000)
        );
    }
}
