use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use bondloan_core::sensitivity::{self, SensitivityInput};
use bondloan_core::simulator::{self, SimulationInput};
use bondloan_core::tax::{InvestorKind, InvestorProfile};

use crate::input;

/// Investor type presets offered by the form
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InvestorArg {
    /// Individual taxed at 30%
    Individual,
    /// Private limited company taxed at 25%
    PrivateLtd,
    /// Caller-supplied --tax-rate and --investor-kind
    Custom,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Individual,
    Company,
}

impl From<KindArg> for InvestorKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Individual => InvestorKind::Individual,
            KindArg::Company => InvestorKind::Company,
        }
    }
}

/// Arguments for a full bond-loan simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Investor capital raised through the loan
    #[arg(long, default_value = "100000")]
    pub principal: Decimal,

    /// Bond 1 coupon, percent p.a.
    #[arg(long, default_value = "14.0")]
    pub bond1_rate: Decimal,

    /// Bond 2 expected return, percent p.a.
    #[arg(long, default_value = "10.0")]
    pub bond2_rate: Decimal,

    /// Loan interest rate, percent p.a. (reducing balance)
    #[arg(long, default_value = "10.0")]
    pub loan_rate: Decimal,

    /// Tenure in months
    #[arg(long, default_value = "12")]
    pub months: u32,

    /// Investor type preset
    #[arg(long, value_enum, default_value = "individual")]
    pub investor: InvestorArg,

    /// Tax rate in percent when --investor custom
    #[arg(long, default_value = "25.0")]
    pub tax_rate: Decimal,

    /// Tax treatment when --investor custom
    #[arg(long, value_enum, default_value = "company")]
    pub investor_kind: KindArg,

    /// Bond 2 tax rate in percent (individuals only)
    #[arg(long, default_value = "15.0")]
    pub bond2_tax_rate: Decimal,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a one-way sensitivity sweep
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON or YAML input file with base scenario and sweep range
    #[arg(long)]
    pub input: Option<String>,
}

impl SimulateArgs {
    fn profile(&self) -> InvestorProfile {
        match self.investor {
            InvestorArg::Individual => InvestorProfile::Individual,
            InvestorArg::PrivateLtd => InvestorProfile::PrivateLimited,
            InvestorArg::Custom => InvestorProfile::Custom {
                kind: self.investor_kind.into(),
                tax_rate_pct: self.tax_rate,
            },
        }
    }
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input: SimulationInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        SimulationInput::from_profile(
            args.profile(),
            args.principal,
            args.bond1_rate,
            args.bond2_rate,
            args.loan_rate,
            args.months,
            args.bond2_tax_rate,
        )
    };
    let result = simulator::run_simulation(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sens_input: SensitivityInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file> or stdin required for sensitivity analysis".into());
    };
    let result = sensitivity::run_sensitivity(&sens_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args(investor: InvestorArg) -> SimulateArgs {
        SimulateArgs {
            principal: dec!(100000),
            bond1_rate: dec!(14),
            bond2_rate: dec!(10),
            loan_rate: dec!(10),
            months: 12,
            investor,
            tax_rate: dec!(22),
            investor_kind: KindArg::Company,
            bond2_tax_rate: dec!(15),
            input: None,
        }
    }

    #[test]
    fn test_presets_map_to_profiles() {
        assert_eq!(args(InvestorArg::Individual).profile(), InvestorProfile::Individual);
        assert_eq!(
            args(InvestorArg::PrivateLtd).profile(),
            InvestorProfile::PrivateLimited
        );
        assert_eq!(
            args(InvestorArg::Custom).profile(),
            InvestorProfile::Custom {
                kind: InvestorKind::Company,
                tax_rate_pct: dec!(22),
            }
        );
    }
}
