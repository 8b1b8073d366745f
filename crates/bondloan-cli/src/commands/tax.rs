use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bondloan_core::tax::{self, TaxInput};

use crate::commands::simulation::KindArg;
use crate::input;

/// Arguments for a standalone tax computation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct TaxArgs {
    /// Investor tax treatment
    #[arg(long, value_enum, default_value = "individual")]
    pub kind: KindArg,

    /// Bond 1 interest received over the tenure
    #[arg(long)]
    pub bond1_interest: Option<Decimal>,

    /// Bond 2 gain over the tenure (may be negative)
    #[arg(long)]
    pub bond2_gain: Option<Decimal>,

    /// Loan interest paid over the tenure
    #[arg(long, default_value = "0")]
    pub loan_interest: Decimal,

    /// Investor tax rate in percent
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Bond 2 tax rate in percent (individuals only)
    #[arg(long, default_value = "15.0")]
    pub bond2_tax_rate: Decimal,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_tax(args: TaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tax_input: TaxInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        TaxInput {
            investor_kind: args.kind.into(),
            bond1_total_interest: args
                .bond1_interest
                .ok_or("--bond1-interest is required (or provide --input)")?,
            bond2_gain: args
                .bond2_gain
                .ok_or("--bond2-gain is required (or provide --input)")?,
            total_loan_interest: args.loan_interest,
            investor_tax_rate_pct: args
                .tax_rate
                .ok_or("--tax-rate is required (or provide --input)")?,
            bond2_tax_rate_pct: args.bond2_tax_rate,
        }
    };
    let result = tax::compute_tax_from(&tax_input)?;
    Ok(serde_json::json!({ "result": result }))
}
