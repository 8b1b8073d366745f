use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bondloan_core::bonds::sip_growth::{self, Bond2Input};

use crate::input;

/// Arguments for a bond 2 (lump sum + SIP) growth projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Lump sum invested at month 0
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// SIP contribution at the start of each month
    #[arg(long, default_value = "0")]
    pub contribution: Decimal,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Horizon in months
    #[arg(long)]
    pub months: Option<u32>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bond_input: Bond2Input = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        Bond2Input {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            monthly_contribution: args.contribution,
            annual_rate_pct: args
                .rate
                .ok_or("--rate is required (or provide --input)")?,
            months: args
                .months
                .ok_or("--months is required (or provide --input)")?,
        }
    };
    let result = sip_growth::project_bond2(&bond_input)?;
    Ok(serde_json::json!({ "result": result }))
}
