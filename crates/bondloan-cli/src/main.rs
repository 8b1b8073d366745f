mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::bonds::ProjectArgs;
use commands::loan::AmortizeArgs;
use commands::simulation::{SensitivityArgs, SimulateArgs};
use commands::tax::TaxArgs;

/// Bond-loan investment simulator
#[derive(Parser)]
#[command(
    name = "bondloan",
    version,
    about = "Bond-loan investment simulator with tax calculation",
    long_about = "Simulates borrowing capital, placing it in a fixed-coupon bond and a \
                  growth fund (with bond coupons reinvested monthly), repaying the loan \
                  by EMI, and taxing the result as an individual or a company. \
                  All figures are computed with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full bond-loan simulation
    Simulate(SimulateArgs),
    /// Reducing-balance loan amortization schedule
    Amortize(AmortizeArgs),
    /// Bond 2 lump sum + SIP growth projection
    Project(ProjectArgs),
    /// Tax on bond income for an individual or a company
    Tax(TaxArgs),
    /// Sweep one simulation input across a range
    Sensitivity(SensitivityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::simulation::run_simulate(args),
        Commands::Amortize(args) => commands::loan::run_amortize(args),
        Commands::Project(args) => commands::bonds::run_project(args),
        Commands::Tax(args) => commands::tax::run_tax(args),
        Commands::Sensitivity(args) => commands::simulation::run_sensitivity(args),
        Commands::Version => {
            println!("bondloan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_simulate_defaults_parse() {
        let cli = Cli::try_parse_from(["bondloan", "simulate"]).unwrap();
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.months, 12);
                assert!(args.input.is_none());
            }
            _ => panic!("expected simulate"),
        }
        assert!(matches!(cli.output, OutputFormat::Json));
    }

    #[test]
    fn test_global_output_flag() {
        let cli =
            Cli::try_parse_from(["bondloan", "amortize", "--principal", "1000", "--output", "csv"])
                .unwrap();
        assert!(matches!(cli.output, OutputFormat::Csv));
    }

    #[test]
    fn test_negative_bond2_gain_accepted() {
        let cli = Cli::try_parse_from([
            "bondloan",
            "tax",
            "--bond1-interest",
            "1000",
            "--bond2-gain",
            "-250",
            "--tax-rate",
            "30",
        ]);
        assert!(cli.is_ok());
    }
}
