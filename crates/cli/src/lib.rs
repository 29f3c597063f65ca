pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::DataOptions;

#[derive(Debug, Parser)]
#[command(
    name = "crossell",
    about = "Cross-sell recommendation operator CLI",
    long_about = "Generate recommendation reports, classify customers, and validate \
runtime readiness against a CSV catalog snapshot.",
    after_help = "Examples:\n  crossell recommend --customer C001\n  crossell classify --customer C001 --data-dir ./data\n  crossell doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Generate the full recommendation report for one customer")]
    Recommend {
        #[arg(long, help = "Customer id to analyze")]
        customer: String,
        #[arg(long, help = "Directory holding the CSV snapshot files")]
        data_dir: Option<PathBuf>,
        #[arg(long, help = "Oracle fail policy override (fail_open|fail_closed)")]
        fail_policy: Option<String>,
    },
    #[command(about = "Classify one customer from sales volume and store count")]
    Classify {
        #[arg(long, help = "Customer id to classify")]
        customer: String,
        #[arg(long, help = "Directory holding the CSV snapshot files")]
        data_dir: Option<PathBuf>,
    },
    #[command(about = "List the customers present in the catalog snapshot")]
    Customers {
        #[arg(long, help = "Directory holding the CSV snapshot files")]
        data_dir: Option<PathBuf>,
    },
    #[command(about = "Validate config, snapshot readability, and oracle credential readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend { customer, data_dir, fail_policy } => {
            match commands::parse_fail_policy(fail_policy.as_deref()) {
                Ok(fail_policy) => commands::recommend::run(
                    &customer,
                    &DataOptions { data_dir, fail_policy },
                ),
                Err(result) => result,
            }
        }
        Command::Classify { customer, data_dir } => {
            commands::classify::run(&customer, &DataOptions { data_dir, fail_policy: None })
        }
        Command::Customers { data_dir } => {
            commands::customers::run(&DataOptions { data_dir, fail_policy: None })
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
