pub mod report;
pub mod rules;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "finsort",
    version,
    about = "Categorize a bank CSV export and print a spending report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse, categorize and summarize a transactions CSV.
    Report {
        /// Path to the CSV export (default: "default_input" from settings)
        file: Option<String>,
        /// JSON rule table to use instead of the configured one
        #[arg(long)]
        rules: Option<String>,
        /// Print the summary as JSON instead of a formatted report
        #[arg(long)]
        json: bool,
    },
    /// Inspect or export categorization rules.
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
    /// Show the settings file, rule source and expected CSV columns.
    Status,
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// List the rule table in matching order.
    List {
        /// JSON rule table to show instead of the configured one
        #[arg(long)]
        rules: Option<String>,
    },
    /// Write the built-in rule table as JSON, ready to edit.
    Export {
        /// Output file path (default: stdout)
        #[arg(long)]
        output: Option<String>,
    },
}
