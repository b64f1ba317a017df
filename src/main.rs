mod categorizer;
mod cli;
mod error;
mod fmt;
mod importer;
mod models;
mod reports;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, RulesCommands};
use error::FinsortError;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Report { file, rules, json } => {
            cli::report::run(file.as_deref(), rules.as_deref(), *json)
        }
        Commands::Rules { command } => match command {
            RulesCommands::List { rules } => cli::rules::list(rules.as_deref()),
            RulesCommands::Export { output } => cli::rules::export(output.as_deref()),
        },
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        let settings = settings::load_settings();
        match &e {
            FinsortError::FileNotFound(path) => {
                eprintln!("\n{}", cli::report::layout_hint(Some(path.as_path()), &settings.columns));
            }
            FinsortError::MissingColumn(_) => {
                eprintln!("\n{}", cli::report::layout_hint(None, &settings.columns));
            }
            _ => {}
        }
        std::process::exit(1);
    }
}
