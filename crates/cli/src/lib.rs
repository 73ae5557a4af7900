pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use movequote_core::config::{AppConfig, LoadOptions, LogFormat};

use crate::commands::catalog::CatalogKind;

#[derive(Debug, Parser)]
#[command(
    name = "movequote",
    about = "Moving quote wizard CLI",
    long_about = "Inspect the moving-quote wizard flow, calendar and catalogs, and replay recorded wizard sessions.",
    after_help = "Examples:\n  movequote flow --pickups 2 --dropoffs 1\n  movequote calendar --month 2025-11\n  movequote replay session.json --dry-run"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Print the page flow for the given address counts")]
    Flow {
        #[arg(long, default_value_t = 1)]
        pickups: usize,
        #[arg(long, default_value_t = 1)]
        dropoffs: usize,
    },
    #[command(about = "Render a month of the moving-date calendar with each day's status")]
    Calendar {
        #[arg(long, help = "Month to render as YYYY-MM (defaults to the current month)")]
        month: Option<String>,
        #[arg(long, help = "Mark this YYYY-MM-DD date as selected")]
        selected: Option<String>,
    },
    #[command(about = "List the built-in item or service catalog")]
    Catalog {
        #[arg(value_enum)]
        kind: CatalogKind,
    },
    #[command(about = "Replay a recorded wizard session and submit the resulting quote request")]
    Replay {
        script: PathBuf,
        #[arg(long, help = "Keep the submission in memory instead of writing it to disk")]
        dry_run: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Flow { pickups, dropoffs } => commands::flow::run(pickups, dropoffs),
        Command::Calendar { month, selected } => {
            commands::calendar::run(month.as_deref(), selected.as_deref())
        }
        Command::Catalog { kind } => commands::catalog::run(kind),
        Command::Replay { script, dry_run } => commands::replay::run(&script, dry_run),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays a single JSON document.
fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
}
