//! Tally CLI - Monthly expense summarizer
//!
//! Usage:
//!   tally                          Summarize expenses.csv with default paths
//!   tally summarize --input CSV    Write monthly summary and rejected rows
//!   tally validate --input CSV     List rejected rows without writing files
//!   tally layouts                  Show accepted date layouts

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let mut config = commands::load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or_default() {
        Commands::Summarize {
            input,
            summary,
            rejections,
        } => {
            commands::apply_overrides(
                &mut config,
                input.input,
                summary,
                rejections,
                input.date_formats,
            )?;
            commands::cmd_summarize(&config).map(|_| ())
        }
        Commands::Validate { input } => {
            commands::apply_overrides(&mut config, input.input, None, None, input.date_formats)?;
            commands::cmd_validate(&config).map(|_| ())
        }
        Commands::Layouts { date_formats } => {
            commands::apply_overrides(&mut config, None, None, None, date_formats)?;
            commands::cmd_layouts(&config)
        }
    }
}
