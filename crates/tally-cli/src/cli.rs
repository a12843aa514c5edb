//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tally - Monthly expense totals by category
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Summarize an expense CSV by month and category", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.local/share/tally/config.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Runs `summarize` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the expense file, write the monthly summary and rejected rows
    Summarize {
        #[command(flatten)]
        input: InputArgs,

        /// Summary CSV to write (overwritten)
        #[arg(short, long)]
        summary: Option<PathBuf>,

        /// Rejected-rows CSV to write (overwritten)
        #[arg(short, long)]
        rejections: Option<PathBuf>,
    },

    /// Check the expense file and list rejected rows without writing anything
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show the accepted date layouts, in the order they are tried
    Layouts {
        /// Date layout to accept instead of the configured ones (repeatable)
        #[arg(short = 'd', long = "date-format")]
        date_formats: Vec<String>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Self::Summarize {
            input: InputArgs::default(),
            summary: None,
            rejections: None,
        }
    }
}

/// Input options shared by commands that read the expense file
#[derive(Args, Default, Clone)]
pub struct InputArgs {
    /// Expense CSV with header Category,Amount,Details,Date
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Date layout to accept instead of the configured ones (repeatable),
    /// e.g. --date-format %Y-%m-%d
    #[arg(short = 'd', long = "date-format")]
    pub date_formats: Vec<String>,
}
