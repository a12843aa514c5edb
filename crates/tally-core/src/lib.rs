//! Tally Core Library
//!
//! Shared functionality for the tally expense summarizer:
//! - Expense file reading with header verification
//! - Record parsing and validation with rejection reasons
//! - Date normalization over a configurable list of layouts
//! - Month/category aggregation in first-seen order
//! - Summary, rejection and console report rendering
//! - Configuration loading (embedded defaults plus override file)

pub mod aggregate;
pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod report;

pub use aggregate::{aggregate, MonthlyCategoryTotals};
pub use config::{Config, DateConfig, PathsConfig};
pub use dates::DateNormalizer;
pub use error::{Error, Result};
pub use models::{MonthKey, RawRow, Record, RejectReason, Rejection};
pub use parse::{parse, parse_rows, ParsedRows};
pub use pipeline::{process, read_rows, run, write_outputs, RunReport};
pub use report::{render_console, render_rejections, render_summary, RejectionRow, SummaryRow};
