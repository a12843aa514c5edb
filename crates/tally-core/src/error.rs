//! Error types for Tally
//!
//! These are whole-run failures. A row that fails validation is not an
//! error; it becomes a [`crate::models::Rejection`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected CSV header: expected \"{expected}\", found \"{found}\"")]
    Header { expected: String, found: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Amount total too large for {category} in {month}")]
    AmountOverflow { month: String, category: String },

    #[error("Output error: {0}")]
    Output(String),
}

pub type Result<T> = std::result::Result<T, Error>;
