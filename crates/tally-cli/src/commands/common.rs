//! Shared utilities for commands
//!
//! This module contains:
//! - `load_config` - Load the config file (or built-in defaults)
//! - `apply_overrides` - Layer command-line flags over the loaded config

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tally_core::Config;
use tracing::debug;

/// Load configuration from `--config`, the override location, or defaults
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(Some(path))
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Config::load(None).context("Failed to load config"),
    }
}

/// Apply command-line flags on top of the loaded configuration
///
/// `date_formats`, when non-empty, replaces the configured layouts entirely.
pub fn apply_overrides(
    config: &mut Config,
    input: Option<PathBuf>,
    summary: Option<PathBuf>,
    rejections: Option<PathBuf>,
    date_formats: Vec<String>,
) -> Result<()> {
    if let Some(input) = input {
        config.paths.input = input;
    }
    if let Some(summary) = summary {
        config.paths.summary = summary;
    }
    if let Some(rejections) = rejections {
        config.paths.rejections = rejections;
    }
    if !date_formats.is_empty() {
        config.dates.layouts = date_formats;
        config
            .date_normalizer()
            .context("Invalid --date-format")?;
    }

    debug!("Effective config: {:?}", config);
    Ok(())
}
