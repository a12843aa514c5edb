//! Configuration for file paths and accepted date layouts
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit file (`--config`), or the override in the data dir
//!    (~/.local/share/tally/config.toml) when it exists
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from a file keep their built-in defaults. Command-line
//! flags are applied on top by the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::dates::{DateNormalizer, DEFAULT_LAYOUTS};
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

pub const DEFAULT_INPUT: &str = "expenses.csv";
pub const DEFAULT_SUMMARY: &str = "monthly_expenses_summary.csv";
pub const DEFAULT_REJECTIONS: &str = "invalid_expenses.csv";

/// Input and output file locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub summary: PathBuf,
    pub rejections: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            summary: PathBuf::from(DEFAULT_SUMMARY),
            rejections: PathBuf::from(DEFAULT_REJECTIONS),
        }
    }
}

/// Accepted date layouts, in the order they are tried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateConfig {
    pub layouts: Vec<String>,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            layouts: DEFAULT_LAYOUTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Everything a run needs besides the input data itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub paths: PathsConfig,
    pub dates: DateConfig,
}

impl Config {
    /// Load configuration (explicit or override file first, then embedded default)
    ///
    /// An explicit path that does not exist is an error; a missing file at
    /// the default override location is not.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Self::from_toml(DEFAULT_CONFIG),
        }
    }

    /// The configuration compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut config = Config::default();

        if let Some(paths) = raw.paths {
            if let Some(input) = paths.input {
                config.paths.input = input;
            }
            if let Some(summary) = paths.summary {
                config.paths.summary = summary;
            }
            if let Some(rejections) = paths.rejections {
                config.paths.rejections = rejections;
            }
        }

        if let Some(layouts) = raw.dates.and_then(|d| d.layouts) {
            config.dates.layouts = layouts;
        }

        // Fail at load time rather than on the first row
        config.date_normalizer()?;

        Ok(config)
    }

    /// Build the date normalizer for the configured layouts
    pub fn date_normalizer(&self) -> Result<DateNormalizer> {
        DateNormalizer::new(&self.dates.layouts)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    paths: Option<RawPaths>,
    dates: Option<RawDates>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPaths {
    input: Option<PathBuf>,
    summary: Option<PathBuf>,
    rejections: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDates {
    layouts: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_default_config() {
        let config = Config::embedded().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.paths.input, PathBuf::from("expenses.csv"));
        assert_eq!(config.dates.layouts.len(), 4);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml(
            r#"
[paths]
summary = "out/summary.csv"
"#,
        )
        .unwrap();

        assert_eq!(config.paths.summary, PathBuf::from("out/summary.csv"));
        assert_eq!(config.paths.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.paths.rejections, PathBuf::from(DEFAULT_REJECTIONS));
        assert_eq!(config.dates, DateConfig::default());
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_custom_layouts() {
        let config = Config::from_toml(
            r#"
[dates]
layouts = ["%Y-%m-%d"]
"#,
        )
        .unwrap();

        let normalizer = config.date_normalizer().unwrap();
        assert_eq!(
            normalizer.normalize("2025-09-01"),
            NaiveDate::from_ymd_opt(2025, 9, 1)
        );
        assert_eq!(normalizer.normalize("01-09-2025"), None);
    }

    #[test]
    fn test_invalid_layouts_rejected_at_load() {
        assert!(matches!(
            Config::from_toml("[dates]\nlayouts = []\n"),
            Err(Error::InvalidLayout(_))
        ));
        assert!(matches!(
            Config::from_toml("[dates]\nlayouts = [\"%d-%Q\"]\n"),
            Err(Error::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            Config::from_toml("[paths\ninput = 1"),
            Err(Error::Toml(_))
        ));
        assert!(matches!(
            Config::from_toml("[paths]\ninptu = \"x.csv\"\n"),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        fs::write(&path, "[paths]\ninput = \"september.csv\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.paths.input, PathBuf::from("september.csv"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
