//! Date normalization over an ordered list of accepted layouts
//!
//! Layouts are chrono `strftime` patterns. They come from configuration, so
//! adding a format never requires touching the parser.

use std::iter;

use chrono::format::{self, Item, Numeric, Parsed, StrftimeItems};
use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Layouts accepted when configuration does not say otherwise
pub const DEFAULT_LAYOUTS: &[&str] = &[
    "%d-%m-%Y", // 15-01-2024
    "%d-%m-%y", // 15-01-24
    "%d/%m/%Y", // 15/01/2024
    "%d/%m/%y", // 15/01/24
];

/// One accepted textual date format
#[derive(Debug, Clone, PartialEq, Eq)]
struct Layout {
    pattern: String,
    /// Uses `%Y`, so the year must be written with at least four digits
    full_year: bool,
}

impl Layout {
    fn new(pattern: &str) -> Result<Self> {
        if pattern.trim().is_empty() {
            return Err(Error::InvalidLayout("empty layout".into()));
        }

        let mut full_year = false;
        for item in StrftimeItems::new(pattern) {
            match item {
                Item::Error => {
                    return Err(Error::InvalidLayout(format!(
                        "unrecognized specifier in \"{}\"",
                        pattern
                    )))
                }
                Item::Numeric(Numeric::Year, _) => full_year = true,
                _ => {}
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            full_year,
        })
    }

    /// Parse one item at a time so the digits behind `%Y` can be counted.
    /// chrono reads `%Y` greedily from one digit up, so "25" would otherwise
    /// become the year 25; "0999" is still accepted.
    fn parse(&self, s: &str) -> Option<NaiveDate> {
        let mut parsed = Parsed::default();
        let mut rest = s;

        for item in StrftimeItems::new(&self.pattern) {
            let is_year = self.full_year && matches!(item, Item::Numeric(Numeric::Year, _));
            let remainder =
                format::parse_and_remainder(&mut parsed, rest, iter::once(item)).ok()?;
            let consumed = &rest[..rest.len() - remainder.len()];
            if is_year && consumed.chars().filter(char::is_ascii_digit).count() < 4 {
                return None;
            }
            rest = remainder;
        }

        if !rest.is_empty() {
            return None;
        }
        parsed.to_naive_date().ok()
    }
}

/// Tries each configured layout in order and returns the first real date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateNormalizer {
    layouts: Vec<Layout>,
}

impl DateNormalizer {
    /// Build a normalizer from layout patterns, in priority order
    ///
    /// Fails if the list is empty or a pattern has a specifier chrono
    /// does not understand.
    pub fn new<I, S>(layouts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let layouts = layouts
            .into_iter()
            .map(|l| Layout::new(l.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        if layouts.is_empty() {
            return Err(Error::InvalidLayout(
                "at least one date layout is required".into(),
            ));
        }

        Ok(Self { layouts })
    }

    /// Parse `text` with the first layout that yields a valid calendar date
    pub fn normalize(&self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.layouts.iter().find_map(|layout| layout.parse(text))
    }

    /// Layout patterns in the order they are tried
    pub fn layouts(&self) -> impl Iterator<Item = &str> {
        self.layouts.iter().map(|l| l.pattern.as_str())
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self {
            layouts: DEFAULT_LAYOUTS
                .iter()
                .map(|p| Layout {
                    pattern: p.to_string(),
                    full_year: p.contains("%Y"),
                })
                .collect(),
        }
    }
}
