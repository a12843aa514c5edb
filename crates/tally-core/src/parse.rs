//! Record parsing and validation
//!
//! Each raw row becomes either a [`Record`] or a [`Rejection`]. Fields are
//! checked in a fixed order (category, amount, date) and the first failure
//! decides the reason.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::dates::DateNormalizer;
use crate::models::{RawRow, Record, RejectReason, Rejection};

/// Valid records and rejections, each in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRows {
    pub records: Vec<Record>,
    pub rejections: Vec<Rejection>,
}

/// Validate one raw row
pub fn parse(row: &RawRow, dates: &DateNormalizer) -> std::result::Result<Record, Rejection> {
    validate(row, dates).map_err(|reason| Rejection {
        row: row.clone(),
        reason,
    })
}

/// Validate a batch of rows, keeping input order on both sides
pub fn parse_rows<'a, I>(rows: I, dates: &DateNormalizer) -> ParsedRows
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let mut parsed = ParsedRows::default();

    for row in rows {
        match parse(row, dates) {
            Ok(record) => parsed.records.push(record),
            Err(rejection) => {
                debug!(
                    "Row {} rejected: {}",
                    rejection.row.row_number, rejection.reason
                );
                parsed.rejections.push(rejection);
            }
        }
    }

    debug!(
        "Parsed {} valid rows, {} rejected",
        parsed.records.len(),
        parsed.rejections.len()
    );
    parsed
}

fn validate(row: &RawRow, dates: &DateNormalizer) -> std::result::Result<Record, RejectReason> {
    let category = normalize_category(&row.category).ok_or(RejectReason::MissingCategory)?;
    let amount = parse_amount(&row.amount).ok_or(RejectReason::InvalidAmount)?;
    let date = dates
        .normalize(&row.date)
        .ok_or(RejectReason::InvalidDate)?;

    Ok(Record {
        category,
        amount,
        details: row.details.trim().to_string(),
        date,
    })
}

/// Trim and collapse internal whitespace; `None` if nothing is left
fn normalize_category(s: &str) -> Option<String> {
    let cleaned = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Parse a strictly positive amount, ignoring `,` thousands separators
fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned)
        .ok()
        .filter(|amount| *amount > Decimal::ZERO)
}
