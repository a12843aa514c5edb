//! Domain models for Tally

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// One data row exactly as read from the expense file
///
/// Fields are kept verbatim (untrimmed) so rejections can be reported
/// against the original text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the input; the header is row 1
    pub row_number: u64,
    pub category: String,
    pub amount: String,
    pub details: String,
    pub date: String,
}

impl RawRow {
    pub fn new(
        row_number: u64,
        category: impl Into<String>,
        amount: impl Into<String>,
        details: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            row_number,
            category: category.into(),
            amount: amount.into(),
            details: details.into(),
            date: date.into(),
        }
    }
}

/// A validated expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Trimmed, whitespace-collapsed, never empty
    pub category: String,
    /// Always greater than zero
    pub amount: Decimal,
    pub details: String,
    pub date: NaiveDate,
}

impl Record {
    /// The month this expense is grouped under
    pub fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

/// Why a row was rejected
///
/// Validation is fail-fast: a row carries the reason for the first field
/// that failed, checked in the order category, amount, date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    MissingCategory,
    InvalidAmount,
    InvalidDate,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingCategory => "MissingCategory",
            Self::InvalidAmount => "InvalidAmount",
            Self::InvalidDate => "InvalidDate",
        }
    }
}

impl std::str::FromStr for RejectReason {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "missingcategory" | "missing_category" => Ok(Self::MissingCategory),
            "invalidamount" | "invalid_amount" => Ok(Self::InvalidAmount),
            "invaliddate" | "invalid_date" => Ok(Self::InvalidDate),
            _ => Err(format!("Unknown reject reason: {}", s)),
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A row that failed validation, kept for the audit file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub row: RawRow,
    pub reason: RejectReason,
}

/// Year and month used to group totals, rendered as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
