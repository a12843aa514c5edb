//! Report rendering
//!
//! Turns monthly totals and rejections into output rows and console text.
//! Everything here is a pure function of its input; writing files is the
//! pipeline's job.

use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::aggregate::MonthlyCategoryTotals;
use crate::error::Result;
use crate::models::Rejection;

/// Category label on the trailing row of each month group
pub const MONTH_TOTAL_LABEL: &str = "Total";

pub const SUMMARY_HEADER: [&str; 3] = ["Month", "Category", "TotalAmount"];

/// Rejections file header: the input's file line number, the four raw
/// fields as read, then the reason
pub const REJECTION_HEADER: [&str; 6] = [
    "RowNumber",
    "Category",
    "Amount",
    "Details",
    "Date",
    "Reason",
];

/// One line of the summary file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "TotalAmount")]
    pub amount: String,
}

/// One line of the rejections file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionRow {
    #[serde(rename = "RowNumber")]
    pub row_number: u64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Details")]
    pub details: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Reason")]
    pub reason: String,
}

/// Format an amount with exactly two decimal places
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Summary rows: each month's categories in stored order, then its total row
pub fn render_summary(totals: &MonthlyCategoryTotals) -> Vec<SummaryRow> {
    let mut rows = Vec::new();

    for (month, categories) in totals.months() {
        let month_total = totals.month_total(month);
        let month = month.to_string();

        for (category, amount) in categories {
            rows.push(SummaryRow {
                month: month.clone(),
                category: category.clone(),
                amount: format_amount(*amount),
            });
        }

        rows.push(SummaryRow {
            month,
            category: MONTH_TOTAL_LABEL.to_string(),
            amount: format_amount(month_total),
        });
    }

    rows
}

/// Rejection rows with the original field text, in encounter order
pub fn render_rejections(rejections: &[Rejection]) -> Vec<RejectionRow> {
    rejections
        .iter()
        .map(|r| RejectionRow {
            row_number: r.row.row_number,
            category: r.row.category.clone(),
            amount: r.row.amount.clone(),
            details: r.row.details.clone(),
            date: r.row.date.clone(),
            reason: r.reason.to_string(),
        })
        .collect()
}

/// Human-readable summary for the terminal
pub fn render_console(totals: &MonthlyCategoryTotals) -> String {
    if totals.is_empty() {
        return "No valid expense rows were found.\n".to_string();
    }

    let mut out = String::from("Category-wise expenses by month:\n");
    for (month, categories) in totals.months() {
        out.push('\n');
        out.push_str(&format!("{}\n", month));
        for (category, amount) in categories {
            out.push_str(&format!("{}, {}\n", category, format_amount(*amount)));
        }
        out.push_str(&format!(
            "    Total: {}\n",
            format_amount(totals.month_total(month))
        ));
    }
    out
}

/// Console notice pointing at the rejections file, if anything was rejected
pub fn rejection_notice(count: usize, rejections_path: &Path) -> Option<String> {
    if count == 0 {
        return None;
    }

    let name = rejections_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| rejections_path.display().to_string());

    Some(format!(
        "{} row(s) were excluded. See '{}' for details.",
        count, name
    ))
}

/// Write summary rows as CSV, header included even when empty
pub fn write_summary<W: Write>(writer: W, rows: &[SummaryRow]) -> Result<()> {
    write_rows(writer, &SUMMARY_HEADER, rows)
}

/// Write rejection rows as CSV, header included even when empty
pub fn write_rejections<W: Write>(writer: W, rows: &[RejectionRow]) -> Result<()> {
    write_rows(writer, &REJECTION_HEADER, rows)
}

fn write_rows<W: Write, T: Serialize>(writer: W, header: &[&str], rows: &[T]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(header)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::models::{RawRow, Record, RejectReason};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(category: &str, amount: Decimal, m: u32) -> Record {
        Record {
            category: category.to_string(),
            amount,
            details: String::new(),
            date: NaiveDate::from_ymd_opt(2025, m, 1).unwrap(),
        }
    }

    fn september() -> MonthlyCategoryTotals {
        aggregate(&[
            record("Food", dec!(12.50), 9),
            record("Transport", dec!(5.00), 9),
        ])
        .unwrap()
    }

    fn to_string(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(5)), "5.00");
        assert_eq!(format_amount(dec!(12.5)), "12.50");
        assert_eq!(format_amount(dec!(17.50)), "17.50");
        assert_eq!(format_amount(dec!(0.125)), "0.13");
        assert_eq!(format_amount(dec!(1234.5678)), "1234.57");
    }

    #[test]
    fn test_render_summary_with_month_total() {
        let rows = render_summary(&september());
        let flat: Vec<_> = rows
            .iter()
            .map(|r| (r.month.as_str(), r.category.as_str(), r.amount.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("2025-09", "Food", "12.50"),
                ("2025-09", "Transport", "5.00"),
                ("2025-09", "Total", "17.50"),
            ]
        );
    }

    #[test]
    fn test_render_summary_groups_each_month() {
        let totals = aggregate(&[
            record("Rent", dec!(900), 10),
            record("Food", dec!(20), 9),
            record("Food", dec!(5), 10),
        ])
        .unwrap();
        let rows = render_summary(&totals);
        let flat: Vec<_> = rows
            .iter()
            .map(|r| format!("{},{},{}", r.month, r.category, r.amount))
            .collect();
        assert_eq!(
            flat,
            vec![
                "2025-10,Rent,900.00",
                "2025-10,Food,5.00",
                "2025-10,Total,905.00",
                "2025-09,Food,20.00",
                "2025-09,Total,20.00",
            ]
        );
    }

    #[test]
    fn test_render_summary_empty() {
        assert!(render_summary(&MonthlyCategoryTotals::new()).is_empty());
    }

    #[test]
    fn test_render_rejections_keeps_raw_text() {
        let rejections = vec![
            Rejection {
                row: RawRow::new(2, "", "10", "Snack", "01-09-2025"),
                reason: RejectReason::MissingCategory,
            },
            Rejection {
                row: RawRow::new(4, "Food", " -3 ", "x", "01-09-2025"),
                reason: RejectReason::InvalidAmount,
            },
        ];
        let rows = render_rejections(&rejections);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].category, "");
        assert_eq!(rows[0].reason, "MissingCategory");
        assert_eq!(rows[1].amount, " -3 ");
        assert_eq!(rows[1].reason, "InvalidAmount");
    }

    #[test]
    fn test_render_console() {
        let expected = "Category-wise expenses by month:\n\
                        \n\
                        2025-09\n\
                        Food, 12.50\n\
                        Transport, 5.00\n    Total: 17.50\n";
        assert_eq!(render_console(&september()), expected);
    }

    #[test]
    fn test_render_console_empty() {
        assert_eq!(
            render_console(&MonthlyCategoryTotals::new()),
            "No valid expense rows were found.\n"
        );
    }

    #[test]
    fn test_rejection_notice() {
        let path = Path::new("/tmp/out/invalid_expenses.csv");
        assert_eq!(rejection_notice(0, path), None);
        assert_eq!(
            rejection_notice(3, path).unwrap(),
            "3 row(s) were excluded. See 'invalid_expenses.csv' for details."
        );
    }

    #[test]
    fn test_write_summary_csv() {
        let mut buf = Vec::new();
        write_summary(&mut buf, &render_summary(&september())).unwrap();
        assert_eq!(
            to_string(buf),
            "Month,Category,TotalAmount\n\
             2025-09,Food,12.50\n\
             2025-09,Transport,5.00\n\
             2025-09,Total,17.50\n"
        );
    }

    #[test]
    fn test_write_rejections_header_only_when_empty() {
        let mut buf = Vec::new();
        write_rejections(&mut buf, &[]).unwrap();
        assert_eq!(
            to_string(buf),
            "RowNumber,Category,Amount,Details,Date,Reason\n"
        );
    }

    #[test]
    fn test_write_rejections_quotes_fields() {
        let rows = render_rejections(&[Rejection {
            row: RawRow::new(7, "Food", "1,5", "say \"hi\"", "01-09-2025"),
            reason: RejectReason::InvalidDate,
        }]);
        let mut buf = Vec::new();
        write_rejections(&mut buf, &rows).unwrap();
        assert_eq!(
            to_string(buf),
            "RowNumber,Category,Amount,Details,Date,Reason\n\
             7,Food,\"1,5\",\"say \"\"hi\"\"\",01-09-2025,InvalidDate\n"
        );
    }
}
