//! End-to-end run: read the expense file, validate, aggregate, write reports
//!
//! The run is a single synchronous pass. Row failures become rejections;
//! anything else (unreadable input, bad header, unwritable output) fails the
//! whole run.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, info, warn};

use crate::aggregate::{aggregate, MonthlyCategoryTotals};
use crate::config::Config;
use crate::dates::DateNormalizer;
use crate::error::{Error, Result};
use crate::models::{RawRow, Rejection};
use crate::parse::parse_rows;
use crate::report::{
    render_rejections, render_summary, write_rejections, write_summary, RejectionRow, SummaryRow,
};

/// Required header, in order
pub const EXPECTED_HEADER: [&str; 4] = ["Category", "Amount", "Details", "Date"];

/// Outcome of processing one input file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub totals: MonthlyCategoryTotals,
    pub rejections: Vec<Rejection>,
    /// Data rows read, valid or not
    pub rows_read: usize,
}

impl RunReport {
    pub fn valid_count(&self) -> usize {
        self.totals.record_count()
    }

    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        render_summary(&self.totals)
    }

    pub fn rejection_rows(&self) -> Vec<RejectionRow> {
        render_rejections(&self.rejections)
    }
}

/// Read raw rows after checking the header
///
/// Short rows are padded with empty fields; fields past the fourth are
/// ignored.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    check_header(rdr.headers()?)?;

    let mut rows = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1; fall back to counting when no position is known
        let row_number = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 2);

        if record.len() > EXPECTED_HEADER.len() {
            debug!(
                "Row {} has {} fields, ignoring the extra ones",
                row_number,
                record.len()
            );
        }

        let field = |i: usize| record.get(i).unwrap_or("").to_string();
        rows.push(RawRow {
            row_number,
            category: field(0),
            amount: field(1),
            details: field(2),
            date: field(3),
        });
    }

    debug!("Read {} rows", rows.len());
    Ok(rows)
}

fn check_header(headers: &StringRecord) -> Result<()> {
    let found: Vec<&str> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim()
        })
        .collect();

    if found != EXPECTED_HEADER {
        return Err(Error::Header {
            expected: EXPECTED_HEADER.join(","),
            found: found.join(","),
        });
    }
    Ok(())
}

/// Read, validate and aggregate everything from `reader`
pub fn process<R: Read>(reader: R, dates: &DateNormalizer) -> Result<RunReport> {
    let rows = read_rows(reader)?;
    let parsed = parse_rows(&rows, dates);
    let totals = aggregate(&parsed.records)?;

    Ok(RunReport {
        totals,
        rejections: parsed.rejections,
        rows_read: rows.len(),
    })
}

/// Full run: process the configured input and write both output files
pub fn run(config: &Config) -> Result<RunReport> {
    let dates = config.date_normalizer()?;

    info!("Reading expenses from {}", config.paths.input.display());
    let file = File::open(&config.paths.input)?;
    let report = process(file, &dates)?;

    info!(
        "Processed {} rows: {} valid, {} rejected",
        report.rows_read,
        report.valid_count(),
        report.rejections.len()
    );

    write_outputs(&report, &config.paths.summary, &config.paths.rejections)?;
    Ok(report)
}

/// Write the summary and rejection files as a pair
///
/// Both files are rendered into temporary files next to their targets.
/// Targets are only replaced once both renders have succeeded, and if the
/// rejections file cannot be put in place the previous summary is restored.
pub fn write_outputs(
    report: &RunReport,
    summary_path: &Path,
    rejections_path: &Path,
) -> Result<()> {
    if summary_path == rejections_path {
        return Err(Error::Output(format!(
            "summary and rejections must be different files ({})",
            summary_path.display()
        )));
    }
    for target in [summary_path, rejections_path] {
        if target.is_dir() {
            return Err(Error::Output(format!(
                "{} is a directory",
                target.display()
            )));
        }
    }

    let summary_rows = report.summary_rows();
    let rejection_rows = report.rejection_rows();

    let staged_summary = stage(summary_path, |file| write_summary(file, &summary_rows))?;
    let staged_rejections = stage(rejections_path, |file| {
        write_rejections(file, &rejection_rows)
    })?;

    commit_pair(
        (staged_summary, summary_path),
        (staged_rejections, rejections_path),
    )?;

    info!(
        "Wrote {} summary rows to {}",
        summary_rows.len(),
        summary_path.display()
    );
    info!(
        "Wrote {} rejected rows to {}",
        rejection_rows.len(),
        rejections_path.display()
    );
    Ok(())
}

fn staging_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Render into a temp file in the target's directory
fn stage<F>(target: &Path, render: F) -> Result<NamedTempFile>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let dir = staging_dir(target);
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| {
        Error::Output(format!(
            "Failed to create temp file in {}: {}",
            dir.display(),
            e
        ))
    })?;
    render(&mut staged)?;
    staged.as_file().sync_all()?;
    Ok(staged)
}

/// Put both staged files in place; undo the first if the second fails
fn commit_pair(first: (NamedTempFile, &Path), second: (NamedTempFile, &Path)) -> Result<()> {
    let (staged_first, first_path) = first;
    let (staged_second, second_path) = second;

    let previous = backup(first_path)?;
    commit(staged_first, first_path)?;

    if let Err(e) = commit(staged_second, second_path) {
        restore(first_path, previous);
        return Err(e);
    }
    Ok(())
}

/// Copy an existing target aside so it can be put back
fn backup(target: &Path) -> Result<Option<TempPath>> {
    if !target.is_file() {
        return Ok(None);
    }

    let copy = NamedTempFile::new_in(staging_dir(target))?.into_temp_path();
    fs::copy(target, &copy).map_err(|e| {
        Error::Output(format!("Failed to back up {}: {}", target.display(), e))
    })?;
    Ok(Some(copy))
}

fn restore(target: &Path, previous: Option<TempPath>) {
    let restored = match previous {
        Some(copy) => copy.persist(target).map_err(|e| e.error),
        None => fs::remove_file(target),
    };

    match restored {
        Ok(()) => debug!("Rolled back {}", target.display()),
        Err(e) => warn!("Failed to roll back {}: {}", target.display(), e),
    }
}

fn commit(staged: NamedTempFile, target: &Path) -> Result<()> {
    staged.persist(target).map_err(|e| {
        Error::Output(format!("Failed to write {}: {}", target.display(), e.error))
    })?;
    Ok(())
}
