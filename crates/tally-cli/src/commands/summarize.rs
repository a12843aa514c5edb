//! Summarize and validate command implementations

use std::fs::File;

use anyhow::{Context, Result};
use tally_core::{
    pipeline::{process, run, RunReport},
    report::{rejection_notice, render_console},
    Config,
};

/// Run the full pipeline and write both output files
pub fn cmd_summarize(config: &Config) -> Result<RunReport> {
    let report = run(config).with_context(|| {
        format!(
            "Failed to summarize expenses from {}",
            config.paths.input.display()
        )
    })?;

    print!("{}", render_console(&report.totals));

    if let Some(notice) = rejection_notice(report.rejections.len(), &config.paths.rejections) {
        println!();
        println!("{}", notice);
    }

    Ok(report)
}

/// Parse the input and report rejected rows without writing any files
pub fn cmd_validate(config: &Config) -> Result<RunReport> {
    let dates = config.date_normalizer()?;
    let file = File::open(&config.paths.input)
        .with_context(|| format!("Failed to open file: {}", config.paths.input.display()))?;
    let report = process(file, &dates)
        .with_context(|| format!("Failed to read {}", config.paths.input.display()))?;

    println!("🔍 Checked {}", config.paths.input.display());
    println!("   Rows read: {}", report.rows_read);
    println!("   Valid: {}", report.valid_count());
    println!("   Rejected: {}", report.rejections.len());

    if !report.rejections.is_empty() {
        println!();
        for rejection in &report.rejections {
            let row = &rejection.row;
            println!(
                "   Row {:>4}  {:16} {},{},{},{}",
                row.row_number,
                rejection.reason.as_str(),
                row.category,
                row.amount,
                row.details,
                row.date
            );
        }
    }

    Ok(report)
}
