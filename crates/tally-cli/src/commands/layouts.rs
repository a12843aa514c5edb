//! Date layout listing

use anyhow::Result;
use tally_core::Config;

pub fn cmd_layouts(config: &Config) -> Result<()> {
    let normalizer = config.date_normalizer()?;

    println!("📅 Accepted date layouts (tried in order):");
    for (i, layout) in normalizer.layouts().enumerate() {
        println!("   {}. {}", i + 1, layout);
    }

    Ok(())
}
