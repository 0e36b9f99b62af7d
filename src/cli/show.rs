use anyhow::{Context, Result};
use std::path::PathBuf;

/// Print the metadata aggregate of one scan as JSON
pub fn run(file: PathBuf, number: i64, order: usize) -> Result<()> {
    let spec_file = super::open_file(&file)?;
    let scan = super::find_scan(&spec_file, number, order)?;

    let text = serde_json::to_string_pretty(&scan.meta()).context("Failed to serialize scan")?;
    println!("{}", text);

    Ok(())
}
