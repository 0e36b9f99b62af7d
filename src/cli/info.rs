use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use specfile::file::FileInfo;

/// Machine-readable form of the info output
#[derive(Serialize)]
struct FileSummary {
    path: String,
    #[serde(flatten)]
    info: FileInfo,
    headers: usize,
    scans: usize,
    scan_numbers: Vec<i64>,
}

/// Display information about a spec file
pub fn run(file: PathBuf, json: bool) -> Result<()> {
    let spec_file = super::open_file(&file)?;
    let path = spec_file
        .absolute_path()
        .unwrap_or_else(|_| file.clone())
        .display()
        .to_string();
    let info = spec_file.info();

    if json {
        let summary = FileSummary {
            path,
            info,
            headers: spec_file.number_headers(),
            scans: spec_file.number_scans(),
            scan_numbers: spec_file.scan_numbers().collect(),
        };
        let text = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", text);
        return Ok(());
    }

    let unknown = || "<unknown>".to_string();

    println!("Spec File Information");
    println!("=====================");
    println!("File: {}", path);
    println!();

    println!("Origin:");
    println!("  Created:  {}", info.created.unwrap_or_else(unknown));
    println!("  Modified: {}", info.modified.unwrap_or_else(unknown));
    println!("  User:     {}", info.user.unwrap_or_else(unknown));
    println!("  Spec:     {}", info.spec.unwrap_or_else(unknown));
    println!();

    println!("Blocks:");
    println!("  Headers: {}", spec_file.number_headers());
    println!("  Scans:   {}", spec_file.number_scans());

    let repeated: Vec<i64> = spec_file
        .scan_numbers()
        .filter(|n| spec_file.index().occurrences(*n) > 1)
        .collect();
    if !repeated.is_empty() {
        let numbers: Vec<String> = repeated.iter().map(ToString::to_string).collect();
        println!("  Repeated scan numbers: {}", numbers.join(", "));
    }

    Ok(())
}
