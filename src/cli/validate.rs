use anyhow::{Context, Result};
use log::{info, warn};
use std::io::IsTerminal;
use std::path::PathBuf;

use specfile::validator::validate_index;

/// Validate every block of a spec file; exits with status 1 on failures
pub fn run(file: PathBuf, json: bool) -> Result<()> {
    let spec_file = super::open_file(&file)?;
    let report = validate_index(spec_file.index(), file.display().to_string());
    info!(
        "checked {} headers and {} scans in {}",
        spec_file.number_headers(),
        spec_file.number_scans(),
        file.display()
    );

    if json {
        let text = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", text);
    } else {
        print!("{}", report.render(std::io::stdout().is_terminal()));
    }

    if report.has_failures() {
        let failed: Vec<String> = report
            .failed_scans()
            .map(|(number, order)| format!("{}.{}", number, order))
            .collect();
        if !failed.is_empty() {
            warn!("scans with parse errors: {}", failed.join(", "));
        }
        std::process::exit(1);
    }
    Ok(())
}
