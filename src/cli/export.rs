use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use specfile::export::{save_scan, ExportFormat};

/// Export one scan's labels and data rows
pub fn run(
    file: PathBuf,
    number: i64,
    order: usize,
    output: PathBuf,
    format: ExportFormat,
    append: bool,
) -> Result<()> {
    let spec_file = super::open_file(&file)?;
    let scan = super::find_scan(&spec_file, number, order)?;

    info!("Exporting scan {} from {}", scan, file.display());
    info!("Output: {}", output.display());
    info!("Format: {}{}", format, if append { " (append)" } else { "" });

    if !scan.errors().is_empty() {
        log::warn!(
            "scan {} has {} parse errors; skipped rows are not exported",
            scan,
            scan.errors().len()
        );
    }

    save_scan(&scan, &output, format, append)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote {} rows", scan.lines());
    Ok(())
}
