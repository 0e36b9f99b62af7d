use anyhow::Result;
use std::path::PathBuf;

/// Print one line per scan
pub fn run(file: PathBuf) -> Result<()> {
    let spec_file = super::open_file(&file)?;

    println!(
        "{:>6} {:>5} {:>6} {:>7} {:>6}  {}",
        "#S", "order", "points", "spectra", "errors", "command"
    );
    for scan in spec_file.scans() {
        println!(
            "{:>6} {:>5} {:>6} {:>7} {:>6}  {}",
            scan.number(),
            scan.order(),
            scan.lines(),
            scan.spectrum_count(),
            scan.errors().len(),
            scan.command()
        );
    }

    Ok(())
}
