use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Polling interval when neither the flag nor the config sets one
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Poll a growing file and print scans as they appear.
///
/// The last scan of the file may still be acquiring, so it is printed only
/// once a later scan closes it.
pub fn run(file: PathBuf, interval_ms: u64, max_polls: usize) -> Result<()> {
    let mut spec_file = super::open_file(&file)?;
    let interval = Duration::from_millis(interval_ms.max(1));

    info!(
        "Following {} every {} ms ({} scans so far)",
        file.display(),
        interval.as_millis(),
        spec_file.number_scans()
    );

    let mut printed = 0usize;
    let mut polls = 0usize;
    loop {
        let total = spec_file.number_scans();
        let closed = total.saturating_sub(1);
        while printed < closed {
            if let Some(scan) = spec_file.index().scan_at(printed) {
                println!("{}\t{} points", scan, scan.lines());
            }
            printed += 1;
        }

        polls += 1;
        if max_polls > 0 && polls >= max_polls {
            break;
        }

        thread::sleep(interval);
        let grew = spec_file
            .update()
            .with_context(|| format!("Failed to re-index {}", file.display()))?;
        debug!("poll {}: grew={}", polls, grew);
    }

    // Report the open scan on exit
    while printed < spec_file.number_scans() {
        if let Some(scan) = spec_file.index().scan_at(printed) {
            println!("{}\t{} points (open)", scan, scan.lines());
        }
        printed += 1;
    }

    Ok(())
}
