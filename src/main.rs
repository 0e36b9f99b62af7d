//! # specfile
//!
//! Command-line tool for inspecting spec scan data files.
//!
//! ## Usage
//!
//! ```bash
//! # Summary of a file
//! specfile info sample.dat
//!
//! # Export scan 12 as CSV
//! specfile export sample.dat 12 scan12.csv --format csv
//!
//! # Follow a file during acquisition
//! specfile follow sample.dat --interval-ms 500
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
