use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use specfile::block::ScanRef;
use specfile::export::ExportFormat;
use specfile::file::SpecFile;

mod export;
mod follow;
mod info;
mod list;
mod show;
mod validate;

mod config;

pub use config::Config;

/// specfile - Reader for spec scan data files
#[derive(Parser)]
#[command(name = "specfile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file with export and follow defaults
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display creation, modification and block counts of a file
    Info {
        /// Input spec file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every scan in file order
    List {
        /// Input spec file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the metadata of one scan as JSON
    Show {
        /// Input spec file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Scan number (`#S` value)
        #[arg(value_name = "SCAN", allow_negative_numbers = true)]
        scan: i64,

        /// Which occurrence of a repeated scan number (1 = first)
        #[arg(short, long, default_value_t = 1)]
        order: usize,
    },

    /// Write the labels and data rows of one scan
    Export {
        /// Input spec file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Scan number (`#S` value)
        #[arg(value_name = "SCAN", allow_negative_numbers = true)]
        scan: i64,

        /// Output file path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Output layout: spec, tabs or csv (default: spec)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Append to OUTPUT instead of replacing it
        #[arg(short, long)]
        append: bool,

        /// Which occurrence of a repeated scan number (1 = first)
        #[arg(short, long, default_value_t = 1)]
        order: usize,
    },

    /// Check every block for parse errors
    Validate {
        /// Input spec file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the report, parse errors included, as JSON
        #[arg(long)]
        json: bool,
    },

    /// Watch a file that is being written and print new scans
    Follow {
        /// Input spec file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Polling interval in milliseconds
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Stop after this many polls (0 = never)
        #[arg(long)]
        max_polls: Option<usize>,
    },
}

impl Cli {
    /// Verbosity level requested on the command line
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

/// Initialize env_logger from the `-v` count
pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Run the selected subcommand
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Info { file, json } => info::run(file, json),
        Commands::List { file } => list::run(file),
        Commands::Show { file, scan, order } => show::run(file, scan, order),
        Commands::Export {
            file,
            scan,
            output,
            format,
            append,
            order,
        } => export::run(
            file,
            scan,
            order,
            output,
            format.or(config.export.format).unwrap_or_default(),
            append || config.export.append.unwrap_or(false),
        ),
        Commands::Validate { file, json } => validate::run(file, json),
        Commands::Follow {
            file,
            interval_ms,
            max_polls,
        } => follow::run(
            file,
            interval_ms
                .or(config.follow.interval_ms)
                .unwrap_or(follow::DEFAULT_INTERVAL_MS),
            max_polls.or(config.follow.max_polls).unwrap_or(0),
        ),
    }
}

fn open_file(path: &Path) -> Result<SpecFile> {
    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }
    SpecFile::open(path).with_context(|| format!("Failed to index {}", path.display()))
}

/// Resolve a scan from its number and 1-based order
fn find_scan(file: &SpecFile, number: i64, order: usize) -> Result<ScanRef<'_>> {
    let occurrence = order
        .checked_sub(1)
        .context("Scan order starts at 1")?;
    file.scan_by_number(number, occurrence)
        .with_context(|| format!("No scan {}.{} in {}", number, order, file.path().display()))
}
