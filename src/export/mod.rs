//! # Scan Export
//!
//! Writes the data rows of one scan in a form other programs read:
//!
//! - `spec`: a minimal spec block (`#S`, `#N`, `#L`, space-separated rows)
//! - `tabs`: tab-separated labels and rows
//! - `csv`: comma-separated labels and rows
//!
//! Values are written with 12 significant digits (C `%.12g`) and every
//! export ends with a blank line, so several scans can be appended to one
//! output file.

mod error;
mod format;


use std::fmt;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::block::ScanRef;

pub use error::ExportError;
pub use format::{format_g, format_g12, EXPORT_PRECISION};

/// Output layout for exported scans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Minimal spec scan block
    #[default]
    Spec,
    /// Tab-separated values
    Tabs,
    /// Comma-separated values
    Csv,
}

impl ExportFormat {
    fn delimiter(self) -> Option<u8> {
        match self {
            Self::Spec => None,
            Self::Tabs => Some(b'\t'),
            Self::Csv => Some(b','),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spec" => Ok(Self::Spec),
            "tabs" | "tsv" => Ok(Self::Tabs),
            "csv" => Ok(Self::Csv),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spec => "spec",
            Self::Tabs => "tabs",
            Self::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// Write one scan's labels and data rows
pub fn write_scan<W: Write>(
    scan: &ScanRef<'_>,
    writer: &mut W,
    format: ExportFormat,
) -> Result<(), ExportError> {
    let labels = scan.labels().unwrap_or(&[]);
    let data = scan.data();

    let Some(delimiter) = format.delimiter() else {
        write!(
            writer,
            "\n#S {} {}\n#N {}\n#L {}\n",
            scan.number(),
            scan.command(),
            scan.columns(),
            labels.join("  ")
        )?;
        for row in data {
            let values: Vec<String> = row.iter().copied().map(format_g12).collect();
            writeln!(writer, "{}", values.join(" "))?;
        }
        writeln!(writer)?;
        return Ok(());
    };

    if labels.is_empty() {
        writeln!(writer)?;
    }

    let mut table = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .flexible(true)
        .from_writer(&mut *writer);

    if !labels.is_empty() {
        table.write_record(labels)?;
    }
    for row in data {
        table.write_record(row.iter().copied().map(format_g12))?;
    }
    table.flush()?;
    drop(table);

    writeln!(writer)?;
    Ok(())
}

/// Write a scan to a file, replacing it or appending to it
pub fn save_scan<P: AsRef<Path>>(
    scan: &ScanRef<'_>,
    path: P,
    format: ExportFormat,
    append: bool,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    log::debug!("saving scan (format={}) to file {}", format, path.display());

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    write_scan(scan, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}
