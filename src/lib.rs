//! # specfile - Reader for spec Scan Data Files
//!
//! `specfile` reads the line-oriented ASCII data files written by the spec
//! instrument-control program used at X-ray diffraction beamlines. A file is
//! a sequence of header blocks (`#F`/`#E`) and scan blocks (`#S`), each made
//! of `#`-tagged metadata lines followed by numeric data rows.
//!
//! ## Key Features
//!
//! - **Cheap Opening**: a single pass records where each block starts; the
//!   contents of a block are parsed only when first queried.
//!
//! - **Growing Files**: [`file::SpecFile::update`] indexes only the bytes
//!   appended since the last pass and extends the scan that was still open.
//!
//! - **Error Tolerance**: malformed lines never abort parsing. They are
//!   skipped and recorded per block with their relative and absolute line
//!   numbers.
//!
//! - **Repeated Scan Numbers**: scans sharing a number are told apart by
//!   their order of appearance.
//!
//! - **MCA Spectra**: `@A` lines with `\` continuations are decoded into
//!   numeric spectra, optionally energy-calibrated by `#@CALIB`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use specfile::prelude::*;
//!
//! let file = SpecFile::open("sample.dat")?;
//! println!("created {:?} by {:?}", file.time_created(), file.user());
//!
//! for scan in file.scans() {
//!     println!("{}: {} points, {} errors", scan, scan.lines(), scan.errors().len());
//! }
//!
//! if let Some(scan) = file.scan_by_number(3, 0) {
//!     save_scan(&scan, "scan3.csv", ExportFormat::Csv, false)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod block;
pub mod export;
pub mod file;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::block::{
        Calibration, CountTime, Header, ParseErrorRecord, ParseState, Scan, ScanMeta, ScanRef,
        Spectrum,
    };
    pub use crate::export::{format_g12, save_scan, write_scan, ExportError, ExportFormat};
    pub use crate::file::{FileIndex, FileInfo, SpecFile, SpecFileError};
    pub use crate::validator::{validate_spec_file, ValidationReport};
}
