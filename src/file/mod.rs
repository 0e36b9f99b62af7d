//! # Spec File Module
//!
//! Opening, indexing and re-indexing spec data files.
//!
//! Opening a file reads it once, line by line, and records where every
//! header and scan block starts. No block content is interpreted until it is
//! queried. Files that are still being written by an acquisition can be
//! followed with [`SpecFile::update`], which indexes only the appended bytes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use specfile::file::SpecFile;
//!
//! let mut file = SpecFile::open("sample.dat")?;
//! println!("{} scans", file.number_scans());
//!
//! if let Some(scan) = file.scan_by_number(12, 0) {
//!     println!("{}: {} rows", scan, scan.lines());
//! }
//!
//! // Later, while the acquisition is running
//! if file.update()? {
//!     println!("now {} scans", file.number_scans());
//! }
//! # Ok::<(), specfile::file::SpecFileError>(())
//! ```

mod error;
mod indexer;
mod registry;


use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::block::{Header, ScanRef};

pub use error::SpecFileError;
pub use indexer::IndexDelta;
pub use registry::FileIndex;

/// Default input buffer size for indexing (64KB)
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

/// Creation and modification summary of a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    /// Date of the first header
    pub created: Option<String>,

    /// Filesystem modification time
    pub modified: Option<String>,

    /// User that created the file
    pub user: Option<String>,

    /// Spec application that created the file
    pub spec: Option<String>,
}

/// A spec file on disk and its index
#[derive(Debug)]
pub struct SpecFile {
    path: PathBuf,
    index: FileIndex,
}

impl SpecFile {
    /// Open and index a spec file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SpecFileError> {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(SpecFileError::InvalidPath(format!(
                "{} is a directory",
                path.display()
            )));
        }

        let mut file = Self {
            path: path.to_path_buf(),
            index: FileIndex::new(),
        };
        file.reindex()?;
        Ok(file)
    }

    fn reindex(&mut self) -> Result<IndexDelta, SpecFileError> {
        let handle = File::open(&self.path)?;
        let mut reader = BufReader::with_capacity(DEFAULT_INPUT_BUFFER_SIZE, handle);
        self.index.index(&mut reader)
    }

    /// Index bytes appended since the last pass.
    ///
    /// Returns `true` when the file had grown. Scans and headers found
    /// earlier keep their positions; the last block may gain lines.
    pub fn update(&mut self) -> Result<bool, SpecFileError> {
        let size = std::fs::metadata(&self.path)?.len();
        let offset = self.index.offset();

        if size < offset {
            log::warn!(
                "{} shrank from {} to {} bytes; keeping the existing index",
                self.path.display(),
                offset,
                size
            );
            return Ok(false);
        }
        if size == offset {
            return Ok(false);
        }

        self.reindex()?;
        Ok(true)
    }

    /// Path the file was opened with
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path of the file
    pub fn absolute_path(&self) -> Result<PathBuf, SpecFileError> {
        Ok(std::fs::canonicalize(&self.path)?)
    }

    /// The underlying index
    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    /// Number of scans in the file
    pub fn number_scans(&self) -> usize {
        self.index.number_scans()
    }

    /// Number of header blocks in the file
    pub fn number_headers(&self) -> usize {
        self.index.number_headers()
    }

    /// Header blocks in file order
    pub fn headers(&self) -> &[Header] {
        self.index.headers()
    }

    /// All scans in file order
    pub fn scans(&self) -> impl Iterator<Item = ScanRef<'_>> + '_ {
        self.index.scans()
    }

    /// Look up a scan by number and 0-based occurrence
    pub fn scan_by_number(&self, number: i64, occurrence: usize) -> Option<ScanRef<'_>> {
        self.index.scan_by_number(number, occurrence)
    }

    /// Distinct scan numbers in ascending order
    pub fn scan_numbers(&self) -> impl Iterator<Item = i64> + '_ {
        self.index.scan_numbers()
    }

    /// Creation date of the file
    pub fn time_created(&self) -> Option<&str> {
        self.index.time_created()
    }

    /// User that created the file
    pub fn user(&self) -> Option<String> {
        self.index.user()
    }

    /// Spec application that created the file
    pub fn spec(&self) -> Option<String> {
        self.index.spec()
    }

    /// Filesystem modification time, formatted like C `asctime`
    pub fn time_modified(&self) -> Result<String, SpecFileError> {
        let modified = std::fs::metadata(&self.path)?.modified()?;
        let local: DateTime<Local> = modified.into();
        Ok(local.format("%a %b %e %H:%M:%S %Y").to_string())
    }

    /// Creation time, modification time, user and application
    pub fn info(&self) -> FileInfo {
        FileInfo {
            created: self.time_created().map(str::to_string),
            modified: self.time_modified().ok(),
            user: self.user(),
            spec: self.spec(),
        }
    }
}
