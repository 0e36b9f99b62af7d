//! # Block Module
//!
//! A spec file is a sequence of blocks. Each block starts at a `#F`, `#E` or
//! `#S` line and owns every non-blank line up to the next block start:
//!
//! ```text
//! #F /data/run1/sample.dat      ┐
//! #E 1389712345                 │ Header
//! #D Tue Jan 14 15:52:25 2014   │
//! #C fourc  User = specuser     │
//! #O0 Two Theta  Theta  Chi     ┘
//!
//! #S 1  ascan  th 0 1 10 1      ┐
//! #D Tue Jan 14 15:53:01 2014   │
//! #P0 10.0 5.0 90.0             │ Scan
//! #N 3                          │
//! #L Theta  Monitor  Detector   │
//! 0.0 1000 12                   │
//! @A 1 2 3\                     │ (inline spectrum)
//! 4 5                           ┘
//! ```
//!
//! Raw lines are the durable state of a block. Structured fields are derived
//! from them on first query by a pure parse ([`parse_lines`]) and cached until
//! the indexer appends to or closes the block.

mod fields;
mod header;
mod meta;
mod models;
mod scan;
mod spectrum;
mod state;
pub(crate) mod tags;

#[cfg(test)]
mod tests;

pub use fields::{parse_lines, BlockFields};
pub use header::{Creator, Header};
pub use meta::ScanMeta;
pub use models::{CountTime, LinePosition, ParseErrorRecord, RawLine};
pub use scan::{Scan, ScanFields, ScanRef};
pub use spectrum::{Calibration, Spectrum};
pub use state::ParseState;
pub use tags::LineTag;

/// Raw, unparsed region of a spec file
#[derive(Debug, Clone, Default)]
pub struct Block {
    /// Byte offset of the block's first line
    start: u64,

    /// 1-based file line number of the block's first line
    first_line: usize,

    /// Non-blank lines, whitespace-stripped, in file order
    lines: Vec<RawLine>,

    /// Original file name captured from the last `#F` line before this block
    source: Option<String>,
}

impl Block {
    /// Create an empty block starting at the given byte offset and line
    pub fn new(start: u64, first_line: usize) -> Self {
        Self {
            start,
            first_line,
            lines: Vec::new(),
            source: None,
        }
    }

    /// Byte offset of the block's first line in the file
    pub fn start(&self) -> u64 {
        self.start
    }

    /// 1-based line number of the block's first line in the file
    pub fn first_line(&self) -> usize {
        self.first_line
    }

    /// Raw lines owned by this block
    pub fn lines(&self) -> &[RawLine] {
        &self.lines
    }

    /// Original file name tag (from the most recent `#F` line), if any
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub(crate) fn set_source(&mut self, source: &str) {
        self.source = Some(source.to_string());
    }

    pub(crate) fn push_line(&mut self, number: usize, text: &str) {
        self.lines.push(RawLine {
            number,
            text: text.to_string(),
        });
    }

    pub(crate) fn pop_line(&mut self) {
        self.lines.pop();
    }

    /// Parse the raw lines into structured fields
    pub fn parse(&self) -> BlockFields {
        parse_lines(&self.lines)
    }
}
