//! Small value types shared by headers and scans

use std::fmt;

use serde::{Deserialize, Serialize};

/// One non-blank line of a block, as read from the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based line number in the file
    pub number: usize,

    /// Line content with surrounding whitespace stripped
    pub text: String,
}

/// Location of an erroneous line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePosition {
    /// 1-based position among the block's raw lines
    pub relative: usize,

    /// 1-based line number in the file
    pub absolute: usize,
}

/// A problem found while parsing one block.
///
/// Records never abort parsing; they accumulate on the block that produced
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseErrorRecord {
    /// Scan number of the block, `None` for headers or before `#S` is seen
    pub block_id: Option<i64>,

    /// Offending line, `None` for block-level problems (motor reconciliation)
    pub line: Option<LinePosition>,

    /// The raw text of the offending line
    pub raw_line: Option<String>,

    /// Human-readable description
    pub message: String,
}

impl fmt::Display for ParseErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = self.block_id {
            write!(f, "scan {}: ", id)?;
        }
        if let Some(pos) = self.line {
            write!(f, "line {} ({}): ", pos.relative, pos.absolute)?;
        }
        write!(f, "{}", self.message)
    }
}

/// Counting time from a `#T` line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountTime {
    /// Value as written in the file
    pub value: String,

    /// Units with parentheses removed, empty when absent
    pub units: String,
}
