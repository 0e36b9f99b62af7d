use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::fields::BlockFields;
use super::models::ParseErrorRecord;
use super::state::{Lazy, ParseState};
use super::Block;

/// Application and user that wrote a file, from a header comment such as
/// `#C fourc  User = specuser`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Name of the spec application
    pub spec: String,

    /// Unix user running it
    pub user: String,
}

impl Creator {
    /// Find the creator in a list of comment lines
    pub fn from_comments(comments: &[String]) -> Option<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| {
            Regex::new(r"(?P<spec>.*?)\s+User\s+=\s+(?P<user>.*?)$")
                .expect("valid creator comment pattern")
        });

        comments.iter().find_map(|line| {
            let caps = re.captures(line)?;
            Some(Self {
                spec: caps["spec"].to_string(),
                user: caps["user"].to_string(),
            })
        })
    }
}

/// File or epoch header block (`#F` or `#E`).
///
/// Headers carry the metadata that later scans fall back to when they do not
/// repeat it: motor and counter names, creator, file epoch.
#[derive(Debug, Default)]
pub struct Header {
    block: Block,
    fields: Lazy<BlockFields>,
}

impl Header {
    pub(crate) fn new(start: u64, first_line: usize) -> Self {
        Self {
            block: Block::new(start, first_line),
            fields: Lazy::default(),
        }
    }

    /// Raw block
    pub fn block(&self) -> &Block {
        &self.block
    }

    pub(crate) fn block_mut(&mut self) -> &mut Block {
        &mut self.block
    }

    /// Parsed fields, parsing on first access
    pub fn fields(&self) -> &BlockFields {
        self.fields.get_or_parse(|| self.block.parse())
    }

    /// Current parse state
    pub fn state(&self) -> ParseState {
        self.fields.state()
    }

    /// Headers are parsed as soon as they are complete
    pub(crate) fn close(&mut self) {
        let fields = self.fields();
        if fields.has_errors() {
            log::debug!(
                "header at line {} has {} parse errors",
                self.block.first_line(),
                fields.errors.len()
            );
        }
    }

    pub(crate) fn reopen(&mut self) {
        self.fields.invalidate();
    }

    /// Date from `#D`
    pub fn date(&self) -> &str {
        &self.fields().date
    }

    /// Epoch from `#E`
    pub fn epoch(&self) -> i64 {
        self.fields().epoch
    }

    /// Epoch as a UTC timestamp
    pub fn epoch_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.epoch(), 0)
    }

    /// File name from `#F`
    pub fn filename(&self) -> &str {
        &self.fields().filename
    }

    /// Application and user recorded in the header comments
    pub fn creator(&self) -> Option<Creator> {
        Creator::from_comments(&self.fields().comments)
    }

    /// Unix user that created the file
    pub fn user(&self) -> Option<String> {
        self.creator().map(|c| c.user)
    }

    /// Name of the spec application that created the file
    pub fn spec(&self) -> Option<String> {
        self.creator().map(|c| c.spec)
    }

    /// Header comment lines
    pub fn comments(&self) -> &[String] {
        &self.fields().comments
    }

    /// Motor names declared by `#O` lines
    pub fn motor_names(&self) -> &[String] {
        &self.fields().motor_labels
    }

    /// Counter names declared by `#J` lines
    pub fn counter_names(&self) -> &[String] {
        &self.fields().counter_labels
    }

    /// Parse errors for this header
    pub fn errors(&self) -> &[ParseErrorRecord] {
        &self.fields().errors
    }
}
