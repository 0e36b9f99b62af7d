//! Single-pass block indexer
//!
//! Lines are read one at a time; a block starts at every `#F`, at `#E`
//! outside a header, and at every `#S`. The cursor keeps the last open block
//! so that a later pass over appended bytes can extend it.

use std::io::{BufRead, Seek, SeekFrom};
use std::ops::Range;

use log::{debug, trace};

use crate::block::{tags, Header, Scan};

use super::{FileIndex, SpecFileError};

/// Block that was open when the last indexing pass stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpenBlock {
    Header(usize),
    Scan(usize),
}

/// Resumable indexing state
#[derive(Debug, Clone)]
pub(crate) struct IndexCursor {
    /// Byte offset just past the last consumed line
    pub offset: u64,
    /// 1-based number of the next line to read
    pub next_line: usize,
    pub open: Option<OpenBlock>,
    pub inside_header: bool,
    /// Original file name from the most recent `#F` line
    pub source: Option<String>,
    /// Last line read when it had no newline yet
    pub partial: Option<PartialTail>,
}

/// An unterminated last line, undone at the start of the next pass so the
/// completed line is read as one
#[derive(Debug, Clone)]
pub(crate) struct PartialTail {
    /// Cursor as it was before the line was read
    before: Box<IndexCursor>,
    /// Block the line opened, if it was a block start
    opened: Option<OpenBlock>,
    /// Whether the line was appended to the block that was open
    pushed: bool,
}

impl Default for IndexCursor {
    fn default() -> Self {
        Self {
            offset: 0,
            next_line: 1,
            open: None,
            inside_header: false,
            source: None,
            partial: None,
        }
    }
}

/// What one indexing pass added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDelta {
    /// Positions of the new headers
    pub headers: Range<usize>,

    /// Positions of the new scans
    pub scans: Range<usize>,

    /// Offset the next pass resumes from
    pub offset: u64,
}

impl IndexDelta {
    /// Whether the pass found no new block
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.scans.is_empty()
    }
}

/// Kind of block a line starts
fn block_start(line: &str) -> Option<char> {
    let mut chars = line.chars();
    if chars.next() != Some('#') {
        return None;
    }
    chars.next().filter(|c| matches!(c, 'S' | 'F' | 'E'))
}

impl FileIndex {
    /// Index a stream from the last recorded offset.
    ///
    /// The first call reads the whole stream. Later calls seek to where the
    /// previous pass stopped and extend the block that was open there, so a
    /// file that is still being written can be followed by calling this again
    /// whenever it grows.
    ///
    /// A last line without a newline is indexed as it stands, and read again
    /// by the next call in case the writer has finished it since.
    ///
    /// On an I/O error the index keeps every line consumed before the error
    /// and the next call resumes after the last complete line.
    pub fn index<R: BufRead + Seek>(&mut self, reader: &mut R) -> Result<IndexDelta, SpecFileError> {
        if let Some(tail) = self.cursor.partial.take() {
            self.rewind(tail);
        }

        let start_offset = self.cursor.offset;
        let first_header = self.headers.len();
        let first_scan = self.scans.len();

        reader.seek(SeekFrom::Start(start_offset))?;
        if let Some(open) = self.cursor.open {
            self.reopen(open);
        }

        let mut buf = Vec::new();
        let mut orphan_lines = 0usize;
        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf)?;
            if read == 0 {
                break;
            }

            let line_start = self.cursor.offset;
            let number = self.cursor.next_line;
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim();

            let unterminated = buf.last() != Some(&b'\n');
            let before = unterminated.then(|| Box::new(self.cursor.clone()));
            let open_before = self.cursor.open;

            match block_start(line) {
                Some('F') => {
                    self.cursor.source = Some(line[2..].trim().to_string());
                    self.open_header(line_start, number);
                    self.cursor.inside_header = true;
                }
                Some('E') if !self.cursor.inside_header => {
                    self.open_header(line_start, number);
                    self.cursor.inside_header = true;
                }
                Some('S') => {
                    self.open_scan(line_start, number, line);
                    self.cursor.inside_header = false;
                }
                _ => {}
            }

            let pushed = !line.is_empty() && self.push_line(number, line);
            if !line.is_empty() && !pushed {
                orphan_lines += 1;
            }

            self.cursor.offset += read as u64;
            self.cursor.next_line += 1;

            if let Some(before) = before {
                let opened = self.cursor.open.filter(|open| Some(*open) != open_before);
                self.cursor.partial = Some(PartialTail {
                    before,
                    opened,
                    pushed: pushed && opened.is_none(),
                });
            }
        }

        if let Some(open) = self.cursor.open {
            self.close(open);
        }

        if orphan_lines > 0 {
            log::warn!("{} lines before the first block were ignored", orphan_lines);
        }

        let delta = IndexDelta {
            headers: first_header..self.headers.len(),
            scans: first_scan..self.scans.len(),
            offset: self.cursor.offset,
        };
        debug!(
            "indexed bytes {}..{}: {} new headers, {} new scans",
            start_offset,
            delta.offset,
            delta.headers.len(),
            delta.scans.len()
        );
        Ok(delta)
    }

    fn open_header(&mut self, start: u64, line: usize) {
        if let Some(open) = self.cursor.open {
            self.close(open);
        }
        let mut header = Header::new(start, line);
        if let Some(source) = &self.cursor.source {
            header.block_mut().set_source(source);
        }
        trace!("header {} opens at line {}", self.headers.len(), line);
        self.headers.push(header);
        self.cursor.open = Some(OpenBlock::Header(self.headers.len() - 1));
    }

    fn open_scan(&mut self, start: u64, line: usize, text: &str) {
        if let Some(open) = self.cursor.open {
            self.close(open);
        }
        let number = tags::scan_number(text).unwrap_or(0);
        let position = self.scans.len();
        let bucket = self.by_number.entry(number).or_default();
        bucket.push(position);

        let mut scan = Scan::new(start, line, number);
        scan.set_position(position, bucket.len());
        if let Some(header) = self.headers.len().checked_sub(1) {
            scan.set_header(header);
        }
        if let Some(source) = &self.cursor.source {
            scan.block_mut().set_source(source);
        }
        trace!("scan {} (#S {}) opens at line {}", position, number, line);
        self.scans.push(scan);
        self.cursor.open = Some(OpenBlock::Scan(position));
    }

    /// Append a line to the open block; `false` if there is none
    fn push_line(&mut self, number: usize, line: &str) -> bool {
        match self.cursor.open {
            Some(OpenBlock::Header(idx)) => self.headers[idx].block_mut().push_line(number, line),
            Some(OpenBlock::Scan(idx)) => self.scans[idx].block_mut().push_line(number, line),
            None => return false,
        }
        true
    }

    fn close(&mut self, open: OpenBlock) {
        match open {
            OpenBlock::Header(idx) => self.headers[idx].close(),
            OpenBlock::Scan(idx) => self.scans[idx].close(),
        }
    }

    /// Undo an unterminated last line: drop the block it opened or the raw
    /// line it appended, and restore the cursor from before it
    fn rewind(&mut self, tail: PartialTail) {
        match tail.opened {
            Some(OpenBlock::Header(idx)) => self.headers.truncate(idx),
            Some(OpenBlock::Scan(idx)) => {
                if let Some(scan) = self.scans.get(idx) {
                    let number = scan.number();
                    if let Some(bucket) = self.by_number.get_mut(&number) {
                        bucket.retain(|&pos| pos != idx);
                        if bucket.is_empty() {
                            self.by_number.remove(&number);
                        }
                    }
                }
                self.scans.truncate(idx);
            }
            None if tail.pushed => {
                if let Some(open) = tail.before.open {
                    self.pop_line(open);
                }
            }
            None => {}
        }
        trace!("re-reading unterminated line {}", tail.before.next_line);
        self.cursor = *tail.before;
    }

    fn pop_line(&mut self, open: OpenBlock) {
        match open {
            OpenBlock::Header(idx) => self.headers[idx].block_mut().pop_line(),
            OpenBlock::Scan(idx) => self.scans[idx].block_mut().pop_line(),
        }
    }

    fn reopen(&mut self, open: OpenBlock) {
        match open {
            OpenBlock::Header(idx) => self.headers[idx].reopen(),
            OpenBlock::Scan(idx) => self.scans[idx].reopen(),
        }
    }
}
