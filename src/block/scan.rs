use std::fmt;

use super::fields::BlockFields;
use super::header::Header;
use super::meta::ScanMeta;
use super::models::{CountTime, ParseErrorRecord, RawLine};
use super::spectrum::Spectrum;
use super::state::{Lazy, ParseState};
use super::Block;

/// Parsed scan: block fields plus the motor reconciliation result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanFields {
    /// Fields parsed from the scan's own lines; `fields.errors` also holds
    /// finalization errors
    pub fields: BlockFields,

    /// Motor `(name, position)` pairs in declaration order, `None` when the
    /// names and positions could not be matched
    pub motor_positions: Option<Vec<(String, String)>>,
}

impl ScanFields {
    /// Parse a scan block and reconcile its motor names with positions
    pub fn build(block: &Block, header: Option<&Header>) -> Self {
        let mut fields = block.parse();
        let motor_positions = finalize_motors(&mut fields, header);
        Self {
            fields,
            motor_positions,
        }
    }
}

fn finalize_motors(
    fields: &mut BlockFields,
    header: Option<&Header>,
) -> Option<Vec<(String, String)>> {
    let names = motor_names_with_fallback(fields, header).map(<[String]>::to_vec);

    match names {
        None => {
            fields.push_error("no motor names");
            None
        }
        Some(names) if names.len() != fields.motor_positions.len() => {
            fields.push_error("number of motor labels and positions are different");
            None
        }
        Some(names) => Some(
            names
                .into_iter()
                .zip(fields.motor_positions.iter().cloned())
                .collect(),
        ),
    }
}

fn motor_names_with_fallback<'a>(
    fields: &'a BlockFields,
    header: Option<&'a Header>,
) -> Option<&'a [String]> {
    fallback(&fields.motor_labels, header.map(|h| &h.fields().motor_labels))
}

fn fallback<'a>(own: &'a [String], inherited: Option<&'a Vec<String>>) -> Option<&'a [String]> {
    if !own.is_empty() {
        return Some(own);
    }
    inherited.filter(|v| !v.is_empty()).map(Vec::as_slice)
}

/// One `#S` block
#[derive(Debug, Default)]
pub struct Scan {
    block: Block,

    /// Scan number read from the `#S` line while indexing
    number: i64,

    /// Handle of the header that precedes this scan, if any
    header: Option<usize>,

    /// 1-based position among all scans in the file
    index: usize,

    /// 0-based position among all scans in the file
    number_in_file: usize,

    /// 1-based rank among scans sharing the same number
    order: usize,

    fields: Lazy<ScanFields>,
}

impl Scan {
    pub(crate) fn new(start: u64, first_line: usize, number: i64) -> Self {
        Self {
            block: Block::new(start, first_line),
            number,
            header: None,
            index: 0,
            number_in_file: 0,
            order: 1,
            fields: Lazy::default(),
        }
    }

    pub(crate) fn set_position(&mut self, number_in_file: usize, order: usize) {
        self.index = number_in_file + 1;
        self.number_in_file = number_in_file;
        self.order = order;
    }

    pub(crate) fn set_header(&mut self, header: usize) {
        self.header = Some(header);
    }

    /// Raw block
    pub fn block(&self) -> &Block {
        &self.block
    }

    pub(crate) fn block_mut(&mut self) -> &mut Block {
        &mut self.block
    }

    /// Scan number as declared on the `#S` line
    pub fn number(&self) -> i64 {
        self.number
    }

    /// Index of the owning header in the file's header list
    pub fn header_index(&self) -> Option<usize> {
        self.header
    }

    /// 1-based position of the scan in the file
    pub fn scan_index(&self) -> usize {
        self.index
    }

    /// 0-based position of the scan in the file
    pub fn number_in_file(&self) -> usize {
        self.number_in_file
    }

    /// 1-based occurrence among scans with the same number
    pub fn order(&self) -> usize {
        self.order
    }

    /// Current parse state
    pub fn state(&self) -> ParseState {
        self.fields.state()
    }

    /// Parsed fields, using `header` for name fallback on first access.
    ///
    /// The first caller fixes the fallback header, so only [`ScanRef`]
    /// (which resolves `header_index`) goes through here.
    pub(crate) fn fields(&self, header: Option<&Header>) -> &ScanFields {
        self.fields
            .get_or_parse(|| ScanFields::build(&self.block, header))
    }

    /// Closing a scan drops its structured state; the next query re-parses
    pub(crate) fn close(&mut self) {
        self.fields.invalidate();
    }

    pub(crate) fn reopen(&mut self) {
        self.fields.invalidate();
    }
}

/// A scan together with its owning header, the unit of all scan queries
#[derive(Debug, Clone, Copy)]
pub struct ScanRef<'a> {
    scan: &'a Scan,
    header: Option<&'a Header>,
}

impl<'a> ScanRef<'a> {
    /// Pair a scan with its header; callers resolve `header` from
    /// `scan.header_index()`
    pub(crate) fn new(scan: &'a Scan, header: Option<&'a Header>) -> Self {
        Self { scan, header }
    }

    /// The underlying scan
    pub fn scan(&self) -> &'a Scan {
        self.scan
    }

    /// The owning header
    pub fn header(&self) -> Option<&'a Header> {
        self.header
    }

    /// Parsed scan fields
    pub fn parsed(&self) -> &'a ScanFields {
        self.scan.fields(self.header)
    }

    fn fields(&self) -> &'a BlockFields {
        &self.parsed().fields
    }

    /// Raw lines of the scan
    pub fn raw_lines(&self) -> &'a [RawLine] {
        self.scan.block().lines()
    }

    /// Scan number
    pub fn number(&self) -> i64 {
        self.fields().number
    }

    /// 1-based occurrence among scans with the same number
    pub fn order(&self) -> usize {
        self.scan.order()
    }

    /// 1-based position in the file
    pub fn scan_index(&self) -> usize {
        self.scan.scan_index()
    }

    /// 0-based position in the file
    pub fn number_in_file(&self) -> usize {
        self.scan.number_in_file()
    }

    /// Command that started the scan
    pub fn command(&self) -> &'a str {
        &self.fields().command
    }

    /// Date when the scan was started
    pub fn date(&self) -> &'a str {
        &self.fields().date
    }

    /// Declared number of data columns, 0 when missing
    pub fn columns(&self) -> usize {
        self.fields().columns.unwrap_or(0)
    }

    /// Data column labels
    pub fn labels(&self) -> Option<&'a [String]> {
        self.fields().labels.as_deref()
    }

    /// Numeric data rows
    pub fn data(&self) -> &'a [Vec<f64>] {
        &self.fields().data
    }

    /// Number of data rows
    pub fn lines(&self) -> usize {
        self.data().len()
    }

    /// Values of the column with the given label
    pub fn column(&self, label: &str) -> Option<Vec<f64>> {
        let idx = self.labels()?.iter().position(|l| l == label)?;
        self.data().iter().map(|row| row.get(idx).copied()).collect()
    }

    /// Motor names, falling back to the header's
    pub fn motor_names(&self) -> Option<&'a [String]> {
        fallback(
            &self.fields().motor_labels,
            self.header.map(|h| &h.fields().motor_labels),
        )
    }

    /// Motor mnemonics, falling back to the header's
    pub fn motor_mnemonics(&self) -> Option<&'a [String]> {
        fallback(
            &self.fields().motor_mnemonics,
            self.header.map(|h| &h.fields().motor_mnemonics),
        )
    }

    /// Counter names, falling back to the header's
    pub fn counter_names(&self) -> Option<&'a [String]> {
        fallback(
            &self.fields().counter_labels,
            self.header.map(|h| &h.fields().counter_labels),
        )
    }

    /// Counter mnemonics, falling back to the header's
    pub fn counter_mnemonics(&self) -> Option<&'a [String]> {
        fallback(
            &self.fields().counter_mnemonics,
            self.header.map(|h| &h.fields().counter_mnemonics),
        )
    }

    /// Motor `(name, position)` pairs at scan start
    pub fn motor_positions(&self) -> Option<&'a [(String, String)]> {
        self.parsed().motor_positions.as_deref()
    }

    /// Position of the first motor with the given name
    pub fn motor_position(&self, name: &str) -> Option<&'a str> {
        self.motor_positions()?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, pos)| pos.as_str())
    }

    /// Unix user that created the file
    pub fn user(&self) -> Option<String> {
        self.header?.user()
    }

    /// Spec application that created the file
    pub fn spec(&self) -> Option<String> {
        self.header?.spec()
    }

    /// Path of the file as written in the `#F` header line
    pub fn source(&self) -> &'a str {
        match self.header {
            Some(h) if !h.filename().is_empty() => h.filename(),
            _ => self.scan.block().source().unwrap_or(""),
        }
    }

    /// Date the file was created
    pub fn file_date(&self) -> Option<&'a str> {
        self.header.map(Header::date)
    }

    /// Epoch the file was created; add it to an Epoch column for absolute time
    pub fn file_epoch(&self) -> Option<i64> {
        self.header.map(Header::epoch)
    }

    /// Geometry lines, each record joined by a single space
    pub fn geometry(&self) -> Vec<String> {
        self.fields().geometry.iter().map(|g| g.join(" ")).collect()
    }

    /// HKL value at scan start, verbatim
    pub fn hkl(&self) -> &'a str {
        self.fields().q_value.as_deref().unwrap_or("")
    }

    /// Counting time and units
    pub fn count_time(&self) -> Option<&'a CountTime> {
        self.fields().count_time.as_ref()
    }

    /// Comment lines; aborted scans are reported here
    pub fn comments(&self) -> &'a [String] {
        &self.fields().comments
    }

    /// `#U` user lines
    pub fn user_lines(&self) -> &'a [String] {
        &self.fields().user_lines
    }

    /// `#@` lines as `keyval content`
    pub fn extra_lines(&self) -> Vec<String> {
        self.fields()
            .extra_lines
            .iter()
            .map(|(key, content)| format!("{} {}", key, content))
            .collect()
    }

    /// Inline spectra
    pub fn spectra(&self) -> &'a [Spectrum] {
        &self.fields().spectra
    }

    /// Number of inline spectra
    pub fn spectrum_count(&self) -> usize {
        self.spectra().len()
    }

    /// Spectrum by position in the scan
    pub fn spectrum(&self, index: usize) -> Option<&'a Spectrum> {
        self.spectra().get(index)
    }

    /// Parse and finalization errors
    pub fn errors(&self) -> &'a [ParseErrorRecord] {
        &self.fields().errors
    }

    /// Aggregate metadata
    pub fn meta(&self) -> ScanMeta {
        ScanMeta::from_scan(self)
    }
}

impl fmt::Display for ScanRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.order() > 1 {
            write!(f, "{}.{} {}", self.number(), self.order(), self.command())
        } else {
            write!(f, "{} {}", self.number(), self.command())
        }
    }
}
