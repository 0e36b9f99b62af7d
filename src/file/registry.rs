use std::collections::BTreeMap;

use crate::block::{Header, Scan, ScanRef};

use super::indexer::IndexCursor;

/// In-memory index of a spec file.
///
/// Scans and headers are kept in file order. Re-indexing only appends; the
/// one exception is a block opened by an unterminated last line, which is
/// dropped and read again once that line is complete.
#[derive(Debug, Default)]
pub struct FileIndex {
    pub(super) scans: Vec<Scan>,
    pub(super) headers: Vec<Header>,
    /// Scan number -> positions in `scans`, in order of appearance
    pub(super) by_number: BTreeMap<i64, Vec<usize>>,
    pub(super) cursor: IndexCursor,
}

impl FileIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte offset up to which the source has been indexed
    pub fn offset(&self) -> u64 {
        self.cursor.offset
    }

    /// Number of scans in the file
    pub fn number_scans(&self) -> usize {
        self.scans.len()
    }

    /// Number of header blocks in the file
    pub fn number_headers(&self) -> usize {
        self.headers.len()
    }

    /// Header blocks in file order
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Scan at a 0-based position in the file
    pub fn scan_at(&self, position: usize) -> Option<ScanRef<'_>> {
        let scan = self.scans.get(position)?;
        Some(self.view(scan))
    }

    /// All scans in file order
    pub fn scans(&self) -> impl Iterator<Item = ScanRef<'_>> + '_ {
        self.scans.iter().map(move |scan| self.view(scan))
    }

    /// Look up a scan by its declared number.
    ///
    /// `occurrence` is 0-based: when the same number is used several times in
    /// a file, `0` is the first scan carrying it, `1` the second, and so on.
    pub fn scan_by_number(&self, number: i64, occurrence: usize) -> Option<ScanRef<'_>> {
        let position = *self.by_number.get(&number)?.get(occurrence)?;
        self.scan_at(position)
    }

    /// Distinct scan numbers in ascending order
    pub fn scan_numbers(&self) -> impl Iterator<Item = i64> + '_ {
        self.by_number.keys().copied()
    }

    /// How many scans carry the given number
    pub fn occurrences(&self, number: i64) -> usize {
        self.by_number.get(&number).map_or(0, Vec::len)
    }

    /// Creation date of the file (first header's `#D`)
    pub fn time_created(&self) -> Option<&str> {
        self.headers.first().map(Header::date)
    }

    /// User that created the file
    pub fn user(&self) -> Option<String> {
        self.headers.first()?.user()
    }

    /// Spec application that created the file
    pub fn spec(&self) -> Option<String> {
        self.headers.first()?.spec()
    }

    fn view<'a>(&'a self, scan: &'a Scan) -> ScanRef<'a> {
        let header = scan.header_index().and_then(|idx| self.headers.get(idx));
        ScanRef::new(scan, header)
    }
}
