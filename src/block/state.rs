use std::cell::OnceCell;

/// Parse state of a block's structured fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Raw lines have never been interpreted
    Unparsed,
    /// Structured fields are cached and match the raw lines
    Parsed,
    /// Raw lines changed (or the block was closed) after a parse; the next
    /// query re-derives the fields
    Stale,
}

/// Lazily derived value that can be invalidated when its source lines change.
///
/// Reads go through `&self` so parsed data can be handed out with the
/// lifetime of the owning block. Invalidation needs `&mut self`, which only
/// the indexer holds.
#[derive(Debug)]
pub(crate) struct Lazy<T> {
    cell: OnceCell<T>,
    stale: bool,
}

impl<T> Default for Lazy<T> {
    fn default() -> Self {
        Self {
            cell: OnceCell::new(),
            stale: false,
        }
    }
}

impl<T> Lazy<T> {
    pub(crate) fn get_or_parse<F: FnOnce() -> T>(&self, parse: F) -> &T {
        self.cell.get_or_init(parse)
    }

    pub(crate) fn invalidate(&mut self) {
        if self.cell.take().is_some() {
            self.stale = true;
        }
    }

    pub(crate) fn state(&self) -> ParseState {
        match (self.cell.get(), self.stale) {
            (Some(_), _) => ParseState::Parsed,
            (None, true) => ParseState::Stale,
            (None, false) => ParseState::Unparsed,
        }
    }
}
