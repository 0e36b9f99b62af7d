/// Errors that can occur while exporting scan data
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error writing the output
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV writer error
    #[error("CSV writing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Export format name not recognized
    #[error("Unknown export format: {0} (expected spec, tabs or csv)")]
    UnknownFormat(String),
}
