/// Errors that can occur while opening or indexing a spec file
#[derive(Debug, thiserror::Error)]
pub enum SpecFileError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Path does not name a readable regular file
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
