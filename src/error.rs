use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unsupported type '{0}'. Use ROM or DSK.")]
    UnsupportedKind(String),

    #[error("files directory not found")]
    DirectoryUnavailable,

    #[error("Invalid download index {index}. Valid range: 0-{max}")]
    IndexOutOfRange { index: usize, max: i64 },

    #[error("File not found for download index {0}")]
    ResolutionMismatch(usize),

    #[error("reading file failed: {0}")]
    FileRead(std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Bad-index error reporting the valid range for a catalog of `len`
    /// entries. An empty catalog reports the range as 0 to -1, matching the
    /// legacy server's message.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        CatalogError::IndexOutOfRange {
            index,
            max: len as i64 - 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
