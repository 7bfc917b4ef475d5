use thiserror::Error;

/// Top-level error for all file-related operations
#[derive(Debug, Clone, Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(i64),

    #[error("Access denied to file {0}")]
    AccessDenied(i64),

    /// Metadata exists but the stored bytes are gone
    #[error("File {0} is missing from storage")]
    MissingOnDisk(i64),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("File too large: {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: u64, max: u64 },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    Io(String),
}

impl From<std::io::Error> for FileError {
    fn from(err: std::io::Error) -> Self {
        FileError::Io(err.to_string())
    }
}
