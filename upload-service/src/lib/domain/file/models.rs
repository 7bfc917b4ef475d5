use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::account::models::AccountId;
use crate::file::errors::FileError;

/// Metadata for one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub id: FileId,
    pub owner: AccountId,
    /// Sanitized client-supplied name
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    /// Server-side location of the stored bytes
    pub file_path: String,
    pub user_agent: String,
    pub remote_addr: String,
    pub created_at: DateTime<Utc>,
}

/// File unique identifier, assigned by storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub i64);

impl FileId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// File row to be inserted. The id is assigned by storage.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub owner: AccountId,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub file_path: String,
    pub user_agent: String,
    pub remote_addr: String,
    pub created_at: DateTime<Utc>,
}

/// Command to store an uploaded file for an authenticated account
pub struct UploadFileCommand {
    pub owner: AccountId,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub user_agent: String,
    pub remote_addr: String,
}

impl fmt::Debug for UploadFileCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFileCommand")
            .field("owner", &self.owner)
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .field("user_agent", &self.user_agent)
            .field("remote_addr", &self.remote_addr)
            .finish()
    }
}

/// Metadata together with the stored bytes
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub metadata: FileMetadata,
    pub contents: Vec<u8>,
}

/// Limits applied to every upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_size_bytes: u64,
}

impl UploadPolicy {
    pub const DEFAULT_MAX_SIZE_BYTES: u64 = 8 * 1024 * 1024;

    pub fn new(max_size_bytes: u64) -> Self {
        Self { max_size_bytes }
    }

    /// Check size and content type of an upload.
    ///
    /// # Errors
    /// * `TooLarge` - More than `max_size_bytes` bytes
    /// * `UnsupportedContentType` - Not one of the accepted image types
    pub fn check(&self, content_type: &str, size: u64) -> Result<(), FileError> {
        if size > self.max_size_bytes {
            return Err(FileError::TooLarge {
                size,
                max: self.max_size_bytes,
            });
        }

        if !is_image_content_type(content_type) {
            return Err(FileError::UnsupportedContentType(content_type.to_string()));
        }

        Ok(())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_SIZE_BYTES)
    }
}

const IMAGE_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/bmp",
    "image/tiff",
    "image/tif",
    "image/svg+xml",
];

/// Whether `content_type` is one of the accepted image types (case-insensitive).
pub fn is_image_content_type(content_type: &str) -> bool {
    IMAGE_CONTENT_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(content_type))
}

/// Reduce a client-supplied file name to something safe to embed in a
/// path and a `Content-Disposition` header.
///
/// Keeps the last path component and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "file".to_string()
    } else {
        sanitized
    }
}
