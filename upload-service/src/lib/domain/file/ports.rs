use async_trait::async_trait;

use crate::account::models::AccountId;
use crate::file::errors::FileError;
use crate::file::models::FileId;
use crate::file::models::FileMetadata;
use crate::file::models::NewFile;
use crate::file::models::StoredFile;
use crate::file::models::UploadFileCommand;

/// Port for file upload and retrieval operations.
#[async_trait]
pub trait FileServicePort: Send + Sync + 'static {
    /// Validate, store and record an uploaded file.
    ///
    /// # Errors
    /// * `TooLarge` - Payload exceeds the upload limit
    /// * `UnsupportedContentType` - Not an accepted image type
    /// * `Io` - Writing the bytes failed
    /// * `DatabaseError` - Metadata could not be saved (stored bytes are removed)
    async fn upload(&self, command: UploadFileCommand) -> Result<FileMetadata, FileError>;

    /// Retrieve a file on behalf of `requester`.
    ///
    /// # Errors
    /// * `NotFound` - No such file
    /// * `AccessDenied` - File belongs to another account
    /// * `MissingOnDisk` - Metadata exists but the bytes are gone
    async fn get_owned_file(
        &self,
        id: &FileId,
        requester: &AccountId,
    ) -> Result<StoredFile, FileError>;

    /// Retrieve a file without an ownership check.
    ///
    /// # Errors
    /// * `NotFound` - No such file
    /// * `MissingOnDisk` - Metadata exists but the bytes are gone
    async fn get_public_file(&self, id: &FileId) -> Result<StoredFile, FileError>;
}

/// Persistence operations for file metadata.
#[async_trait]
pub trait FileRepository: Send + Sync + 'static {
    /// Insert metadata and return it with its assigned id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, file: NewFile) -> Result<FileMetadata, FileError>;

    /// Retrieve metadata by identifier.
    ///
    /// # Returns
    /// Optional metadata (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &FileId) -> Result<Option<FileMetadata>, FileError>;
}

/// Byte storage for uploaded files.
#[async_trait]
pub trait FileStorage: Send + Sync + 'static {
    /// Write `contents` under `name` and return the resulting path.
    async fn write(&self, name: &str, contents: &[u8]) -> Result<String, FileError>;

    /// Read a stored file. `None` when nothing exists at `path`.
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, FileError>;

    async fn remove(&self, path: &str) -> Result<(), FileError>;
}
