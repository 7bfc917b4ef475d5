use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::account::models::AccountId;
use crate::file::errors::FileError;
use crate::file::models::sanitize_filename;
use crate::file::models::FileId;
use crate::file::models::FileMetadata;
use crate::file::models::NewFile;
use crate::file::models::StoredFile;
use crate::file::models::UploadFileCommand;
use crate::file::models::UploadPolicy;
use crate::file::ports::FileRepository;
use crate::file::ports::FileServicePort;
use crate::file::ports::FileStorage;

/// Domain service implementation for file operations.
pub struct FileService<FR, FS>
where
    FR: FileRepository,
    FS: FileStorage,
{
    repository: Arc<FR>,
    storage: Arc<FS>,
    policy: UploadPolicy,
}

impl<FR, FS> FileService<FR, FS>
where
    FR: FileRepository,
    FS: FileStorage,
{
    /// Create a new file service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Metadata persistence implementation
    /// * `storage` - Byte storage implementation
    /// * `policy` - Size limit applied to uploads
    pub fn new(repository: Arc<FR>, storage: Arc<FS>, policy: UploadPolicy) -> Self {
        Self {
            repository,
            storage,
            policy,
        }
    }

    pub fn policy(&self) -> UploadPolicy {
        self.policy
    }

    async fn load(&self, id: &FileId) -> Result<StoredFile, FileError> {
        let metadata = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(FileError::NotFound(id.as_i64()))?;

        self.read_contents(metadata).await
    }

    async fn read_contents(&self, metadata: FileMetadata) -> Result<StoredFile, FileError> {
        let contents = self
            .storage
            .read(&metadata.file_path)
            .await?
            .ok_or(FileError::MissingOnDisk(metadata.id.as_i64()))?;

        Ok(StoredFile { metadata, contents })
    }
}

#[async_trait]
impl<FR, FS> FileServicePort for FileService<FR, FS>
where
    FR: FileRepository,
    FS: FileStorage,
{
    async fn upload(&self, command: UploadFileCommand) -> Result<FileMetadata, FileError> {
        let size = command.data.len() as u64;
        self.policy.check(&command.content_type, size)?;

        let now = Utc::now();
        let filename = sanitize_filename(&command.filename);
        // Unique per upload so a rollback can only ever remove its own bytes.
        let stored_name = format!(
            "upload_{}_{}_{}_{}",
            command.owner,
            now.timestamp(),
            Uuid::new_v4().simple(),
            filename
        );

        let file_path = self.storage.write(&stored_name, &command.data).await?;

        let new_file = NewFile {
            owner: command.owner,
            filename,
            content_type: command.content_type,
            size: size as i64,
            file_path: file_path.clone(),
            user_agent: command.user_agent,
            remote_addr: command.remote_addr,
            created_at: now,
        };

        match self.repository.create(new_file).await {
            Ok(metadata) => {
                tracing::info!(
                    file_id = %metadata.id,
                    owner = %metadata.owner,
                    size = metadata.size,
                    "File uploaded"
                );
                Ok(metadata)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.remove(&file_path).await {
                    tracing::error!(
                        "Failed to remove {} after metadata save failed: {}",
                        file_path,
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }

    async fn get_owned_file(
        &self,
        id: &FileId,
        requester: &AccountId,
    ) -> Result<StoredFile, FileError> {
        let metadata = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(FileError::NotFound(id.as_i64()))?;

        if metadata.owner != *requester {
            tracing::warn!(
                file_id = %id,
                requester = %requester,
                "Denied access to another account's file"
            );
            return Err(FileError::AccessDenied(id.as_i64()));
        }

        self.read_contents(metadata).await
    }

    async fn get_public_file(&self, id: &FileId) -> Result<StoredFile, FileError> {
        self.load(id).await
    }
}
