use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;

use crate::account::models::AccountId;
use crate::file::errors::FileError;
use crate::file::models::FileId;
use crate::file::models::FileMetadata;
use crate::file::models::NewFile;
use crate::file::ports::FileRepository;

pub struct SqliteFileRepository {
    pool: SqlitePool,
}

impl SqliteFileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct FileRow {
    id: i64,
    user_id: i64,
    filename: String,
    content_type: String,
    size: i64,
    file_path: String,
    user_agent: String,
    remote_addr: String,
    created_at: DateTime<Utc>,
}

impl From<FileRow> for FileMetadata {
    fn from(row: FileRow) -> Self {
        FileMetadata {
            id: FileId(row.id),
            owner: AccountId(row.user_id),
            filename: row.filename,
            content_type: row.content_type,
            size: row.size,
            file_path: row.file_path,
            user_agent: row.user_agent,
            remote_addr: row.remote_addr,
            created_at: row.created_at,
        }
    }
}

fn database_error(e: sqlx::Error) -> FileError {
    tracing::error!("File metadata query failed: {}", e);
    FileError::DatabaseError(e.to_string())
}

#[async_trait]
impl FileRepository for SqliteFileRepository {
    async fn create(&self, file: NewFile) -> Result<FileMetadata, FileError> {
        let row: FileRow = sqlx::query_as(
            r#"
            INSERT INTO files (user_id, filename, content_type, size, file_path, user_agent, remote_addr, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, filename, content_type, size, file_path, user_agent, remote_addr, created_at
            "#,
        )
        .bind(file.owner.0)
        .bind(&file.filename)
        .bind(&file.content_type)
        .bind(file.size)
        .bind(&file.file_path)
        .bind(&file.user_agent)
        .bind(&file.remote_addr)
        .bind(file.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &FileId) -> Result<Option<FileMetadata>, FileError> {
        let row: Option<FileRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, filename, content_type, size, file_path, user_agent, remote_addr, created_at
            FROM files
            WHERE id = ?
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(row.map(FileMetadata::from))
    }
}
