use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::file::errors::FileError;
use crate::file::ports::FileStorage;

/// Stores uploads as plain files in one directory.
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn write(&self, name: &str, contents: &[u8]) -> Result<String, FileError> {
        let path = self.root.join(name);
        tokio::fs::write(&path, contents).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, FileError> {
        match tokio::fs::read(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, path: &str) -> Result<(), FileError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        let root = std::env::temp_dir().join(format!("uploader-storage-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        root
    }

    #[tokio::test]
    async fn test_write_read_remove() {
        let root = temp_root();
        let storage = LocalFileStorage::new(&root);

        let path = storage.write("upload_1_0_cat.png", b"png").await.unwrap();
        assert!(path.ends_with("upload_1_0_cat.png"));
        assert_eq!(storage.read(&path).await.unwrap(), Some(b"png".to_vec()));

        storage.remove(&path).await.unwrap();
        assert_eq!(storage.read(&path).await.unwrap(), None);

        // Removing twice is not an error.
        storage.remove(&path).await.unwrap();

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails() {
        let root = temp_root();
        let storage = LocalFileStorage::new(root.join("does-not-exist"));

        let result = storage.write("upload_1_0_cat.png", b"png").await;

        assert!(matches!(result, Err(FileError::Io(_))));
        std::fs::remove_dir_all(root).unwrap();
    }
}
