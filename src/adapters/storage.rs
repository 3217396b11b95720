use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let full_path = self.base_path.join(path);
        match tokio::fs::read(&full_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // 讀不到的快取當作 miss，重新從 API 取得
            Err(e) => {
                tracing::warn!("⚠️ Cannot read cache file {}: {}", full_path.display(), e);
                Ok(None)
            }
        }
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // 先寫暫存檔再改名，寫到一半中斷時舊檔案仍完整
        let tmp_path = full_path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, data).await?;
        tokio::fs::rename(&tmp_path, &full_path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(storage.read_file("municipalities.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("post-details.json")).unwrap();
        let storage = LocalStorage::new(dir.path());

        assert!(storage.read_file("post-details.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_creates_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested/cache"));

        storage.write_file("post-details.json", b"{}").await.unwrap();
        storage.write_file("post-details.json", b"{\"9000\":1}").await.unwrap();

        let data = storage.read_file("post-details.json").await.unwrap().unwrap();
        assert_eq!(data, b"{\"9000\":1}");
        assert!(!dir.path().join("nested/cache/post-details.json.tmp").exists());
    }
}
