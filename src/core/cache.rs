use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// 快取的三種原始資料，每種一個 JSON 檔
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheArtifact {
    MunicipalityNames,
    PostalSummaries,
    PostalDetails,
}

impl CacheArtifact {
    pub fn file_name(&self) -> &'static str {
        match self {
            CacheArtifact::MunicipalityNames => "municipalities.json",
            CacheArtifact::PostalSummaries => "postal-information.json",
            CacheArtifact::PostalDetails => "post-details.json",
        }
    }
}

pub struct DiskCache<S: Storage> {
    storage: S,
    disabled: bool,
}

impl<S: Storage> DiskCache<S> {
    pub fn new(storage: S, disabled: bool) -> Self {
        Self { storage, disabled }
    }

    /// 停用、檔案不存在或內容壞掉都當作 miss
    pub async fn load<T: DeserializeOwned>(&self, artifact: CacheArtifact) -> Result<Option<T>> {
        if self.disabled {
            tracing::debug!("Cache disabled, skipping {}", artifact.file_name());
            return Ok(None);
        }

        let Some(bytes) = self.storage.read_file(artifact.file_name()).await? else {
            tracing::info!("📭 No cached {} found", artifact.file_name());
            return Ok(None);
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                tracing::info!("📦 Got {} from cache", artifact.file_name());
                Ok(Some(value))
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Ignoring unreadable cache file {}: {}",
                    artifact.file_name(),
                    e
                );
                Ok(None)
            }
        }
    }

    /// 停用時也照樣寫入，下次啟用快取時就用得到
    pub async fn save<T: Serialize + ?Sized>(&self, artifact: CacheArtifact, value: &T) -> Result<()> {
        let json = serde_json::to_vec_pretty(value)?;
        tracing::debug!("Writing {} ({} bytes)", artifact.file_name(), json.len());
        self.storage.write_file(artifact.file_name(), &json).await?;
        tracing::info!("💾 Saved {} to cache", artifact.file_name());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::test_support::{detail, post_info};
    use crate::domain::model::{PostInfo, PostalDetail};
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    pub(crate) struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        pub(crate) async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }

        pub(crate) async fn put_file(&self, path: &str, data: &[u8]) {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.files.lock().await.get(path).cloned())
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_round_trip_each_artifact() {
        let cache = DiskCache::new(MockStorage::default(), false);

        let names = vec!["Gent".to_string(), "Brugge".to_string()];
        cache.save(CacheArtifact::MunicipalityNames, &names).await.unwrap();
        let loaded: Option<Vec<String>> = cache.load(CacheArtifact::MunicipalityNames).await.unwrap();
        assert_eq!(loaded, Some(names));

        let summaries = vec![post_info("9000", &["Gent"]), post_info("8000", &["Brugge"])];
        cache.save(CacheArtifact::PostalSummaries, &summaries).await.unwrap();
        let loaded: Option<Vec<PostInfo>> = cache.load(CacheArtifact::PostalSummaries).await.unwrap();
        assert_eq!(loaded, Some(summaries));

        let mut details = BTreeMap::new();
        details.insert("9000".to_string(), detail("9000", "Gent", &["Gent"]));
        cache.save(CacheArtifact::PostalDetails, &details).await.unwrap();
        let loaded: Option<BTreeMap<String, PostalDetail>> =
            cache.load(CacheArtifact::PostalDetails).await.unwrap();
        assert_eq!(loaded, Some(details));
    }

    #[tokio::test]
    async fn test_missing_file_is_a_miss() {
        let cache = DiskCache::new(MockStorage::default(), false);
        let loaded: Option<Vec<String>> = cache.load(CacheArtifact::MunicipalityNames).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache_always_misses_but_still_saves() {
        let storage = MockStorage::default();
        let cache = DiskCache::new(storage.clone(), true);

        cache
            .save(CacheArtifact::MunicipalityNames, &vec!["Gent".to_string()])
            .await
            .unwrap();
        let loaded: Option<Vec<String>> = cache.load(CacheArtifact::MunicipalityNames).await.unwrap();

        assert!(loaded.is_none());
        assert!(storage.get_file("municipalities.json").await.is_some());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_miss() {
        let storage = MockStorage::default();
        storage.put_file("post-details.json", b"{ not json").await;
        let cache = DiskCache::new(storage, false);

        let loaded: Option<BTreeMap<String, PostalDetail>> =
            cache.load(CacheArtifact::PostalDetails).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_cache_file_uses_api_field_names() {
        let storage = MockStorage::default();
        let cache = DiskCache::new(storage.clone(), false);
        cache
            .save(CacheArtifact::PostalSummaries, &vec![post_info("9000", &["Gent"])])
            .await
            .unwrap();

        let bytes = storage.get_file("postal-information.json").await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json[0]["identificator"]["objectId"], "9000");
        assert_eq!(json[0]["postnamen"][0]["geografischeNaam"]["spelling"], "Gent");
    }
}
