use crate::core::cache::{CacheArtifact, DiskCache};
use crate::core::details::DetailFetcher;
use crate::core::paging::PostalInfoPager;
use crate::core::policy::FetchPolicy;
use crate::core::province::is_in_covered_region;
use crate::core::store::{capitalize, PostalIndexes, ReferenceStore};
use crate::domain::model::{PostInfo, PostalDetail};
use crate::domain::ports::{PostalApi, Storage};
use crate::utils::error::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// 啟動時從快取或 basisregisters 收集資料，建立 `ReferenceStore` 的索引
pub struct StoreBuilder<A: PostalApi, S: Storage> {
    api: A,
    cache: DiskCache<S>,
    policy: FetchPolicy,
}

impl<A: PostalApi, S: Storage> StoreBuilder<A, S> {
    pub fn new(api: A, cache: DiskCache<S>, policy: FetchPolicy) -> Self {
        Self { api, cache, policy }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Uninitialized → Loading → Ready，任何錯誤都進入 Failed
    pub async fn build(&self, store: &ReferenceStore) -> Result<()> {
        store.begin_loading()?;
        tracing::info!("🚀 Initializing reference store from cache or basisregisters API");
        let started = Instant::now();

        let outcome = match self.collect().await {
            Ok(indexes) => store.publish(indexes),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                tracing::info!("✅ Reference store ready in {:?}", started.elapsed());
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Failed to initialise reference store: {}", e);
                store.fail(&e);
                Err(e)
            }
        }
    }

    async fn collect(&self) -> Result<PostalIndexes> {
        let municipality_names = self.load_municipality_names().await?;
        tracing::info!(
            "🏛️ Got {} unique municipality names",
            municipality_names.len()
        );

        let summaries = self.load_postal_summaries().await?;
        let postal_codes: BTreeSet<String> = summaries
            .iter()
            .map(|info| info.postal_code().to_string())
            .collect();
        let postal_names: BTreeSet<String> = summaries
            .iter()
            .flat_map(|info| info.post_names.iter())
            .map(|name| capitalize(name.spelling()))
            .collect();
        tracing::info!(
            "📮 Got {} unique postal codes and {} unique postal names from {} objects",
            postal_codes.len(),
            postal_names.len(),
            summaries.len()
        );

        let details = self.load_postal_details(&postal_codes).await?;
        tracing::info!("📋 Have details for {} postal codes", details.len());

        let indexes = PostalIndexes::build(&summaries, &details, &municipality_names)?;
        tracing::info!(
            "🗂️ Indexed {} postal names and {} postal codes",
            indexes.postal_name_count(),
            indexes.postal_code_count()
        );
        Ok(indexes)
    }

    async fn load_municipality_names(&self) -> Result<BTreeSet<String>> {
        if let Some(names) = self
            .cache
            .load::<Vec<String>>(CacheArtifact::MunicipalityNames)
            .await?
        {
            return Ok(names.into_iter().collect());
        }

        let names = self.api.municipality_names().await?;
        self.cache
            .save(CacheArtifact::MunicipalityNames, &names)
            .await?;
        Ok(names.into_iter().collect())
    }

    /// 不屬於任何省份的郵遞區號直接略過
    async fn load_postal_summaries(&self) -> Result<Vec<PostInfo>> {
        if let Some(cached) = self
            .cache
            .load::<Vec<PostInfo>>(CacheArtifact::PostalSummaries)
            .await?
        {
            return Ok(cached
                .into_iter()
                .filter(|info| is_in_covered_region(info.postal_code()))
                .collect());
        }

        let mut summaries = Vec::new();
        let mut skipped = 0;
        let mut pager = PostalInfoPager::new(&self.api, &self.policy);
        while let Some(page) = pager.next_page().await {
            for info in page? {
                if is_in_covered_region(info.postal_code()) {
                    summaries.push(info);
                } else {
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            tracing::debug!("Skipped {} postal codes outside Flanders", skipped);
        }

        self.cache
            .save(CacheArtifact::PostalSummaries, &summaries)
            .await?;
        Ok(summaries)
    }

    /// 先讀快取，只查詢缺少的代碼。
    ///
    /// 中途失敗時，已經取得的結果仍會寫回快取，再回傳錯誤。
    async fn load_postal_details(
        &self,
        postal_codes: &BTreeSet<String>,
    ) -> Result<BTreeMap<String, PostalDetail>> {
        let mut details: BTreeMap<String, PostalDetail> = self
            .cache
            .load(CacheArtifact::PostalDetails)
            .await?
            .unwrap_or_default();

        let missing: Vec<String> = postal_codes
            .iter()
            .filter(|code| !details.contains_key(*code))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(details);
        }

        tracing::info!(
            "🔄 {} postal codes are not in the cache, querying the API",
            missing.len()
        );

        let mut fetcher = DetailFetcher::new(&self.api, &self.policy, missing);
        let mut failure = None;
        while let Some(result) = fetcher.next_detail().await {
            match result {
                Ok(detail) => {
                    details.insert(detail.postal_code().to_string(), detail);
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        tracing::info!(
            "📥 Fetched {} new postal details ({} not fetched)",
            fetcher.emitted(),
            fetcher.remaining() + usize::from(failure.is_some())
        );
        self.cache
            .save(CacheArtifact::PostalDetails, &details)
            .await?;

        match failure {
            Some(e) => Err(e),
            None => Ok(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::tests::MockStorage;
    use crate::core::province::Province;
    use crate::core::store::StoreState;
    use crate::core::test_support::{detail, page, post_info, ScriptedApi};
    use crate::utils::error::StoreError;

    fn flanders_api() -> ScriptedApi {
        ScriptedApi::default()
            .with_municipalities(&["Gent", "Brugge"])
            .with_pages(vec![
                page(
                    vec![post_info("9000", &["Gent"]), post_info("1000", &["Brussel"])],
                    true,
                ),
                page(vec![post_info("8000", &["Brugge", "Koolkerke"])], false),
            ])
            .with_detail(detail("9000", "Gent", &["Gent"]))
            .with_detail(detail("8000", "Brugge", &["Brugge", "Koolkerke"]))
    }

    async fn json_file(storage: &MockStorage, name: &str) -> serde_json::Value {
        let bytes = storage.get_file(name).await.expect("cache file written");
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_build_from_api_fills_cache() {
        let storage = MockStorage::default();
        let builder = StoreBuilder::new(
            flanders_api(),
            DiskCache::new(storage.clone(), false),
            FetchPolicy::immediate(),
        );
        let store = ReferenceStore::new();

        builder.build(&store).await.unwrap();

        assert_eq!(store.state(), StoreState::Ready);
        let indexes = store.indexes().unwrap();
        assert_eq!(indexes.postal_code_count(), 2);
        assert!(!indexes.by_code.contains_key("1000"));
        assert_eq!(indexes.by_name["Koolkerke"].province, Province::WestVlaanderen);

        let summaries = json_file(&storage, "postal-information.json").await;
        assert_eq!(summaries.as_array().unwrap().len(), 2);
        let details = json_file(&storage, "post-details.json").await;
        assert!(details.get("9000").is_some());
        assert!(details.get("8000").is_some());
        let municipalities = json_file(&storage, "municipalities.json").await;
        assert_eq!(municipalities, serde_json::json!(["Gent", "Brugge"]));
    }

    #[tokio::test]
    async fn test_second_build_uses_only_cache() {
        let storage = MockStorage::default();
        let first = StoreBuilder::new(
            flanders_api(),
            DiskCache::new(storage.clone(), false),
            FetchPolicy::immediate(),
        );
        first.build(&ReferenceStore::new()).await.unwrap();
        assert!(!first.api().calls().is_empty());

        let second = StoreBuilder::new(
            ScriptedApi::default(),
            DiskCache::new(storage.clone(), false),
            FetchPolicy::immediate(),
        );
        let store = ReferenceStore::new();
        second.build(&store).await.unwrap();

        assert!(second.api().calls().is_empty());
        assert_eq!(store.indexes().unwrap().postal_name_count(), 3);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_hits_api() {
        let storage = MockStorage::default();
        StoreBuilder::new(
            flanders_api(),
            DiskCache::new(storage.clone(), false),
            FetchPolicy::immediate(),
        )
        .build(&ReferenceStore::new())
        .await
        .unwrap();

        let builder = StoreBuilder::new(
            flanders_api(),
            DiskCache::new(storage.clone(), true),
            FetchPolicy::immediate(),
        );
        builder.build(&ReferenceStore::new()).await.unwrap();

        let calls = builder.api().calls();
        assert!(calls.contains(&"municipalities".to_string()));
        assert!(calls.contains(&"detail:9000".to_string()));
        assert!(calls.contains(&"detail:8000".to_string()));
    }

    #[tokio::test]
    async fn test_only_missing_details_are_fetched() {
        let storage = MockStorage::default();
        let cached: BTreeMap<String, PostalDetail> =
            [("9000".to_string(), detail("9000", "Gent", &["Gent"]))].into();
        storage
            .put_file("post-details.json", &serde_json::to_vec(&cached).unwrap())
            .await;

        let builder = StoreBuilder::new(
            flanders_api(),
            DiskCache::new(storage.clone(), false),
            FetchPolicy::immediate(),
        );
        builder.build(&ReferenceStore::new()).await.unwrap();

        let detail_calls: Vec<String> = builder
            .api()
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("detail:"))
            .collect();
        assert_eq!(detail_calls, vec!["detail:8000"]);

        let details = json_file(&storage, "post-details.json").await;
        assert_eq!(details.as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_partial_detail_failure_keeps_fetched_entries() {
        let storage = MockStorage::default();
        let api = ScriptedApi::default()
            .with_municipalities(&["Gent"])
            .with_pages(vec![page(
                vec![
                    post_info("1500", &["Halle"]),
                    post_info("2000", &["Antwerpen"]),
                    post_info("9000", &["Gent"]),
                ],
                false,
            )])
            .with_detail(detail("2000", "Antwerpen", &["Antwerpen"]))
            .with_detail(detail("9000", "Gent", &["Gent"]))
            .with_broken_detail("1500", 503);
        let builder = StoreBuilder::new(
            api,
            DiskCache::new(storage.clone(), false),
            FetchPolicy::immediate(),
        );
        let store = ReferenceStore::new();

        let err = builder.build(&store).await.unwrap_err();

        assert!(matches!(err, StoreError::Upstream { status: 503, .. }));
        assert!(matches!(store.state(), StoreState::Failed(_)));
        assert!(matches!(store.indexes(), Err(StoreError::NotReady)));

        let details = json_file(&storage, "post-details.json").await;
        let mut codes: Vec<&String> = details.as_object().unwrap().keys().collect();
        codes.sort();
        assert_eq!(codes, vec!["2000", "9000"]);
    }

    #[tokio::test]
    async fn test_page_failure_is_fatal_and_not_cached() {
        let storage = MockStorage::default();
        let api = flanders_api().with_failing_page(1, 502);
        let builder = StoreBuilder::new(
            api,
            DiskCache::new(storage.clone(), false),
            FetchPolicy::immediate(),
        );
        let store = ReferenceStore::new();

        let err = builder.build(&store).await.unwrap_err();

        assert!(matches!(err, StoreError::Upstream { status: 502, .. }));
        assert!(matches!(store.state(), StoreState::Failed(_)));
        assert!(storage.get_file("postal-information.json").await.is_none());
        assert!(storage.get_file("municipalities.json").await.is_some());
    }

    #[tokio::test]
    async fn test_store_cannot_be_built_twice() {
        let builder = StoreBuilder::new(
            flanders_api(),
            DiskCache::new(MockStorage::default(), false),
            FetchPolicy::immediate(),
        );
        let store = ReferenceStore::new();
        builder.build(&store).await.unwrap();

        let err = builder.build(&store).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstructionInvariant { .. }));
        assert_eq!(store.state(), StoreState::Ready);
    }
}
