use crate::core::province::classify;
use crate::domain::model::{
    PostInfo, PostalCodeEntry, PostalDetail, PostalNameEntry, PostalNameRef, PostalRecord,
};
use crate::utils::error::{Result, StoreError};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Loading,
    Ready,
    /// 終止狀態，需要重新啟動程序
    Failed(String),
}

/// 第一個字母大寫，其餘小寫。
/// 多個字或有連字號的名稱 (例如 "Sint-Niklaas") 也照這個規則處理。
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// 查詢用的兩個索引，建立後不再變動
#[derive(Debug, Default)]
pub struct PostalIndexes {
    pub(crate) by_name: BTreeMap<String, PostalNameEntry>,
    pub(crate) by_code: BTreeMap<String, PostalCodeEntry>,
}

impl PostalIndexes {
    /// 合併摘要與詳細資訊，建立名稱與郵遞區號索引。
    ///
    /// 任何對不上的交叉參照都視為資料錯誤，不會默默略過。
    pub fn build(
        summaries: &[PostInfo],
        details: &BTreeMap<String, PostalDetail>,
        municipality_names: &BTreeSet<String>,
    ) -> Result<Self> {
        let records = merge_records(summaries, details)?;

        let mut by_code = BTreeMap::new();
        for record in records.values() {
            let province = classify(&record.postal_code)?;
            let postal_names = record
                .postal_names
                .iter()
                .map(|name| PostalNameRef {
                    name: name.clone(),
                    is_municipality: municipality_names.contains(name),
                })
                .collect();
            by_code.insert(
                record.postal_code.clone(),
                PostalCodeEntry {
                    postal_code: record.postal_code.clone(),
                    province,
                    postal_names,
                },
            );
        }

        // 同一個名稱出現在多個郵遞區號時，以第一次出現的為準
        let mut by_name = BTreeMap::new();
        for summary in summaries {
            let code = summary.postal_code();
            let record = records.get(code).ok_or_else(|| invariant(format!(
                "no merged record for postal code {}",
                code
            )))?;
            for post_name in &summary.post_names {
                let name = capitalize(post_name.spelling());
                insert_name(&mut by_name, name, record, municipality_names)?;
            }
        }
        // 只出現在 detail 的名稱也要能查到
        for record in records.values() {
            for name in &record.postal_names {
                insert_name(&mut by_name, name.clone(), record, municipality_names)?;
            }
        }

        let indexes = Self { by_name, by_code };
        indexes.check_cross_references()?;
        Ok(indexes)
    }

    fn check_cross_references(&self) -> Result<()> {
        for (name, entry) in &self.by_name {
            let listed = self
                .by_code
                .get(&entry.postal_code)
                .map(|code_entry| code_entry.lists_name(name))
                .unwrap_or(false);
            if !listed {
                return Err(invariant(format!(
                    "postal name {} points to postal code {} which does not list it",
                    name, entry.postal_code
                )));
            }
        }
        for (code, entry) in &self.by_code {
            if let Some(missing) = entry
                .postal_names
                .iter()
                .find(|listed| !self.by_name.contains_key(&listed.name))
            {
                return Err(invariant(format!(
                    "postal code {} lists postal name {} which has no name entry",
                    code, missing.name
                )));
            }
        }
        Ok(())
    }

    pub fn postal_name_count(&self) -> usize {
        self.by_name.len()
    }

    pub fn postal_code_count(&self) -> usize {
        self.by_code.len()
    }
}

fn insert_name(
    by_name: &mut BTreeMap<String, PostalNameEntry>,
    name: String,
    record: &PostalRecord,
    municipality_names: &BTreeSet<String>,
) -> Result<()> {
    if by_name.contains_key(&name) {
        return Ok(());
    }
    let entry = PostalNameEntry {
        postal_name: name.clone(),
        postal_code: record.postal_code.clone(),
        province: classify(&record.postal_code)?,
        is_municipality: municipality_names.contains(&name),
        associated_municipality: Some(record.municipality_name.clone()),
    };
    by_name.insert(name, entry);
    Ok(())
}

fn invariant(message: String) -> StoreError {
    StoreError::ConstructionInvariant { message }
}

fn merge_records(
    summaries: &[PostInfo],
    details: &BTreeMap<String, PostalDetail>,
) -> Result<BTreeMap<String, PostalRecord>> {
    let mut records: BTreeMap<String, PostalRecord> = BTreeMap::new();

    for summary in summaries {
        let code = summary.postal_code();
        let detail = details.get(code).ok_or_else(|| {
            invariant(format!("postal code {} has no detail information", code))
        })?;

        let record = records
            .entry(code.to_string())
            .or_insert_with(|| PostalRecord {
                postal_code: code.to_string(),
                postal_names: BTreeSet::new(),
                municipality_name: detail.municipality_name().to_string(),
            });
        record.postal_names.extend(
            summary
                .post_names
                .iter()
                .chain(detail.post_names.iter())
                .map(|n| capitalize(n.spelling())),
        );
    }

    if let Some(empty) = records.values().find(|r| r.postal_names.is_empty()) {
        return Err(invariant(format!(
            "postal code {} has no postal names",
            empty.postal_code
        )));
    }

    Ok(records)
}

/// 整個程序共用的參考資料。
///
/// 由 `StoreBuilder` 建立一次，之後只讀；索引發佈前的查詢一律回傳 `NotReady`。
#[derive(Debug)]
pub struct ReferenceStore {
    state: watch::Sender<StoreState>,
    indexes: OnceLock<PostalIndexes>,
}

impl Default for ReferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(StoreState::Uninitialized);
        Self {
            state,
            indexes: OnceLock::new(),
        }
    }

    pub fn state(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// 讓監控程序觀察狀態變化
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn indexes(&self) -> Result<&PostalIndexes> {
        self.indexes.get().ok_or(StoreError::NotReady)
    }

    pub(crate) fn begin_loading(&self) -> Result<()> {
        let mut started = false;
        self.state.send_if_modified(|state| {
            if *state == StoreState::Uninitialized {
                *state = StoreState::Loading;
                started = true;
            }
            started
        });
        if started {
            Ok(())
        } else {
            Err(invariant(format!(
                "reference store can only be built once (state: {:?})",
                self.state()
            )))
        }
    }

    pub(crate) fn publish(&self, indexes: PostalIndexes) -> Result<()> {
        self.indexes
            .set(indexes)
            .map_err(|_| invariant("reference store indexes were already published".to_string()))?;
        self.state.send_replace(StoreState::Ready);
        Ok(())
    }

    pub(crate) fn fail(&self, error: &StoreError) {
        self.state.send_replace(StoreState::Failed(error.to_string()));
    }
}
