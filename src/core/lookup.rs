use crate::core::province::{classify, Province};
use crate::core::store::ReferenceStore;
use crate::domain::model::{PostalCodeEntry, PostalNameEntry};
use crate::utils::error::{Result, StoreError};
use std::sync::Arc;

/// 歐盟會員國 (荷蘭文名稱)
pub const EUROPEAN_COUNTRIES: [&str; 27] = [
    "België",
    "Bulgarije",
    "Cyprus",
    "Denemarken",
    "Duitsland",
    "Estland",
    "Finland",
    "Frankrijk",
    "Griekenland",
    "Hongarije",
    "Ierland",
    "Italië",
    "Kroatië",
    "Letland",
    "Litouwen",
    "Luxemburg",
    "Malta",
    "Nederland",
    "Oostenrijk",
    "Polen",
    "Portugal",
    "Roemenië",
    "Slovenië",
    "Slowakije",
    "Spanje",
    "Tsjechië",
    "Zweden",
];

/// 只從記憶體中的索引回答查詢，store 尚未 Ready 時回傳 `NotReady`
#[derive(Debug, Clone)]
pub struct LookupService {
    store: Arc<ReferenceStore>,
}

impl LookupService {
    pub fn new(store: Arc<ReferenceStore>) -> Self {
        Self { store }
    }

    /// 兩個條件同時給定時取交集
    pub fn postal_names(
        &self,
        postal_code: Option<&str>,
        province: Option<Province>,
    ) -> Result<Vec<PostalNameEntry>> {
        let indexes = self.store.indexes()?;
        Ok(indexes
            .by_name
            .values()
            .filter(|entry| province.map_or(true, |p| entry.province == p))
            .filter(|entry| postal_code.map_or(true, |c| entry.postal_code == c))
            .cloned()
            .collect())
    }

    pub fn postal_codes(
        &self,
        postal_name: Option<&str>,
        province: Option<Province>,
    ) -> Result<Vec<PostalCodeEntry>> {
        let indexes = self.store.indexes()?;
        Ok(indexes
            .by_code
            .values()
            .filter(|entry| postal_name.map_or(true, |name| entry.lists_name(name)))
            .filter(|entry| province.map_or(true, |p| entry.province == p))
            .cloned()
            .collect())
    }

    /// 有郵遞區號時一律用區間規則重新計算，不查索引
    pub fn provinces(
        &self,
        postal_code: Option<&str>,
        postal_name: Option<&str>,
    ) -> Result<Vec<Province>> {
        let indexes = self.store.indexes()?;
        match (postal_code, postal_name) {
            (Some(code), _) => Ok(vec![classify(code)?]),
            (None, Some(name)) => indexes
                .by_name
                .get(name)
                .map(|entry| vec![entry.province])
                .ok_or_else(|| StoreError::NotFound {
                    postal_name: name.to_string(),
                }),
            (None, None) => Ok(Province::ALL.to_vec()),
        }
    }

    pub fn countries(&self) -> &'static [&'static str] {
        &EUROPEAN_COUNTRIES
    }
}
