use crate::core::province::Province;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ---- basisregisters 原始結構 (同時也是快取檔案格式) ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographicalName {
    pub spelling: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostName {
    #[serde(rename = "geografischeNaam")]
    pub geographical_name: GeographicalName,
}

impl PostName {
    pub fn spelling(&self) -> &str {
        &self.geographical_name.spelling
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identificator {
    #[serde(rename = "objectId")]
    pub object_id: String,
}

/// 分頁列表中的單筆郵遞資訊
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInfo {
    pub identificator: Identificator,
    #[serde(rename = "postnamen")]
    pub post_names: Vec<PostName>,
}

impl PostInfo {
    pub fn postal_code(&self) -> &str {
        &self.identificator.object_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostInfoPage {
    #[serde(rename = "postInfoObjecten")]
    pub post_info_objects: Vec<PostInfo>,
    /// 下一頁連結，最後一頁沒有
    #[serde(rename = "volgende", default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunicipalityName {
    #[serde(rename = "geografischeNaam")]
    pub geographical_name: GeographicalName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunicipalityRef {
    #[serde(rename = "gemeentenaam")]
    pub municipality_name: MunicipalityName,
}

/// 單一郵遞區號的詳細資訊
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalDetail {
    pub identificator: Identificator,
    #[serde(rename = "gemeente")]
    pub municipality: MunicipalityRef,
    #[serde(rename = "postnamen")]
    pub post_names: Vec<PostName>,
}

impl PostalDetail {
    pub fn postal_code(&self) -> &str {
        &self.identificator.object_id
    }

    pub fn municipality_name(&self) -> &str {
        &self.municipality.municipality_name.geographical_name.spelling
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MunicipalityEntry {
    #[serde(rename = "gemeentenaam")]
    pub municipality_name: MunicipalityName,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MunicipalityList {
    #[serde(rename = "gemeenten")]
    pub municipalities: Vec<MunicipalityEntry>,
}

// ---- 整理後的資料 ----

/// 分頁摘要與詳細資訊合併後的一筆郵遞區號
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalRecord {
    pub postal_code: String,
    pub postal_names: BTreeSet<String>,
    pub municipality_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalNameEntry {
    pub postal_name: String,
    pub postal_code: String,
    pub province: Province,
    pub is_municipality: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_municipality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalNameRef {
    pub name: String,
    pub is_municipality: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalCodeEntry {
    pub postal_code: String,
    pub province: Province,
    pub postal_names: Vec<PostalNameRef>,
}

impl PostalCodeEntry {
    pub fn lists_name(&self, name: &str) -> bool {
        self.postal_names.iter().any(|n| n.name == name)
    }
}

// ---- 地址查詢 ----

/// 模糊搜尋的結果，也是地址驗證的輸入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    pub municipality: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub country: String,
    pub province: Province,
    pub municipality: String,
    pub postal_code: String,
    pub street: String,
    pub house_number: String,
    pub box_number: Option<String>,
}
