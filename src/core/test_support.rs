//! 單元測試共用的假 API 與資料建構函式

use crate::domain::model::{
    GeographicalName, Identificator, MunicipalityName, MunicipalityRef, PostInfo, PostInfoPage,
    PostName, PostalDetail,
};
use crate::domain::ports::PostalApi;
use crate::utils::error::{Result, StoreError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub fn post_names(names: &[&str]) -> Vec<PostName> {
    names
        .iter()
        .map(|n| PostName {
            geographical_name: GeographicalName {
                spelling: n.to_string(),
            },
        })
        .collect()
}

pub fn post_info(code: &str, names: &[&str]) -> PostInfo {
    PostInfo {
        identificator: Identificator {
            object_id: code.to_string(),
        },
        post_names: post_names(names),
    }
}

pub fn detail(code: &str, municipality: &str, names: &[&str]) -> PostalDetail {
    PostalDetail {
        identificator: Identificator {
            object_id: code.to_string(),
        },
        municipality: MunicipalityRef {
            municipality_name: MunicipalityName {
                geographical_name: GeographicalName {
                    spelling: municipality.to_string(),
                },
            },
        },
        post_names: post_names(names),
    }
}

pub fn page(items: Vec<PostInfo>, has_next: bool) -> PostInfoPage {
    PostInfoPage {
        post_info_objects: items,
        next: has_next.then(|| "https://api.example/postinfo?offset=next".to_string()),
    }
}

/// 依照劇本回應的 PostalApi，並記錄每一次呼叫
#[derive(Default)]
pub struct ScriptedApi {
    municipalities: Vec<String>,
    pages: Vec<PostInfoPage>,
    failing_page: Option<(usize, u16)>,
    details: HashMap<String, PostalDetail>,
    detail_failures: Mutex<HashMap<String, VecDeque<u16>>>,
    broken_details: HashMap<String, u16>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn with_municipalities(mut self, names: &[&str]) -> Self {
        self.municipalities = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_pages(mut self, pages: Vec<PostInfoPage>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_failing_page(mut self, index: usize, status: u16) -> Self {
        self.failing_page = Some((index, status));
        self
    }

    pub fn with_detail(mut self, detail: PostalDetail) -> Self {
        self.details.insert(detail.postal_code().to_string(), detail);
        self
    }

    /// 先依序回傳這些狀態碼，之後才成功
    pub fn with_detail_failures(self, code: &str, statuses: &[u16]) -> Self {
        self.detail_failures
            .lock()
            .unwrap()
            .insert(code.to_string(), statuses.iter().copied().collect());
        self
    }

    pub fn with_broken_detail(mut self, code: &str, status: u16) -> Self {
        self.broken_details.insert(code.to_string(), status);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn upstream(status: u16) -> StoreError {
        StoreError::Upstream {
            status,
            body: format!("scripted failure {}", status),
        }
    }
}

#[async_trait]
impl PostalApi for ScriptedApi {
    async fn municipality_names(&self) -> Result<Vec<String>> {
        self.record("municipalities".to_string());
        Ok(self.municipalities.clone())
    }

    async fn postal_info_page(&self, limit: usize, offset: usize) -> Result<PostInfoPage> {
        self.record(format!("page:{}:{}", limit, offset));
        let index = offset / limit;
        if let Some((failing, status)) = self.failing_page {
            if failing == index {
                return Err(Self::upstream(status));
            }
        }
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| Self::upstream(404))
    }

    async fn postal_detail(&self, postal_code: &str) -> Result<PostalDetail> {
        self.record(format!("detail:{}", postal_code));
        if let Some(status) = self.broken_details.get(postal_code) {
            return Err(Self::upstream(*status));
        }
        let scripted = self
            .detail_failures
            .lock()
            .unwrap()
            .get_mut(postal_code)
            .and_then(|queue| queue.pop_front());
        if let Some(status) = scripted {
            return Err(Self::upstream(status));
        }
        self.details
            .get(postal_code)
            .cloned()
            .ok_or_else(|| Self::upstream(404))
    }
}
