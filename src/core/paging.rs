use crate::core::policy::FetchPolicy;
use crate::domain::model::PostInfo;
use crate::domain::ports::PostalApi;
use crate::utils::error::Result;

/// 以 limit/offset 逐頁讀取全部郵遞資訊。
///
/// 每次 `next_page` 只送出一個請求，呼叫端可以邊讀邊處理。
/// 出錯後序列即結束，不會重試同一頁；要重來只能建立新的 pager。
pub struct PostalInfoPager<'a, A: PostalApi + ?Sized> {
    api: &'a A,
    policy: &'a FetchPolicy,
    offset: usize,
    pages_fetched: usize,
    finished: bool,
}

impl<'a, A: PostalApi + ?Sized> PostalInfoPager<'a, A> {
    pub fn new(api: &'a A, policy: &'a FetchPolicy) -> Self {
        Self {
            api,
            policy,
            offset: 0,
            pages_fetched: 0,
            finished: false,
        }
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub async fn next_page(&mut self) -> Option<Result<Vec<PostInfo>>> {
        if self.finished {
            return None;
        }

        // 自己限制速率，避免被 API 擋下
        if self.pages_fetched > 0 && !self.policy.page_delay.is_zero() {
            tokio::time::sleep(self.policy.page_delay).await;
        }

        let limit = self.policy.page_size;
        let page = match self.api.postal_info_page(limit, self.offset).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(
                    "❌ Postal information page at offset {} failed: {}",
                    self.offset,
                    e
                );
                self.finished = true;
                return Some(Err(e));
            }
        };

        tracing::info!(
            "📄 Got {} results using offset {} and limit {} from API",
            page.post_info_objects.len(),
            self.offset,
            limit
        );

        self.pages_fetched += 1;
        self.offset += limit;
        self.finished = page.next.is_none();

        if page.post_info_objects.is_empty() && !self.finished {
            tracing::warn!(
                "⚠️ Empty page at offset {} still links to a next page, stopping",
                self.offset - limit
            );
            self.finished = true;
        }

        Some(Ok(page.post_info_objects))
    }
}
