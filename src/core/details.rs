use crate::core::policy::FetchPolicy;
use crate::domain::model::PostalDetail;
use crate::domain::ports::PostalApi;
use crate::utils::error::Result;

/// 逐一查詢郵遞區號的詳細資訊。
///
/// 每個成功的結果馬上交給呼叫端，後面的代碼失敗時前面的結果仍然有效。
/// 暫時性錯誤 (見 `StoreError::is_retryable`) 會等待 `retry_cooldown`
/// 後重試同一個代碼，最多 `max_retries` 次；超過次數或遇到其他錯誤時
/// 整個序列結束。
pub struct DetailFetcher<'a, A: PostalApi + ?Sized> {
    api: &'a A,
    policy: &'a FetchPolicy,
    remaining: Vec<String>,
    delay_pending: bool,
    emitted: usize,
    finished: bool,
}

impl<'a, A: PostalApi + ?Sized> DetailFetcher<'a, A> {
    pub fn new<I>(api: &'a A, policy: &'a FetchPolicy, postal_codes: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            api,
            policy,
            remaining: postal_codes.into_iter().collect(),
            delay_pending: false,
            emitted: 0,
            finished: false,
        }
    }

    /// 還沒查詢的代碼數
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub async fn next_detail(&mut self) -> Option<Result<PostalDetail>> {
        if self.finished {
            return None;
        }
        let Some(postal_code) = self.remaining.pop() else {
            self.finished = true;
            return None;
        };

        if self.delay_pending && !self.policy.detail_delay.is_zero() {
            tokio::time::sleep(self.policy.detail_delay).await;
        }
        self.delay_pending = false;

        let mut retries = 0;
        loop {
            tracing::debug!("🔎 Getting detailed info for postal code {} from API", postal_code);
            match self.api.postal_detail(&postal_code).await {
                Ok(detail) => {
                    self.delay_pending = true;
                    self.emitted += 1;
                    return Some(Ok(detail));
                }
                Err(e) if e.is_retryable() && retries < self.policy.max_retries => {
                    retries += 1;
                    tracing::warn!(
                        "⏳ Postal code {}: {}. Retry {}/{} in {:?}",
                        postal_code,
                        e,
                        retries,
                        self.policy.max_retries,
                        self.policy.retry_cooldown
                    );
                    tokio::time::sleep(self.policy.retry_cooldown).await;
                }
                Err(e) => {
                    tracing::error!(
                        "❌ Giving up on postal code {} after {} retries: {} ({} codes left unfetched)",
                        postal_code,
                        retries,
                        e,
                        self.remaining.len()
                    );
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
