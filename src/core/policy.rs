use std::time::Duration;

/// 對 basisregisters 的節流與重試設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    pub page_size: usize,
    /// 兩個分頁請求之間的間隔
    pub page_delay: Duration,
    /// 兩個 detail 請求之間的間隔
    pub detail_delay: Duration,
    /// 被擋下來之後等多久再試
    pub retry_cooldown: Duration,
    pub max_retries: u32,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            page_size: 50,
            page_delay: Duration::from_millis(500),
            detail_delay: Duration::from_millis(2000),
            retry_cooldown: Duration::from_secs(5 * 60),
            max_retries: 3,
        }
    }
}

impl FetchPolicy {
    /// 測試用：不等待
    pub fn immediate() -> Self {
        Self {
            page_delay: Duration::ZERO,
            detail_delay: Duration::ZERO,
            retry_cooldown: Duration::ZERO,
            ..Self::default()
        }
    }
}
