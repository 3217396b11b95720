use crate::domain::model::{Address, LocationQuery, PostInfoPage, PostalDetail};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    /// 檔案不存在時回傳 `Ok(None)`
    fn read_file(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// basisregisters 的郵遞資訊端點
#[async_trait]
pub trait PostalApi: Send + Sync {
    async fn municipality_names(&self) -> Result<Vec<String>>;
    async fn postal_info_page(&self, limit: usize, offset: usize) -> Result<PostInfoPage>;
    async fn postal_detail(&self, postal_code: &str) -> Result<PostalDetail>;
}

#[async_trait]
pub trait AddressVerifier: Send + Sync {
    async fn verified_addresses(&self, location: &LocationQuery) -> Result<Vec<Address>>;
}

#[async_trait]
pub trait LocationSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<LocationQuery>>;
}
