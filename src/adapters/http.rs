use crate::utils::error::{Result, StoreError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("address-search/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// 非 200 → `Upstream`，200 但格式不符 → `Schema`
pub async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let url = response.url().clone();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::debug!("API response status {} for {}", status, url);
        return Err(StoreError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| StoreError::Schema {
        diagnostic: format!("{} (from {})", e, url),
    })
}
