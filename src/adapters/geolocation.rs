use crate::adapters::http::{build_client, decode_json};
use crate::config::ApiSettings;
use crate::domain::model::LocationQuery;
use crate::domain::ports::LocationSearch;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// 每次最多回傳的候選地址數
const MAX_CANDIDATES: &str = "10";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LocationResult {
    municipality: String,
    zipcode: String,
    thoroughfarename: String,
    housenumber: String,
}

#[derive(Debug, Deserialize)]
struct LocationResponse {
    #[serde(rename = "LocationResult")]
    results: Vec<LocationResult>,
}

impl From<LocationResult> for LocationQuery {
    fn from(location: LocationResult) -> Self {
        LocationQuery {
            municipality: location.municipality,
            street: location.thoroughfarename,
            house_number: location.housenumber,
            postal_code: location.zipcode,
        }
    }
}

/// geo.api.vlaanderen.be 的模糊地址搜尋
pub struct GeolocationClient {
    client: Client,
    url: String,
}

impl GeolocationClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings.timeout())?,
            url: settings.fuzzy_search_url.clone(),
        })
    }
}

#[async_trait]
impl LocationSearch for GeolocationClient {
    async fn search(&self, query: &str) -> Result<Vec<LocationQuery>> {
        tracing::debug!("🔍 Fuzzy search for {:?}", query);
        let response = self
            .client
            .get(&self.url)
            .query(&[("q", query), ("c", MAX_CANDIDATES), ("type", "Housenumber")])
            .send()
            .await?;
        let locations: LocationResponse = decode_json(response).await?;

        Ok(locations.results.into_iter().map(LocationQuery::from).collect())
    }
}
