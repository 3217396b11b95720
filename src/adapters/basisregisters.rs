use crate::adapters::http::{build_client, decode_json};
use crate::config::ApiSettings;
use crate::core::province::classify;
use crate::domain::model::{
    Address, LocationQuery, MunicipalityList, PostInfoPage, PostalDetail,
};
use crate::domain::ports::{AddressVerifier, PostalApi};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// api.basisregisters.vlaanderen.be 的 v2 端點
pub struct BasisregistersClient {
    client: Client,
    postal_info_url: String,
    municipality_url: String,
    address_match_url: String,
}

impl BasisregistersClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings.timeout())?,
            postal_info_url: settings.postal_info_url.trim_end_matches('/').to_string(),
            municipality_url: settings.municipality_url.clone(),
            address_match_url: settings.address_match_url.clone(),
        })
    }
}

#[async_trait]
impl PostalApi for BasisregistersClient {
    async fn municipality_names(&self) -> Result<Vec<String>> {
        tracing::debug!("Making API request to: {}", self.municipality_url);
        let response = self
            .client
            .get(&self.municipality_url)
            .query(&[("status", "inGebruik"), ("gewest", "vlaams"), ("limit", "500")])
            .send()
            .await?;
        let list: MunicipalityList = decode_json(response).await?;

        Ok(list
            .municipalities
            .into_iter()
            .map(|m| m.municipality_name.geographical_name.spelling)
            .collect())
    }

    async fn postal_info_page(&self, limit: usize, offset: usize) -> Result<PostInfoPage> {
        let response = self
            .client
            .get(&self.postal_info_url)
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await?;
        decode_json(response).await
    }

    async fn postal_detail(&self, postal_code: &str) -> Result<PostalDetail> {
        let url = format!("{}/{}", self.postal_info_url, postal_code);
        let response = self.client.get(&url).send().await?;
        decode_json(response).await
    }
}

// ---- adresmatch 回應 ----

#[derive(Debug, Deserialize)]
struct Spelling {
    spelling: String,
}

#[derive(Debug, Deserialize)]
struct NamedObject {
    #[serde(rename = "geografischeNaam")]
    geographical_name: Spelling,
}

#[derive(Debug, Deserialize)]
struct MatchMunicipality {
    #[serde(rename = "gemeentenaam")]
    name: NamedObject,
}

#[derive(Debug, Deserialize)]
struct MatchStreet {
    #[serde(rename = "straatnaam")]
    name: NamedObject,
}

#[derive(Debug, Deserialize)]
struct MatchPostInfo {
    #[serde(rename = "objectId")]
    object_id: String,
}

#[derive(Debug, Deserialize)]
struct AddressMatch {
    #[serde(rename = "gemeente")]
    municipality: MatchMunicipality,
    #[serde(rename = "postinfo")]
    post_info: MatchPostInfo,
    #[serde(rename = "straatnaam")]
    street: MatchStreet,
    #[serde(rename = "huisnummer")]
    house_number: String,
    #[serde(rename = "busnummer", default)]
    box_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AddressMatchResult {
    #[serde(rename = "adresMatches")]
    matches: Vec<AddressMatch>,
}

impl AddressMatch {
    fn into_address(self) -> Result<Address> {
        Ok(Address {
            country: "België".to_string(),
            province: classify(&self.post_info.object_id)?,
            municipality: self.municipality.name.geographical_name.spelling,
            postal_code: self.post_info.object_id,
            street: self.street.name.geographical_name.spelling,
            house_number: self.house_number,
            box_number: self.box_number,
        })
    }
}

#[async_trait]
impl AddressVerifier for BasisregistersClient {
    async fn verified_addresses(&self, location: &LocationQuery) -> Result<Vec<Address>> {
        tracing::debug!("Making API request to: {} for {:?}", self.address_match_url, location);
        let response = self
            .client
            .get(&self.address_match_url)
            .query(&[
                ("gemeentenaam", location.municipality.as_str()),
                ("postcode", location.postal_code.as_str()),
                ("straatnaam", location.street.as_str()),
                ("huisnummer", location.house_number.as_str()),
            ])
            .send()
            .await?;
        let result: AddressMatchResult = decode_json(response).await?;

        result
            .matches
            .into_iter()
            .map(AddressMatch::into_address)
            .collect()
    }
}
