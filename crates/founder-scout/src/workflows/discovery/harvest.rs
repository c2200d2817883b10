//! Harvest people-search adapter.
//!
//! Talks to the `/linkedin/profile-search` and `/linkedin/geo-id-search`
//! endpoints with an `X-API-Key` header. A missing key yields
//! [`SourceError::Unavailable`] without touching the network.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;

use super::cascade::ProfileQuery;
use super::domain::RawProfile;
use super::source::{ProfileSource, SourceError};
use crate::config::HarvestConfig;

const PROFILE_SEARCH_PATH: &str = "/linkedin/profile-search";
const GEO_SEARCH_PATH: &str = "/linkedin/geo-id-search";
const API_KEY_HEADER: &str = "X-API-Key";

pub struct HarvestClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ElementsEnvelope {
    #[serde(default)]
    elements: Vec<Value>,
}

impl HarvestClient {
    pub fn new(config: &HarvestConfig) -> Result<Self, SourceError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| SourceError::Client(err.to_string()))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn authorized_get(&self, path: &str) -> Result<RequestBuilder, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::Unavailable("HARVEST_API_KEY missing".to_string()))?;

        Ok(self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, api_key))
    }

    async fn fetch_elements(&self, request: RequestBuilder) -> Result<Vec<Value>, SourceError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "harvest responded");
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let envelope: ElementsEnvelope = response
            .json()
            .await
            .map_err(|err| SourceError::Decode(err.to_string()))?;
        Ok(envelope.elements)
    }
}

fn map_transport_error(err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout
    } else {
        SourceError::Http(err.to_string())
    }
}

/// Query string for a profile search; a geo identifier wins over free-text location.
pub(crate) fn search_params(query: &ProfileQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("page", query.page.max(1).to_string())];
    if !query.search.is_empty() {
        params.push(("search", query.search.clone()));
    }
    if !query.title.is_empty() {
        params.push(("title", query.title.clone()));
    }
    if !query.geo_id.is_empty() {
        params.push(("geoId", query.geo_id.clone()));
    } else if !query.location.is_empty() {
        params.push(("location", query.location.clone()));
    }
    params
}

fn geo_id_from(element: &Value) -> Option<String> {
    match element.get("geoId")? {
        Value::String(id) => Some(id.trim().to_string()).filter(|id| !id.is_empty()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[async_trait]
impl ProfileSource for HarvestClient {
    async fn search_people(&self, query: &ProfileQuery) -> Result<Vec<RawProfile>, SourceError> {
        let request = self
            .authorized_get(PROFILE_SEARCH_PATH)?
            .query(&search_params(query));
        let elements = self.fetch_elements(request).await?;

        let profiles: Vec<RawProfile> = elements
            .into_iter()
            .filter_map(RawProfile::from_value)
            .take(query.limit)
            .collect();
        tracing::debug!(count = profiles.len(), "harvest returned profiles");
        Ok(profiles)
    }

    async fn lookup_geo_id(&self, search: &str) -> Result<Option<String>, SourceError> {
        let request = self
            .authorized_get(GEO_SEARCH_PATH)?
            .query(&[("search", search)]);
        let elements = self.fetch_elements(request).await?;
        Ok(elements.first().and_then(geo_id_from))
    }
}
