//! HTTP client for the event backend.

use reqwest::Url;
use serde_json::Value;

use super::error::{ConfigError, FetchError};
use crate::records::{decode_envelope, Category, Record};

/// Path of the finding detail endpoint, relative to the base URL.
const DETAIL_PATH: &str = "findings/detail";

/// Thin client over the backend's list and detail endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut url = Url::parse(base_url).map_err(|e| ConfigError::BaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::BaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            });
        }

        // Endpoint paths are joined relative to the base, which needs a trailing slash.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch up to `limit` records of `category`.
    pub async fn fetch_list(
        &self,
        category: Category,
        limit: u32,
    ) -> Result<Vec<Record>, FetchError> {
        let url = self.endpoint(category.path())?;
        self.get_records(url, &[("limit", limit.to_string())]).await
    }

    /// Fetch the full record for one finding.
    pub async fn fetch_detail(&self, finding_id: &str) -> Result<Vec<Record>, FetchError> {
        let url = self.endpoint(DETAIL_PATH)?;
        self.get_records(url, &[("finding_id", finding_id.to_string())])
            .await
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::Network(format!("invalid endpoint {}: {}", path, e)))
    }

    async fn get_records(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Vec<Record>, FetchError> {
        tracing::debug!("ApiClient: GET {} {:?}", url, query);

        let response = self.http.get(url.clone()).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("ApiClient: {} returned {}", url, status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let value: Value =
            serde_json::from_slice(&body).map_err(|e| FetchError::Body(e.to_string()))?;

        let records = decode_envelope(&value);
        tracing::debug!("ApiClient: decoded {} records from {}", records.len(), url);
        Ok(records)
    }
}
