use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

use crate::{error::SearchError, model::LocationSuggestion};

use super::{LocationSearch, truncate_body};

pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// The service rejects requests that do not identify the calling application.
pub const DEFAULT_USER_AGENT: &str = "WeatherApp/1.0 (Rust)";

#[derive(Debug, Clone)]
pub struct GeocodingClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl Default for GeocodingClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODING_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

/// Forward geocoding against an OpenStreetMap search endpoint.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    base_url: String,
    http: Client,
}

impl GeocodingClient {
    pub fn new(config: GeocodingClientConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build geocoding HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl LocationSearch for GeocodingClient {
    #[instrument(skip(self), level = "info")]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LocationSuggestion>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/search", self.base_url);
        let limit = limit.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", limit.as_str()),
                ("addressdetails", "0"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(SearchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let suggestions: Vec<LocationSuggestion> = serde_json::from_str(&body)?;
        tracing::debug!(count = suggestions.len(), "geocoding results");
        Ok(suggestions)
    }
}
