use anyhow::{Context, bail};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::instrument;

use crate::error::FetchError;

use super::{WeatherSource, truncate_body};

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://wttr.in";

/// Compact format: condition, temperature, humidity, wind separated by `|`
/// (temperatures carry a leading `+`, so `+` cannot be the delimiter).
const SUMMARY_FORMAT: &str = "%C|%t|%h|%w";
const DETAILED_FORMAT: &str = "j1";

#[derive(Debug, Clone)]
pub struct WeatherClientConfig {
    pub base_url: String,
    /// `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for WeatherClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Client for the keyless text weather service.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    base: Url,
    http: Client,
}

impl WeatherClient {
    pub fn new(config: WeatherClientConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid weather base URL: {}", config.base_url))?;
        if base.cannot_be_a_base() {
            bail!("Weather base URL cannot carry a path: {}", config.base_url);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build weather HTTP client")?;

        Ok(Self { base, http })
    }

    /// `{base}/{location}` with the location as one percent-encoded segment.
    fn location_url(&self, location: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(location);
        }
        url
    }

    async fn get_text(&self, location: &str, format: &str) -> Result<String, FetchError> {
        let res = self
            .http
            .get(self.location_url(location))
            .query(&[("format", format)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, location, "weather request failed");
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    #[instrument(skip(self), level = "info")]
    async fn fetch_summary(&self, location: &str) -> Result<String, FetchError> {
        let body = self.get_text(location, SUMMARY_FORMAT).await?;
        tracing::debug!(raw = %body.trim(), "summary response");
        Ok(body)
    }

    #[instrument(skip(self), level = "info")]
    async fn fetch_detailed(&self, location: &str) -> Result<String, FetchError> {
        let body = self.get_text(location, DETAILED_FORMAT).await?;
        tracing::debug!(bytes = body.len(), "detailed response");
        Ok(body)
    }
}
