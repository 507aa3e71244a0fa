//! HTTP client for the OpenWeatherMap endpoints.
//!
//! The adapters live next to their domain types (`weather`, `air_quality`,
//! `geocode`, `radar`) as `impl WeatherClient` blocks; this module owns the
//! shared request path.

use std::time::Duration;

use glass_core::{ApiConfig, WeatherError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::retry::{with_retry, RetryConfig};

#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    api_key: Option<String>,
    base_url: Url,
    tile_base_url: Url,
    retry: RetryConfig,
}

impl WeatherClient {
    /// Build a client from configuration.
    ///
    /// A missing API key is not an error here; every adapter checks it
    /// before sending anything.
    pub fn from_config(config: &ApiConfig) -> Result<Self, WeatherError> {
        let api_key = config.resolve_api_key().ok();
        if api_key.is_none() {
            tracing::warn!("No weather API key configured; weather requests will fail");
        }
        Self::build(
            api_key,
            &config.api_base_url,
            &config.tile_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Client against an explicit base URL (used by tests).
    pub fn new_with_base_url(api_key: Option<String>, base_url: &str) -> Result<Self, WeatherError> {
        Self::build(api_key, base_url, base_url, Duration::from_secs(10))
    }

    fn build(
        api_key: Option<String>,
        base_url: &str,
        tile_base_url: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key,
            base_url: Url::parse(base_url)?,
            tile_base_url: Url::parse(tile_base_url)?,
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The API key, or `MissingApiKey` before any request is made.
    pub fn api_key(&self) -> Result<&str, WeatherError> {
        self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)
    }

    pub fn tile_base_url(&self) -> &Url {
        &self.tile_base_url
    }

    /// GET `{base}/{path}?{query}&appid=..` with retries, decoding JSON.
    ///
    /// Non-success statuses surface as `WeatherError::Status` tagged
    /// with `context` once the retry budget is spent.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        context: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let api_key = self.api_key()?;
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("appid", api_key);

        tracing::debug!("GET {} ({})", url.path(), context);
        with_retry(&self.retry, || self.fetch_json(context, &url)).await
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        context: &'static str,
        url: &Url,
    ) -> Result<T, WeatherError> {
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned status {}", context, status);
            return Err(WeatherError::Status {
                context,
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reported_without_request() {
        let client = WeatherClient::new_with_base_url(None, "http://localhost:9").unwrap();
        assert!(!client.has_api_key());
        assert!(matches!(client.api_key(), Err(WeatherError::MissingApiKey)));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = WeatherClient::new_with_base_url(Some("k".into()), "not a url");
        assert!(matches!(result, Err(WeatherError::InvalidUrl(_))));
    }
}
