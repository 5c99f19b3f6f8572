//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Client, Response, StatusCode};
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::rate_limiter::TmdbRateLimiter;
use super::types::{
    Fetched, MediaType, TmdbErrorResponse, TmdbGenreList, TmdbMediaDetails, TmdbPopularPage,
    TmdbReviewPage,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// TMDB API client.
///
/// Authenticates with the v3 `api_key` query parameter.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// v3 API key.
    api_key: String,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<TmdbRateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the v3 API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: no pacing).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        if api_key.trim().is_empty() {
            bail!("api_key must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::disabled, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends a GET request with the API key and query params.
    ///
    /// The request URL is never logged because it carries the API key.
    async fn send(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        self.rate_limiter.lock().await.wait().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let request = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(path = path, "TMDB API request");

        let result = self.http_client.execute(request).await;
        result.with_context(|| format!("request failed: {path}"))
    }

    /// Reads and decodes a JSON response body.
    async fn decode<T: serde::de::DeserializeOwned>(response: Response, path: &str) -> Result<T> {
        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        raw_result.with_context(|| format!("failed to decode JSON response: {path}"))
    }

    /// GET that decodes the body whatever the status.
    ///
    /// Non-success responses are logged with the TMDB error message and
    /// decoded like any other body, so missing keys fall back to their
    /// defaults. Only transport and decode failures are errors.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.send(path, query).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;

        if !status.is_success() {
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                tracing::warn!(
                    path = path,
                    status = status.as_u16(),
                    code = error_response.status_code,
                    "TMDB API error: {}",
                    error_response.status_message
                );
            } else {
                tracing::warn!(path = path, status = status.as_u16(), "TMDB API error");
            }
        }

        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        raw_result.with_context(|| {
            format!("failed to decode JSON response (HTTP {status}): {path}")
        })
    }

    /// GET that reports any non-200 status as [`Fetched::Unavailable`].
    #[instrument(skip_all)]
    async fn get_json_if_found<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Fetched<T>> {
        let response = self.send(path, query).await?;
        let status = response.status();

        if status != StatusCode::OK {
            tracing::debug!(path = path, status = status.as_u16(), "TMDB lookup unavailable");
            return Ok(Fetched::Unavailable {
                status: status.as_u16(),
            });
        }

        Self::decode(response, path).await.map(Fetched::Found)
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all, fields(media_type = %media_type, page = page))]
    async fn popular(
        &self,
        media_type: MediaType,
        page: u32,
        language: &str,
    ) -> Result<TmdbPopularPage> {
        let path = format!("{media_type}/popular");
        let query = [
            ("language", String::from(language)),
            ("page", page.to_string()),
        ];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all, fields(media_type = %media_type, id = id))]
    async fn reviews(&self, media_type: MediaType, id: u64) -> Result<Fetched<TmdbReviewPage>> {
        let path = format!("{media_type}/{id}/reviews");
        let query = [("page", String::from("1"))];
        self.get_json_if_found(&path, &query).await
    }

    #[instrument(skip_all, fields(media_type = %media_type, id = id))]
    async fn details(
        &self,
        media_type: MediaType,
        id: u64,
        language: &str,
    ) -> Result<Fetched<TmdbMediaDetails>> {
        let path = format!("{media_type}/{id}");
        let query = [("language", String::from(language))];
        self.get_json_if_found(&path, &query).await
    }

    #[instrument(skip_all, fields(media_type = %media_type))]
    async fn genres(&self, media_type: MediaType, language: &str) -> Result<TmdbGenreList> {
        let path = format!("genre/{media_type}/list");
        let query = [("language", String::from(language))];
        self.get_json(&path, &query).await
    }
}
