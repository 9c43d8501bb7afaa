//! HTTP client for the places search API.
//!
//! Wraps `reqwest` with API key handling and the two search endpoints used by
//! the tiered search: proximity (`nearbysearch`) and free text (`textsearch`).
//! Every call is a single GET with no retries; any failure is returned to the
//! caller as a transport failure.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::strategy::SearchStrategy;
use crate::types::{Coordinate, PlacesResponse, RawPlace};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";
const NEARBY_PATH: &str = "nearbysearch/json";
const TEXT_PATH: &str = "textsearch/json";

/// Connection settings for [`PlacesClient`].
#[derive(Clone)]
pub struct PlacesClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub language: String,
    pub region: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl PlacesClientConfig {
    /// Production endpoint with the default `zh-TW` / `tw` locale and a
    /// 10 second timeout.
    #[must_use]
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            language: "zh-TW".to_owned(),
            region: "tw".to_owned(),
            timeout_secs: 10,
            user_agent: "eatnow/0.1 (nearby-search)".to_owned(),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &eatnow_core::AppConfig) -> Self {
        Self {
            api_key: config.places_api_key.clone(),
            base_url: config.places_base_url.clone(),
            language: config.places_language.clone(),
            region: config.places_region.clone(),
            timeout_secs: config.places_request_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }

    /// Points the client at a different root, e.g. a wiremock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        base_url.clone_into(&mut self.base_url);
        self
    }
}

impl std::fmt::Debug for PlacesClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClientConfig")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("region", &self.region)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Client for the places search endpoints.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    language: String,
    region: String,
}

impl PlacesClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &PlacesClientConfig) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .user_agent(config.user_agent.as_str())
            .build()?;

        // Exactly one trailing slash so endpoint paths join under the root
        // instead of replacing its last segment.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url,
            language: config.language.clone(),
            region: config.region.clone(),
        })
    }

    /// Runs one strategy at `radius_m` around `origin`, returning at most
    /// `cap` raw results.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::nearby_search`] and [`PlacesClient::text_search`].
    pub async fn run_strategy(
        &self,
        strategy: &SearchStrategy,
        origin: Coordinate,
        radius_m: u32,
        cap: usize,
    ) -> Result<Vec<RawPlace>, PlacesError> {
        match strategy {
            SearchStrategy::Proximity(q) => {
                self.nearby_search(
                    origin,
                    radius_m,
                    &q.category,
                    q.open_now,
                    cap,
                    q.keyword.as_deref(),
                )
                .await
            }
            SearchStrategy::Text(q) => {
                self.text_search(origin, radius_m, &q.query, q.open_now, cap)
                    .await
            }
        }
    }

    /// Proximity search filtered by `category` (a single type or a
    /// `|`-joined union) and an optional `keyword`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or timeout.
    /// - [`PlacesError::UnexpectedStatus`] on a non-2xx response.
    /// - [`PlacesError::Deserialize`] if the body is not the expected JSON.
    pub async fn nearby_search(
        &self,
        origin: Coordinate,
        radius_m: u32,
        category: &str,
        open_now: bool,
        cap: usize,
        keyword: Option<&str>,
    ) -> Result<Vec<RawPlace>, PlacesError> {
        let location = origin.to_query_value();
        let radius = radius_m.to_string();
        let mut params = vec![
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("type", category),
            ("language", self.language.as_str()),
        ];
        if open_now {
            params.push(("opennow", "true"));
        }
        if let Some(kw) = keyword {
            params.push(("keyword", kw));
        }

        let url = self.build_url(NEARBY_PATH, &params);
        match self.fetch("nearbysearch", url).await {
            Ok(response) => {
                tracing::info!(
                    endpoint = "nearbysearch",
                    status = response.status.as_deref().unwrap_or("-"),
                    error_message = response.error_message.as_deref().unwrap_or("-"),
                    location = %location,
                    radius_m,
                    category,
                    keyword = keyword.unwrap_or("-"),
                    open_now,
                    language = %self.language,
                    results = response.results.len(),
                    "places search completed"
                );
                Ok(truncate_results(&response.results, cap))
            }
            Err(err) => {
                tracing::warn!(
                    endpoint = "nearbysearch",
                    location = %location,
                    radius_m,
                    category,
                    keyword = keyword.unwrap_or("-"),
                    open_now,
                    error = %err,
                    "places search failed"
                );
                Err(err)
            }
        }
    }

    /// Free-text search biased to `radius_m` around `origin`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or timeout.
    /// - [`PlacesError::UnexpectedStatus`] on a non-2xx response.
    /// - [`PlacesError::Deserialize`] if the body is not the expected JSON.
    pub async fn text_search(
        &self,
        origin: Coordinate,
        radius_m: u32,
        query: &str,
        open_now: bool,
        cap: usize,
    ) -> Result<Vec<RawPlace>, PlacesError> {
        let location = origin.to_query_value();
        let radius = radius_m.to_string();
        let mut params = vec![
            ("query", query),
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("language", self.language.as_str()),
            ("region", self.region.as_str()),
        ];
        if open_now {
            params.push(("opennow", "true"));
        }

        let url = self.build_url(TEXT_PATH, &params);
        match self.fetch("textsearch", url).await {
            Ok(response) => {
                tracing::info!(
                    endpoint = "textsearch",
                    status = response.status.as_deref().unwrap_or("-"),
                    error_message = response.error_message.as_deref().unwrap_or("-"),
                    location = %location,
                    radius_m,
                    query,
                    open_now,
                    language = %self.language,
                    region = %self.region,
                    results = response.results.len(),
                    "places search completed"
                );
                Ok(truncate_results(&response.results, cap))
            }
            Err(err) => {
                tracing::warn!(
                    endpoint = "textsearch",
                    location = %location,
                    radius_m,
                    query,
                    open_now,
                    error = %err,
                    "places search failed"
                );
                Err(err)
            }
        }
    }

    /// Builds the request URL with `key` first and every value
    /// percent-encoded.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{path}", self.base_url.path()));
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends the GET, requires a 2xx status, and parses the envelope.
    ///
    /// Errors never carry the request URL, since it contains the API key.
    async fn fetch(&self, endpoint: &'static str, url: Url) -> Result<PlacesResponse, PlacesError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PlacesError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PlacesError::Http(e.without_url()))?;
        let envelope: PlacesResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: endpoint.to_owned(),
                source: e,
            })?;

        if let Some(status) = envelope.status.as_deref() {
            if status != "OK" && status != "ZERO_RESULTS" {
                tracing::warn!(
                    endpoint,
                    status,
                    error_message = envelope.error_message.as_deref().unwrap_or("-"),
                    "places API reported a non-OK status"
                );
            }
        }
        Ok(envelope)
    }
}

fn truncate_results(results: &[serde_json::Value], cap: usize) -> Vec<RawPlace> {
    results
        .iter()
        .take(cap)
        .map(RawPlace::from_json)
        .collect()
}
