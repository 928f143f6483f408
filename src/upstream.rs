// HTTP client for the football-data.org v4 API.
//
// Holds the API credential and attaches it as the `X-Auth-Token` header on
// every request. Responses are returned as raw JSON values so the proxy can
// relay them byte-for-byte; the credential must never appear in errors or
// log output.

use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("upstream returned status {status}: {details}")]
    Status { status: u16, details: String },

    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    #[error("football-data.org API key not configured")]
    NotConfigured,
}

// ---------------------------------------------------------------------------
// FootballDataClient
// ---------------------------------------------------------------------------

/// Low-level client for the football-data.org API.
pub struct FootballDataClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FootballDataClient {
    /// Create a new client for the given base URL and API key.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Fetch the competition list: `GET {base}/v4/competitions`.
    pub async fn competitions(&self) -> Result<Value, UpstreamError> {
        self.get_json("/v4/competitions").await
    }

    /// Fetch the standings for one competition:
    /// `GET {base}/v4/competitions/{id}/standings`.
    pub async fn standings(&self, competition_id: u64) -> Result<Value, UpstreamError> {
        self.get_json(&format!("/v4/competitions/{competition_id}/standings"))
            .await
    }

    async fn get_json(&self, path: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header("X-Auth-Token", &self.api_key)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                details: extract_error_message(&body),
            });
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.without_url().to_string()))
    }
}

// ---------------------------------------------------------------------------
// UpstreamClient wrapper
// ---------------------------------------------------------------------------

/// High-level wrapper that is either an active client or disabled when no
/// API key is configured. A disabled client turns every call into a uniform
/// configuration error instead of sending unauthenticated requests upstream.
pub enum UpstreamClient {
    Active(FootballDataClient),
    Disabled,
}

impl UpstreamClient {
    /// Build an `UpstreamClient` from the application config.
    ///
    /// Returns `Active` if an API key is present in credentials, otherwise
    /// `Disabled`.
    pub fn from_config(config: &Config) -> Self {
        match &config.credentials.football_data_api_key {
            Some(key) if !key.is_empty() => UpstreamClient::Active(FootballDataClient::new(
                config.upstream.base_url.clone(),
                key.clone(),
            )),
            _ => UpstreamClient::Disabled,
        }
    }

    pub async fn competitions(&self) -> Result<Value, UpstreamError> {
        match self {
            UpstreamClient::Active(client) => client.competitions().await,
            UpstreamClient::Disabled => Err(UpstreamError::NotConfigured),
        }
    }

    pub async fn standings(&self, competition_id: u64) -> Result<Value, UpstreamError> {
        match self {
            UpstreamClient::Active(client) => client.standings(competition_id).await,
            UpstreamClient::Disabled => Err(UpstreamError::NotConfigured),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Extract a human-readable message from an upstream error body.
///
/// football-data.org error bodies look like
/// `{ "message": "...", "errorCode": 403 }`; fall back to the raw body
/// (or a placeholder) when that shape is absent.
pub(crate) fn extract_error_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        if let Some(message) = v.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        "no response body".to_string()
    } else {
        body.trim().to_string()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
