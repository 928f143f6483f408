// HTTP client for the local proxy.
//
// The coordinator never talks to football-data.org directly; it fetches
// through the proxy's `/api` surface, which is where the credential lives.
// Errors carry strings rather than transport types so fetch results can be
// compared in tests and shipped through channels unchanged.

use thiserror::Error;

use crate::models::{Competition, CompetitionList, StandingsResponse};
use crate::proxy::FailureBody;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned status {status}: {details}")]
    Server { status: u16, details: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// GatewayClient
// ---------------------------------------------------------------------------

/// Client for the proxy's read-only API.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a client for a proxy reachable at `base_url`
    /// (e.g. `http://127.0.0.1:8017`).
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch the available competitions.
    pub async fn list_competitions(&self) -> Result<Vec<Competition>, GatewayError> {
        let list: CompetitionList = self.get_json("/api/competitions").await?;
        Ok(list.competitions)
    }

    /// Fetch the standings for one competition.
    pub async fn standings(&self, competition_id: u64) -> Result<StandingsResponse, GatewayError> {
        self.get_json(&format!("/api/competitions/{competition_id}/standings"))
            .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Server {
                status: status.as_u16(),
                details: extract_details(&body),
            });
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.without_url().to_string()))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pull the `details` field out of the proxy's failure envelope, falling
/// back to the raw body for anything else that answered with an error.
fn extract_details(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<FailureBody>(body) {
        return envelope.details;
    }
    if body.trim().is_empty() {
        "no response body".to_string()
    } else {
        body.trim().to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
