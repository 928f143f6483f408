// Local proxy for the football-data.org API.
//
// Exposes the two read-only endpoints the viewer consumes and forwards them
// upstream with the server-held credential attached. Success bodies are
// relayed unchanged; any upstream failure collapses into a uniform 500
// envelope so callers never see upstream specifics beyond the detail
// message. The credential itself stays inside the upstream client.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::upstream::{UpstreamClient, UpstreamError};

// ---------------------------------------------------------------------------
// State and wire types
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct ProxyState {
    pub upstream: Arc<UpstreamClient>,
}

/// Uniform failure envelope returned for any upstream error.
#[derive(Debug, Serialize, Deserialize)]
pub struct FailureBody {
    pub error: String,
    pub details: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the proxy router. CORS is wide open: the proxy serves read-only
/// public data and runs on localhost.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/api/competitions", get(list_competitions))
        .route("/api/competitions/:id/standings", get(competition_standings))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the proxy on an already-bound listener until the task is aborted.
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: ProxyState,
) -> anyhow::Result<()> {
    let local_addr = listener.local_addr()?;
    info!("Proxy server listening on {local_addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_competitions(
    State(state): State<ProxyState>,
) -> Result<Json<Value>, (StatusCode, Json<FailureBody>)> {
    match state.upstream.competitions().await {
        Ok(body) => Ok(Json(body)),
        Err(e) => Err(failure(e)),
    }
}

async fn competition_standings(
    Path(id): Path<u64>,
    State(state): State<ProxyState>,
) -> Result<Json<Value>, (StatusCode, Json<FailureBody>)> {
    match state.upstream.standings(id).await {
        Ok(body) => Ok(Json(body)),
        Err(e) => Err(failure(e)),
    }
}

/// Convert an upstream error into the uniform failure response, logging the
/// detail. The error's Display never contains the credential.
fn failure(err: UpstreamError) -> (StatusCode, Json<FailureBody>) {
    error!("API error: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(FailureBody {
            error: "Failed to fetch data".to_string(),
            details: err.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::upstream::FootballDataClient;

    fn disabled_router() -> Router {
        router(ProxyState {
            upstream: Arc::new(UpstreamClient::Disabled),
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Spawn a stub upstream serving canned bodies for the two v4 routes.
    /// Returns its base URL.
    async fn spawn_stub_upstream(competitions: Value, standings: Value) -> String {
        let stub = Router::new()
            .route(
                "/v4/competitions",
                get(move || {
                    let body = competitions.clone();
                    async move { Json(body) }
                }),
            )
            .route(
                "/v4/competitions/:id/standings",
                get(move |Path(_id): Path<u64>| {
                    let body = standings.clone();
                    async move { Json(body) }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, stub).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn competitions_failure_returns_uniform_envelope() {
        let response = disabled_router()
            .oneshot(
                Request::builder()
                    .uri("/api/competitions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to fetch data");
        assert_eq!(
            body["details"],
            "football-data.org API key not configured"
        );
    }

    #[tokio::test]
    async fn standings_failure_returns_uniform_envelope() {
        let response = disabled_router()
            .oneshot(
                Request::builder()
                    .uri("/api/competitions/2021/standings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to fetch data");
    }

    #[tokio::test]
    async fn failure_envelope_never_contains_credential() {
        let secret = "super-secret-token";
        // Point an active client at a closed port so the request fails at
        // the transport layer.
        let upstream = UpstreamClient::Active(FootballDataClient::new(
            "http://127.0.0.1:1".to_string(),
            secret.to_string(),
        ));
        let app = router(ProxyState {
            upstream: Arc::new(upstream),
        });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/competitions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        let text = body.to_string();
        assert!(!text.contains(secret), "credential leaked: {text}");
        assert_eq!(body["error"], "Failed to fetch data");
    }

    #[tokio::test]
    async fn success_bodies_are_relayed_unchanged() {
        let competitions = serde_json::json!({
            "count": 1,
            "competitions": [
                { "id": 2021, "name": "Premier League", "code": "PL",
                  "area": { "name": "England" } }
            ]
        });
        let standings = serde_json::json!({
            "standings": [
                { "type": "TOTAL", "table": [] }
            ]
        });
        let base = spawn_stub_upstream(competitions.clone(), standings.clone()).await;

        let upstream =
            UpstreamClient::Active(FootballDataClient::new(base, "test-key".to_string()));
        let app = router(ProxyState {
            upstream: Arc::new(upstream),
        });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/competitions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, competitions);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/competitions/2021/standings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, standings);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = disabled_router()
            .oneshot(
                Request::builder()
                    .uri("/api/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
