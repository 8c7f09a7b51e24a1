//! HTTP gateway (Axum) exposing scoring and profile analysis.
//!
//! This module is primarily used by the `skillmatch` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{analyze_handler, scores_handler};
pub use payload::ScoreRequest;
pub use state::HandlerState;

/// Response header carrying the request outcome.
pub const STATUS_HEADER: &str = "x-skillmatch-status";

pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_READY: &str = "ready";
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_SCORED: &str = "scored";
pub const STATUS_EMPTY: &str = "empty";
pub const STATUS_ANALYZED: &str = "analyzed";

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/scores", post(scores_handler))
        .route("/v1/analyze", post(analyze_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub competencies: &'static str,
    pub jobs: &'static str,
    pub vector_cache: &'static str,
    pub embedder_mode: &'static str,
    pub generation: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(STATUS_HEALTHY));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let loaded = |empty: bool| if empty { "empty" } else { STATUS_READY };

    let components = ComponentStatus {
        http: STATUS_READY,
        competencies: loaded(state.engine.competencies().is_empty()),
        jobs: loaded(state.engine.jobs().is_empty()),
        vector_cache: if state.engine.cache().is_warm() {
            STATUS_READY
        } else {
            STATUS_PENDING
        },
        embedder_mode: state.embedder_mode,
        generation: if state.advisor.generator().is_available() {
            STATUS_READY
        } else {
            "unavailable"
        },
    };

    // Generation is optional: advice degrades to a notice without it.
    let is_ready = components.competencies == STATUS_READY
        && components.jobs == STATUS_READY
        && components.vector_cache == STATUS_READY;

    let (status_code, status_msg) = if is_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, STATUS_PENDING)
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        STATUS_HEADER,
        HeaderValue::from_static(if is_ready { STATUS_READY } else { STATUS_PENDING }),
    );

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
