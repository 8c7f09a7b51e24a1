use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::analysis::AnalysisRequest;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::ScoreRequest;
use crate::gateway::state::HandlerState;
use crate::gateway::{STATUS_ANALYZED, STATUS_EMPTY, STATUS_HEADER, STATUS_SCORED};

fn parse_body<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

pub(crate) fn make_response<T: Serialize>(status_tag: &'static str, body: &T) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(status_tag));
    (StatusCode::OK, headers, Json(body)).into_response()
}

#[instrument(skip(state, body), fields(inputs = tracing::field::Empty))]
pub async fn scores_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: ScoreRequest = parse_body(body)?;
    tracing::Span::current().record("inputs", request.inputs.len());

    let engine = Arc::clone(&state.engine);
    let report = tokio::task::spawn_blocking(move || engine.calculate_scores(&request.inputs))
        .await
        .map_err(|e| GatewayError::InternalError(format!("scoring task failed: {}", e)))??;

    let status_tag = if report.is_empty() {
        STATUS_EMPTY
    } else {
        STATUS_SCORED
    };
    debug!(status = status_tag, jobs = report.job_matches.len(), "Scores computed");

    Ok(make_response(status_tag, &report))
}

#[instrument(skip(state, body))]
pub async fn analyze_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: AnalysisRequest = parse_body(body)?;
    let analysis = state.analyzer.analyze(request).await?;
    Ok(make_response(STATUS_ANALYZED, &analysis))
}
