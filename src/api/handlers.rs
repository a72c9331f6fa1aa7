//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::Json,
};
use tracing::{debug, error, info};

use super::responses::{ControlRequest, ControlResponse, HealthResponse, StatusResponse};
use crate::state::AppState;

type Rejection = (StatusCode, String);

/// Handle POST /control - Press the control trigger
///
/// An empty body counts as a pointer click. Any other body must be a JSON
/// `ControlRequest`, so a forwarded repeat flag is never lost.
pub async fn control_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ControlResponse>, Rejection> {
    let request = control_request(&headers, &body).inspect_err(|(status, reason)| {
        debug!("Rejected control request ({}): {}", status, reason);
    })?;

    match state.press(request.into()).await {
        Ok(outcome) => {
            if outcome.accepted {
                info!("Control endpoint called - timer moved to {:?}", outcome.snapshot.phase);
            }
            Ok(Json(outcome.into()))
        }
        Err(e) => {
            error!("Failed to press control: {}", e);
            Err((StatusCode::SERVICE_UNAVAILABLE, e.to_string()))
        }
    }
}

fn control_request(headers: &HeaderMap, body: &Bytes) -> Result<ControlRequest, Rejection> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ControlRequest::default());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"));
    if !is_json {
        return Err((
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    }

    Json::<ControlRequest>::from_bytes(body)
        .map(|Json(request)| request)
        .map_err(|rejection| (rejection.status(), rejection.body_text()))
}

/// Handle GET /status - Return the current timer snapshot
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.snapshot(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
