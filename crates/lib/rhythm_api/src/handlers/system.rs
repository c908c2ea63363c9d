//! Liveness and health endpoints.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::AppState;
use crate::error::AppError;
use crate::models::HealthResponse;

/// `GET /` - liveness string.
pub async fn root_handler() -> &'static str {
    "Server is running"
}

/// `GET /health` - reports whether the document store answers.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = match state.repo.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("store ping failed: {e}");
            false
        }
    };
    Json(HealthResponse {
        version: rhythm_core::version().to_string(),
        store: state.repo.backend().to_string(),
        store_connected,
    })
}

/// Unknown paths. Set on the merged router so unmatched requests never pass
/// through a gated sub-router's middleware.
pub async fn not_found_handler() -> AppError {
    AppError::NotFound("route not found".into())
}
