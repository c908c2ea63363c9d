//! Instructor request handlers.

use axum::Json;
use axum::extract::State;

use rhythm_core::models::instructor::Instructor;

use crate::AppState;
use crate::error::AppResult;

/// `GET /instructors`
pub async fn list_instructors_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Instructor>>> {
    Ok(Json(state.repo.list_instructors().await?))
}
