//! Class request handlers.

use axum::Extension;
use axum::extract::State;
use serde_json::{Map, Value};

use rhythm_core::models::class::{Class, Moderation, NewClass, SeatUpdate};
use rhythm_core::store::{DeleteResult, InsertOneResult, UpdateResult};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::EmailQuery;
use crate::services::classes;

/// `GET /classes[?email=]` - all classes, or the caller's own.
pub async fn list_classes_handler(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    Query(query): Query<EmailQuery>,
) -> AppResult<Json<Vec<Class>>> {
    let caller = user.as_ref().map(|Extension(u)| u);
    Ok(Json(
        classes::list_classes(&state.repo, caller, query.email()).await?,
    ))
}

/// `GET /classes/{id}`
pub async fn get_class_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Class>> {
    Ok(Json(classes::get_class(&state.repo, &id).await?))
}

/// `POST /classes`
pub async fn create_class_handler(
    State(state): State<AppState>,
    Json(body): Json<NewClass>,
) -> AppResult<Json<InsertOneResult>> {
    Ok(Json(classes::create_class(&state.repo, body).await?))
}

/// `PATCH /classes/{id}` (also `/updateClass/{id}`) - field patch.
pub async fn patch_class_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<Json<UpdateResult>> {
    Ok(Json(classes::patch_class(&state.repo, &id, body).await?))
}

/// `PATCH /classes/{id}/status` - moderation.
pub async fn moderate_class_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Moderation>,
) -> AppResult<Json<UpdateResult>> {
    Ok(Json(classes::moderate_class(&state.repo, &id, body).await?))
}

/// `PATCH /classes/{id}/seats`
pub async fn update_seats_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SeatUpdate>,
) -> AppResult<Json<UpdateResult>> {
    Ok(Json(classes::update_seats(&state.repo, &id, body).await?))
}

/// `DELETE /classes/{id}`
pub async fn delete_class_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(classes::delete_class(&state.repo, &id).await?))
}
