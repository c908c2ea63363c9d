//! User request handlers.

use axum::Extension;
use axum::extract::State;
use serde_json::{Value, json};

use rhythm_core::models::user::{NewUser, User};
use rhythm_core::store::DeleteResult;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{RegisterResponse, SuccessResponse};
use crate::services::users;

/// `GET /users` - all users. Admin only.
pub async fn list_users_handler(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(users::list_users(&state.repo).await?))
}

/// `POST /users` - register unless the email exists.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> AppResult<Json<RegisterResponse>> {
    Ok(Json(users::register(&state.repo, body).await?))
}

/// `PATCH /users/{role}/{id}` - grant a role.
pub async fn assign_role_handler(
    State(state): State<AppState>,
    Path((role, id)): Path<(String, String)>,
) -> AppResult<Json<SuccessResponse>> {
    Ok(Json(users::assign_role(&state.repo, &role, &id).await?))
}

/// `GET /users/{role}/{email}` - `{"<role>": bool}` for the caller.
pub async fn check_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((role, email)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    let check = users::role_check(&role)?;
    let holds = users::has_role(&state.repo, &user, check, &email).await?;
    Ok(Json(json!({ check.key(): holds })))
}

/// `DELETE /users/{id}`
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(users::delete_user(&state.repo, &id).await?))
}
