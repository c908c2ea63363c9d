//! Cart request handlers.

use axum::Extension;
use axum::extract::State;

use rhythm_core::models::cart::{CartItem, NewCartItem};
use rhythm_core::store::{DeleteResult, InsertOneResult};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::EmailQuery;
use crate::services::carts;

/// `GET /carts?email=` - the caller's cart.
pub async fn list_cart_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<EmailQuery>,
) -> AppResult<Json<Vec<CartItem>>> {
    Ok(Json(carts::list_cart(&state.repo, &user, query.email()).await?))
}

/// `POST /carts`
pub async fn add_to_cart_handler(
    State(state): State<AppState>,
    Json(body): Json<NewCartItem>,
) -> AppResult<Json<InsertOneResult>> {
    Ok(Json(carts::add_to_cart(&state.repo, body).await?))
}

/// `DELETE /carts/{id}`
pub async fn remove_from_cart_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(carts::remove_from_cart(&state.repo, &id).await?))
}
