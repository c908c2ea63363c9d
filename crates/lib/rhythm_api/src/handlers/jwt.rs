//! Token issuance handler.

use axum::extract::State;

use rhythm_core::models::auth::IdentityClaims;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::Json;
use crate::models::TokenResponse;
use crate::services::auth;

/// `POST /jwt` - sign the presented identity claims.
pub async fn issue_token_handler(
    State(state): State<AppState>,
    Json(body): Json<IdentityClaims>,
) -> AppResult<Json<TokenResponse>> {
    Ok(Json(auth::issue_token(&state.tokens, body)?))
}
