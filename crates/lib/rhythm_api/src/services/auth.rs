//! Token issuance.

use tracing::info;

use rhythm_core::auth::jwt::TokenService;
use rhythm_core::models::auth::IdentityClaims;

use crate::error::{AppError, AppResult};
use crate::models::TokenResponse;

/// Sign the presented identity. Credentials are not checked here; the
/// client obtained this identity from the upstream identity provider.
pub fn issue_token(tokens: &TokenService, identity: IdentityClaims) -> AppResult<TokenResponse> {
    if identity.email.trim().is_empty() {
        return Err(AppError::Validation("email is required".into()));
    }
    let email = identity.email.clone();
    let token = tokens.issue(identity)?;
    info!(%email, "issued access token");
    Ok(TokenResponse { token })
}
