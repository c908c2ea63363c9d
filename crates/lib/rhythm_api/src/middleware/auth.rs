//! Access control gate: bearer token verification, role checks against the
//! stored user record, and ownership checks.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use rhythm_core::models::auth::TokenClaims;
use rhythm_core::models::user::Role;
use rhythm_core::repository::Repository;

use crate::AppState;
use crate::error::{AppError, AppResult};

/// Verified token claims, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

impl AuthenticatedUser {
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("unauthorized access".into())
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            debug!("no authorization header");
            unauthorized()
        })?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            debug!("authorization header is not a bearer token");
            unauthorized()
        })?;
    Ok(token)
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
    let token = bearer_token(headers)?;
    let claims = state.tokens.verify(token).map_err(|e| {
        debug!("token rejected: {e}");
        unauthorized()
    })?;
    Ok(AuthenticatedUser(claims))
}

/// Axum middleware: requires a valid bearer token and injects
/// `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Axum middleware: anonymous requests pass through; a request that does
/// present credentials must present valid ones.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.headers().contains_key(AUTHORIZATION) {
        let user = authenticate(&state, request.headers())?;
        request.extensions_mut().insert(user);
    }
    Ok(next.run(request).await)
}

/// Axum middleware: the caller's stored role must be `admin`. Runs after
/// [`require_auth`].
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(unauthorized)?;
    require_role(&state.repo, user.email(), Role::Admin).await?;
    Ok(next.run(request).await)
}

/// The role is read from the user record on every call, so promotions and
/// demotions apply to tokens issued before them.
pub async fn require_role(repo: &Repository, email: &str, required: Role) -> AppResult<()> {
    let role = repo
        .find_user_by_email(email)
        .await?
        .map(|user| user.role)
        .unwrap_or_default();
    if role != required {
        warn!(email, ?role, ?required, "role check failed");
        return Err(AppError::Forbidden("forbidden message".into()));
    }
    Ok(())
}

/// Owner-scoped endpoints only serve the caller's own email.
pub fn ensure_owner(user: &AuthenticatedUser, requested_email: &str) -> AppResult<()> {
    if user.email() != requested_email {
        warn!(
            caller = user.email(),
            requested = requested_email,
            "ownership check failed"
        );
        return Err(AppError::Forbidden("forbidden access".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::Map;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_requires_scheme_and_value() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert!(bearer_token(&HeaderMap::new()).is_err());
        assert!(bearer_token(&headers("Basic dXNlcjpwdw==")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
        assert!(bearer_token(&headers("abc.def")).is_err());
    }

    #[test]
    fn ownership_compares_emails_exactly() {
        let user = AuthenticatedUser(TokenClaims {
            email: "a@x.com".into(),
            iat: 0,
            exp: 0,
            extra: Map::new(),
        });
        assert!(ensure_owner(&user, "a@x.com").is_ok());
        assert!(matches!(
            ensure_owner(&user, "b@x.com"),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_owner(&user, "A@x.com").is_err());
    }
}
