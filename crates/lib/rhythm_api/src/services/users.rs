//! User registration, role management and role checks.

use tracing::info;

use rhythm_core::models::DocumentId;
use rhythm_core::models::user::{NewUser, Role, RoleCheck, User};
use rhythm_core::repository::Repository;
use rhythm_core::store::{DeleteResult, StoreError};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{RegisterResponse, SuccessResponse};

pub async fn list_users(repo: &Repository) -> AppResult<Vec<User>> {
    Ok(repo.list_users().await?)
}

/// Register a user unless the email is already known. Re-registering is
/// not an error and leaves the stored record untouched.
pub async fn register(repo: &Repository, new_user: NewUser) -> AppResult<RegisterResponse> {
    let user = new_user.into_user()?;
    if repo.find_user_by_email(&user.email).await?.is_some() {
        info!(email = %user.email, "registration skipped, user exists");
        return Ok(RegisterResponse::existing());
    }
    match repo.insert_user(&user).await {
        Ok(result) => {
            info!(email = %user.email, id = %result.inserted_id, "registered user");
            Ok(RegisterResponse::Created(result))
        }
        // Lost a race with a concurrent registration for the same email.
        Err(StoreError::Conflict(_)) => Ok(RegisterResponse::existing()),
        Err(e) => Err(e.into()),
    }
}

/// Grant `admin` or `instructor`. The role is validated before the id and
/// before any storage access.
pub async fn assign_role(repo: &Repository, role: &str, id: &str) -> AppResult<SuccessResponse> {
    let role = Role::assignable(role)?;
    let id: DocumentId = id.parse()?;
    let result = repo.set_user_role(&id, role).await?;
    if result.matched_count == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }
    info!(%id, ?role, "role assigned");
    Ok(SuccessResponse { success: true })
}

/// Parse the role segment of `GET /users/{role}/{email}`.
pub fn role_check(raw: &str) -> AppResult<RoleCheck> {
    match raw {
        "admin" => Ok(RoleCheck::Admin),
        "instructor" => Ok(RoleCheck::Instructor),
        "student" => Ok(RoleCheck::Student),
        other => Err(AppError::NotFound(format!("no role check named '{other}'"))),
    }
}

/// Answer "does `email` hold this role?". Callers may only ask about
/// themselves; asking about someone else answers `false` without a lookup.
pub async fn has_role(
    repo: &Repository,
    caller: &AuthenticatedUser,
    check: RoleCheck,
    email: &str,
) -> AppResult<bool> {
    if caller.email() != email {
        return Ok(false);
    }
    let user = repo.find_user_by_email(email).await?;
    Ok(user.is_some_and(|u| check.matches(u.role)))
}

pub async fn delete_user(repo: &Repository, id: &str) -> AppResult<DeleteResult> {
    let id: DocumentId = id.parse()?;
    let result = repo.delete_user(&id).await?;
    info!(%id, deleted = result.deleted_count, "delete user");
    Ok(result)
}
