//! Class listing, authoring, moderation and seat bookkeeping.

use serde_json::{Map, Value};
use tracing::info;

use rhythm_core::models::DocumentId;
use rhythm_core::models::class::{
    Class, ClassStatus, Moderation, NewClass, SeatUpdate, validate_patch,
};
use rhythm_core::repository::Repository;
use rhythm_core::store::{DeleteResult, InsertOneResult, UpdateResult};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthenticatedUser, ensure_owner};

fn class_not_found() -> AppError {
    AppError::NotFound("Class not found".into())
}

/// Without an email every class is listed. With one, the caller must be
/// authenticated as that instructor.
pub async fn list_classes(
    repo: &Repository,
    caller: Option<&AuthenticatedUser>,
    email: Option<&str>,
) -> AppResult<Vec<Class>> {
    let Some(email) = email else {
        return Ok(repo.list_classes().await?);
    };
    let caller = caller.ok_or_else(|| AppError::Unauthorized("unauthorized access".into()))?;
    ensure_owner(caller, email)?;
    Ok(repo.list_classes_by_instructor(email).await?)
}

pub async fn get_class(repo: &Repository, id: &str) -> AppResult<Class> {
    let id: DocumentId = id.parse()?;
    repo.get_class(&id).await?.ok_or_else(class_not_found)
}

pub async fn create_class(repo: &Repository, new_class: NewClass) -> AppResult<InsertOneResult> {
    let class = new_class.into_class()?;
    let result = repo.insert_class(&class).await?;
    info!(id = %result.inserted_id, instructor = %class.instructor_email, "class created");
    Ok(result)
}

/// Generic field patch. A miss is reported as a zero count.
pub async fn patch_class(
    repo: &Repository,
    id: &str,
    patch: Map<String, Value>,
) -> AppResult<UpdateResult> {
    let id: DocumentId = id.parse()?;
    validate_patch(&patch)?;
    Ok(repo.patch_class(&id, patch).await?)
}

/// Approve or deny a class. Feedback is free text.
pub async fn moderate_class(
    repo: &Repository,
    id: &str,
    moderation: Moderation,
) -> AppResult<UpdateResult> {
    let status = ClassStatus::moderated(&moderation.status)?;
    let id: DocumentId = id.parse()?;
    let feedback = moderation
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());
    let result = repo.moderate_class(&id, status, feedback).await?;
    if result.matched_count == 0 {
        return Err(class_not_found());
    }
    info!(%id, status = status.as_str(), "class moderated");
    Ok(result)
}

pub async fn update_seats(
    repo: &Repository,
    id: &str,
    update: SeatUpdate,
) -> AppResult<UpdateResult> {
    let id: DocumentId = id.parse()?;
    let result = repo.set_available_seats(&id, update.available_seats).await?;
    if result.matched_count == 0 {
        return Err(class_not_found());
    }
    Ok(result)
}

pub async fn delete_class(repo: &Repository, id: &str) -> AppResult<DeleteResult> {
    let id: DocumentId = id.parse()?;
    let result = repo.delete_class(&id).await?;
    info!(%id, deleted = result.deleted_count, "delete class");
    Ok(result)
}
