//! Cart listing and mutation.

use rhythm_core::models::DocumentId;
use rhythm_core::models::cart::{CartItem, NewCartItem};
use rhythm_core::repository::Repository;
use rhythm_core::store::{DeleteResult, InsertOneResult};

use crate::error::AppResult;
use crate::middleware::auth::{AuthenticatedUser, ensure_owner};

/// The caller's cart. No email means an empty cart, not an error.
pub async fn list_cart(
    repo: &Repository,
    caller: &AuthenticatedUser,
    email: Option<&str>,
) -> AppResult<Vec<CartItem>> {
    let Some(email) = email else {
        return Ok(Vec::new());
    };
    ensure_owner(caller, email)?;
    Ok(repo.list_cart_items(email).await?)
}

pub async fn add_to_cart(repo: &Repository, item: NewCartItem) -> AppResult<InsertOneResult> {
    let item = item.into_item()?;
    Ok(repo.insert_cart_item(&item).await?)
}

pub async fn remove_from_cart(repo: &Repository, id: &str) -> AppResult<DeleteResult> {
    let id: DocumentId = id.parse()?;
    Ok(repo.delete_cart_item(&id).await?)
}
