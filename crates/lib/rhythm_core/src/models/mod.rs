//! Domain models.
//!
//! Every persisted model keeps the store identifier under `_id` and carries a
//! flattened `extra` map so descriptive fields sent by clients survive a
//! round-trip through the store untouched.

pub mod auth;
pub mod cart;
pub mod class;
pub mod id;
pub mod instructor;
pub mod payment;
pub mod user;

use serde_json::{Map, Value};
use thiserror::Error;

pub use id::DocumentId;

/// Input validation errors raised before anything reaches storage.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Removes keys that only the server may set from a client-supplied map.
pub(crate) fn strip_reserved(extra: &mut Map<String, Value>, reserved: &[&str]) {
    for key in reserved {
        extra.remove(*key);
    }
}
