//! # rhythm_core
//!
//! Core domain logic for Rhythm.

pub mod auth;
pub mod models;
pub mod payment;
pub mod repository;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
