//! Business logic behind the handlers.
//!
//! Handlers extract and respond; services enforce the resource rules and
//! talk to the repository.

pub mod auth;
pub mod carts;
pub mod classes;
pub mod payments;
pub mod users;
