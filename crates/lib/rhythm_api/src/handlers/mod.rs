//! Request handlers.

pub mod carts;
pub mod classes;
pub mod instructors;
pub mod jwt;
pub mod payments;
pub mod system;
pub mod users;
