//! Route paths.
//!
//! Parameter names must agree at each position across paths that share a
//! prefix, so `/users/{key}` and `/users/{key}/{target}` reuse `key`.

pub const ROOT: &str = "/";
pub const HEALTH: &str = "/health";
pub const JWT: &str = "/jwt";

pub const USERS: &str = "/users";
/// `DELETE`: key is the user id.
pub const USER: &str = "/users/{key}";
/// `GET`: key is the role to check, target the email.
/// `PATCH`: key is the role to grant, target the user id.
pub const USER_ROLE: &str = "/users/{key}/{target}";

pub const CLASSES: &str = "/classes";
pub const CLASS: &str = "/classes/{id}";
pub const CLASS_STATUS: &str = "/classes/{id}/status";
pub const CLASS_SEATS: &str = "/classes/{id}/seats";
/// Legacy alias of `PATCH /classes/{id}`.
pub const UPDATE_CLASS: &str = "/updateClass/{id}";

pub const INSTRUCTORS: &str = "/instructors";

pub const CARTS: &str = "/carts";
pub const CART: &str = "/carts/{id}";

pub const CREATE_PAYMENT_INTENT: &str = "/create-payment-intent";
pub const PAYMENT: &str = "/payment";
