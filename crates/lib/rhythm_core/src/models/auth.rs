//! Identity token claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity payload handed over by the client at login.
///
/// The backend does not check credentials: whoever calls the issuance
/// endpoint gets a token for the email they present. Authentication happens
/// upstream with the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JWT claims embedded in access tokens. Role is not carried here; it is
/// resolved from the user record on every gated request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
