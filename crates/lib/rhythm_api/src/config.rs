//! API server configuration.

use std::fmt;

use rhythm_core::auth::jwt::resolve_jwt_secret;

/// Default currency for payment intents.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:5000").
    pub bind_addr: String,
    /// PostgreSQL connection URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Payment processor secret key.
    pub payment_secret_key: Option<String>,
    /// Override for the payment processor API base URL.
    pub payment_api_base: Option<String>,
    /// ISO currency code for payment intents.
    pub currency: String,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("jwt_secret", &"<redacted>")
            .field(
                "payment_secret_key",
                &self.payment_secret_key.as_ref().map(|_| "<redacted>"),
            )
            .field("payment_api_base", &self.payment_api_base)
            .field("currency", &self.currency)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                    | Default                          |
    /// |-----------------------------|----------------------------------|
    /// | `BIND_ADDR`                 | `0.0.0.0:$PORT`                  |
    /// | `PORT`                      | `5000`                           |
    /// | `DATABASE_URL`              | unset (in-memory store)          |
    /// | `ACCESS_TOKEN_SECRET` / `JWT_SECRET` | generated & persisted to file |
    /// | `PAYMENT_SECRET_KEY`        | unset (payments disabled)        |
    /// | `PAYMENT_API_BASE`          | processor default                |
    /// | `PAYMENT_CURRENCY`          | `usd`                            |
    pub fn from_env() -> Self {
        let port = non_empty_var("PORT").unwrap_or_else(|| "5000".into());
        Self {
            bind_addr: non_empty_var("BIND_ADDR").unwrap_or_else(|| format!("0.0.0.0:{port}")),
            database_url: non_empty_var("DATABASE_URL"),
            jwt_secret: resolve_jwt_secret(),
            payment_secret_key: non_empty_var("PAYMENT_SECRET_KEY"),
            payment_api_base: non_empty_var("PAYMENT_API_BASE"),
            currency: non_empty_var("PAYMENT_CURRENCY")
                .map(|c| c.to_lowercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.into()),
        }
    }

    /// Minimal configuration for tests: in-memory store, fixed secret.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".into(),
            database_url: None,
            jwt_secret: jwt_secret.into(),
            payment_secret_key: None,
            payment_api_base: None,
            currency: DEFAULT_CURRENCY.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let mut config = ApiConfig::for_tests("super-secret-value");
        config.payment_secret_key = Some("sk_test_hidden".into());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(!rendered.contains("sk_test_hidden"));
        assert!(rendered.contains("127.0.0.1:0"));
    }
}
