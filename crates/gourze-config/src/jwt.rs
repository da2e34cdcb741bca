use std::env;

use crate::env_or;

pub const DEFAULT_ISSUER: &str = "gourze";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// Shared HS256 secret. Empty means tokens cannot be issued.
    pub secret: String,
    pub issuer: String,
    /// Seconds.
    pub access_token_expiry: i64,
    /// Seconds.
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET").unwrap_or_default(),
            issuer: DEFAULT_ISSUER.to_string(),
            access_token_expiry: env_or("JWT_ACCESS_EXPIRY", 3600), // 1 hour
            refresh_token_expiry: env_or("JWT_REFRESH_EXPIRY", 604800), // 7 days
        }
    }

    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }
}
