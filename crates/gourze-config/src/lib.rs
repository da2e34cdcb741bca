//! # Gourze Config
//!
//! Configuration structs for the Gourze API. Each one reads its own
//! environment variables in `from_env()` and falls back to defaults, so a
//! missing variable never aborts startup; consumers decide whether an empty
//! value is fatal (an empty `JWT_SECRET` makes token issuing fail).

pub mod cdn;
pub mod cors;
pub mod jwt;
pub mod rate_limit;

pub use cdn::BunnyConfig;
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;

use std::str::FromStr;

/// Reads and parses an environment variable, falling back to `default`.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
