//! Token issuing and verification.
//!
//! Access tokens are HS256 JWTs carrying the user id (`sub`), the role, the
//! issuer, and issue/expiry timestamps. They are self-contained: verifying
//! one never touches the database and there is no revocation list.
//!
//! Refresh tokens are separate JWTs with a longer expiry and a unique `jti`.
//! The two shapes are not interchangeable: an access token fails refresh
//! verification (no `jti`) and a refresh token fails access verification
//! (no `role`).
//!
//! # Example
//!
//! ```ignore
//! use gourze_auth::{UserRole, create_access_token, verify_token};
//! use gourze_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let issued = create_access_token(7, UserRole::Admin, &config)?;
//! let claims = verify_token(&issued.token, &config)?;
//! assert_eq!(claims.user_id(), Some(7));
//! ```

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use gourze_config::JwtConfig;

use crate::claims::{Claims, RefreshTokenClaims};
use crate::role::UserRole;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing secret is not configured")]
    MissingSecret,

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("invalid or expired token")]
    Invalid,
}

impl TokenError {
    /// Issuing failures are server faults; everything else is the caller's.
    pub fn is_signing_error(&self) -> bool {
        matches!(self, TokenError::MissingSecret | TokenError::Signing(_))
    }
}

/// A signed token and its expiry as a unix timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// A signed refresh token together with its `jti`, which the caller
/// records to detect reuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub jti: String,
    pub expires_at: i64,
}

pub fn create_access_token(
    user_id: i64,
    role: UserRole,
    jwt_config: &JwtConfig,
) -> Result<IssuedToken, TokenError> {
    let now = Utc::now().timestamp();
    let exp = now + jwt_config.access_token_expiry;

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        iss: jwt_config.issuer.clone(),
        iat: now,
        exp,
    };

    sign(&claims, jwt_config).map(|token| IssuedToken {
        token,
        expires_at: exp,
    })
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    verify(token, jwt_config)
}

pub fn create_refresh_token(
    user_id: i64,
    jwt_config: &JwtConfig,
) -> Result<IssuedRefreshToken, TokenError> {
    let now = Utc::now().timestamp();
    let exp = now + jwt_config.refresh_token_expiry;

    let claims = RefreshTokenClaims {
        sub: user_id.to_string(),
        iss: jwt_config.issuer.clone(),
        jti: Uuid::new_v4().to_string(),
        iat: now,
        exp,
    };

    let token = sign(&claims, jwt_config)?;
    Ok(IssuedRefreshToken {
        token,
        jti: claims.jti,
        expires_at: exp,
    })
}

pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshTokenClaims, TokenError> {
    verify(token, jwt_config)
}

fn sign<T: Serialize>(claims: &T, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    if jwt_config.secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

fn verify<T: serde::de::DeserializeOwned>(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<T, TokenError> {
    // An empty secret would accept tokens forged with an empty key.
    if jwt_config.secret.is_empty() {
        return Err(TokenError::Invalid);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[jwt_config.issuer.as_str()]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    decode::<T>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::Invalid)
}
