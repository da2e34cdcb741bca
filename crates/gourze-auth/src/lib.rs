//! # Gourze Auth
//!
//! Identity primitives for the Gourze API:
//!
//! - [`role`]: the closed [`UserRole`] enumeration
//! - [`claims`]: access and refresh token claim structures
//! - [`jwt`]: issuing and verifying tokens, failing with [`TokenError`]

pub mod claims;
pub mod jwt;
pub mod role;

pub use claims::{Claims, RefreshTokenClaims};
pub use jwt::{
    IssuedRefreshToken, IssuedToken, TokenError, create_access_token, create_refresh_token,
    verify_refresh_token, verify_token,
};
pub use role::{ParseRoleError, UserRole};
