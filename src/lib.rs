//! # Gourze API
//!
//! Backend for a course marketplace, built with Axum and PostgreSQL.
//! Instructors publish courses split into chapters, students buy them
//! through orders, and paid orders enroll the buyer. Photos are stored on
//! a CDN; videos are uploaded straight from the client with TUS.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Token authentication and role gates
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Sign-in, sign-up, refresh, sign-out
//! │   ├── users/       # User administration
//! │   ├── media/       # Photo uploads, TUS video uploads
//! │   ├── categories/  # Course categories
//! │   ├── courses/     # Courses
//! │   ├── chapters/    # Chapters of a course
//! │   └── orders/      # Orders and enrollment
//! ├── docs.rs           # OpenAPI document
//! ├── router.rs         # Route tree and global layers
//! └── state.rs          # Shared application state
//! ```
//!
//! Each feature module has the same layout:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: database and business logic
//! - `router.rs`: the module's routes
//!
//! Entities and DTOs live in `gourze-models`.
//!
//! ## Roles
//!
//! | Role | Access |
//! |------|--------|
//! | `super` | Everything |
//! | `admin` | Everything |
//! | `generic` | Own profile, own courses, own orders |
//!
//! Roles are not ranked: a route lists the exact roles it admits.
//!
//! ## Authentication
//!
//! Sign-in returns an access token (1 hour) and a refresh token (7 days),
//! both in the body and as `accessToken` / `refreshToken` HTTP-only
//! cookies. Requests may authenticate with either the cookie or an
//! `Authorization: Bearer` header; the cookie wins when both are sent.
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use gourze_auth;
pub use gourze_cdn;
pub use gourze_config;
pub use gourze_core;
pub use gourze_db;
pub use gourze_models;
