//! Request authentication and per-route authorization.
//!
//! Every `/api` request passes through two stages:
//!
//! 1. [`auth::authenticate`] reads a token from the `accessToken` cookie or
//!    an `Authorization: Bearer` header and, if it verifies, attaches a
//!    [`auth::CurrentUser`] to the request extensions. It never rejects.
//! 2. A [`role::Gate`] layered on a route decides whether the request may
//!    reach the handler, rejecting with 401 `unauthorized` otherwise.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use crate::middleware::role::{Gate, authorize};
//!
//! let router = Router::new()
//!     .route("/", get(list_users))
//!     .route_layer(middleware::from_fn_with_state(Gate::STAFF, authorize));
//! ```
//!
//! Handlers that need the caller take a [`auth::CurrentUser`] (or
//! `Option<CurrentUser>` on routes open to guests).

pub mod auth;
pub mod role;
