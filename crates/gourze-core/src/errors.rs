//! Application error type with HTTP response conversion.
//!
//! Every failure leaving a handler is an [`AppError`]: an HTTP status, a
//! stable machine-readable `code`, and the underlying [`anyhow::Error`].
//! Responses use the same envelope as successful calls, minus `data`:
//!
//! ```json
//! { "code": "not-found", "message": "Course not found" }
//! ```
//!
//! Server-side failures are logged and rendered with a generic message so
//! database or driver details never reach the client. Upstream (CDN)
//! failures are the exception: their message is surfaced as-is.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Machine-readable error codes carried in the `code` field.
pub mod codes {
    pub const OK: &str = "ok";
    pub const INVALID_PARAMS: &str = "invalid-params";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const NOT_FOUND: &str = "not-found";
    pub const CONFLICT: &str = "conflict";
    pub const UPSTREAM_ERROR: &str = "upstream-error";
    pub const INTERNAL_SERVER_ERROR: &str = "internal-server-error";
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, code: &'static str, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code,
            error: err.into(),
        }
    }

    /// Malformed or missing input. Maps to 400 `invalid-params`.
    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, codes::INVALID_PARAMS, err)
    }

    /// Missing, invalid, or insufficient identity. Maps to 401 `unauthorized`.
    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, codes::UNAUTHORIZED, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, codes::CONFLICT, err)
    }

    /// A call to an external collaborator (the CDN) failed.
    pub fn upstream<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::UPSTREAM_ERROR,
            err,
        )
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL_SERVER_ERROR,
            err,
        )
    }

    /// The message shown to the client.
    pub fn message(&self) -> String {
        if self.code == codes::INTERNAL_SERVER_ERROR {
            return "Internal server error".to_string();
        }
        self.error.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code, error = ?self.error, "Request failed");
        }

        let body = Json(json!({
            "code": self.code,
            "message": self.message(),
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
