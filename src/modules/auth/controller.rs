use anyhow::anyhow;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use gourze_core::{ApiResponse, AppError};
use gourze_models::{AuthResult, RefreshTokenDto, SignInDto, SignUpDto, User};
use tracing::instrument;

use crate::docs::ErrorResponse;
use crate::middleware::auth::{ACCESS_TOKEN_COOKIE, CurrentUser, REFRESH_TOKEN_COOKIE};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::AuthService;

fn token_cookie(name: &'static str, value: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(max_age_secs.max(0)))
        .build()
}

/// Stores both tokens as HTTP-only cookies living as long as the tokens.
fn with_token_cookies(jar: CookieJar, result: &AuthResult, now: i64) -> CookieJar {
    jar.add(token_cookie(
        ACCESS_TOKEN_COOKIE,
        result.access_token.clone(),
        result.access_token_expired_at - now,
    ))
    .add(token_cookie(
        REFRESH_TOKEN_COOKIE,
        result.refresh_token.clone(),
        result.refresh_token_expired_at - now,
    ))
}

fn clear_token_cookies(jar: CookieJar) -> CookieJar {
    jar.add(token_cookie(ACCESS_TOKEN_COOKIE, String::new(), 0))
        .add(token_cookie(REFRESH_TOKEN_COOKIE, String::new(), 0))
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Sign in with username or email
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SignInDto,
    responses(
        (status = 200, description = "Signed in; token cookies set", body = AuthResult),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<SignInDto>,
) -> Result<(CookieJar, ApiResponse<AuthResult>), AppError> {
    let result = AuthService::signin(&state.db, dto, &state.jwt_config).await?;
    let jar = with_token_cookies(jar, &result, now());
    Ok((jar, ApiResponse::with_message("Signed in successfully", result)))
}

/// Register a generic account and sign in
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignUpDto,
    responses(
        (status = 201, description = "Account created; token cookies set", body = AuthResult),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<SignUpDto>,
) -> Result<(StatusCode, CookieJar, ApiResponse<AuthResult>), AppError> {
    let result = AuthService::signup(&state.db, dto, &state.jwt_config).await?;
    let jar = with_token_cookies(jar, &result, now());
    let (status, body) = ApiResponse::created("Signed up successfully", result);
    Ok((status, jar, body))
}

/// Rotate the token pair
///
/// The refresh token is read from the `refreshToken` cookie, or from the
/// `refreshToken` field of an optional JSON body.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body(content = RefreshTokenDto, description = "Optional when the cookie is set"),
    responses(
        (status = 200, description = "New token pair; cookies replaced", body = AuthResult),
        (status = 401, description = "Missing, invalid, or expired refresh token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, ApiResponse<AuthResult>), AppError> {
    let from_cookie = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());

    let from_body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<RefreshTokenDto>(&body)
            .map_err(|_| AppError::bad_request(anyhow!("Invalid request body")))?
            .refresh_token
            .filter(|v| !v.is_empty())
    };

    let token = from_cookie
        .or(from_body)
        .ok_or_else(|| AppError::unauthorized(anyhow!("Refresh token is required")))?;

    let result = AuthService::refresh(&state.db, &token, &state.jwt_config).await?;
    let jar = with_token_cookies(jar, &result, now());
    Ok((jar, ApiResponse::with_message("Token refreshed successfully", result)))
}

/// Clear the token cookies
#[utoipa::path(
    post,
    path = "/api/auth/signout",
    responses((status = 200, description = "Refresh token revoked; token cookies cleared")),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn signout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<()>), AppError> {
    let refresh_token = jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string());
    AuthService::signout(&state.db, refresh_token.as_deref(), &state.jwt_config).await?;

    Ok((
        clear_token_cookies(jar),
        ApiResponse::with_message("Signed out successfully", ()),
    ))
}

/// The signed-in user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<ApiResponse<User>, AppError> {
    let user = UserService::get_user(&state.db, current_user.id).await?;
    Ok(ApiResponse::ok(user))
}
