use anyhow::{Context, anyhow};
use axum::http::StatusCode;
use gourze_auth::{
    TokenError, UserRole, create_access_token, create_refresh_token, verify_refresh_token,
};
use gourze_config::JwtConfig;
use gourze_core::{AppError, verify_dummy_password, verify_password};
use gourze_db::PgPool;
use gourze_models::{AuthResult, SignInDto, SignUpDto, User};
use tracing::{instrument, warn};

use crate::metrics;
use crate::modules::users::service::UserService;

pub struct AuthService;

/// Signing failures are server misconfiguration; everything else means the
/// caller presented a bad token.
pub fn token_error(err: TokenError) -> AppError {
    if err.is_signing_error() {
        AppError::internal(err)
    } else {
        AppError::unauthorized(err)
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized(anyhow!("Invalid username/email or password"))
}

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(login = %dto.username_or_email))]
    pub async fn signin(
        db: &PgPool,
        dto: SignInDto,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResult, AppError> {
        let Some(found) = UserService::find_with_password(db, &dto.username_or_email).await?
        else {
            verify_dummy_password(&dto.password);
            metrics::track_user_login_failure("unknown_user");
            return Err(invalid_credentials());
        };

        if !verify_password(&dto.password, &found.password)? {
            warn!(user_id = found.user.id, "Sign-in with wrong password");
            metrics::track_user_login_failure("wrong_password");
            return Err(invalid_credentials());
        }

        metrics::track_user_login_success(found.user.role.as_str());
        Self::issue_tokens(db, found.user, jwt_config).await
    }

    /// Public registration always yields a generic account.
    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn signup(
        db: &PgPool,
        dto: SignUpDto,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResult, AppError> {
        let user = UserService::insert(
            db,
            &dto.username,
            &dto.email,
            &dto.full_name,
            &dto.password,
            UserRole::Generic,
        )
        .await?;

        metrics::track_user_signup();
        Self::issue_tokens(db, user, jwt_config).await
    }

    /// Exchanges a refresh token for a brand-new token pair. The role is
    /// re-read from the database.
    ///
    /// Each refresh token is accepted once. Presenting an already spent token
    /// revokes every outstanding refresh token of that user, so a stolen
    /// token and its legitimate holder both have to sign in again.
    #[instrument(skip_all)]
    pub async fn refresh(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResult, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config).map_err(token_error)?;
        let user_id = claims
            .user_id()
            .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid refresh token")))?;

        let consumed: Option<i64> = sqlx::query_scalar(
            "UPDATE refresh_tokens SET used_at = NOW() \
             WHERE jti = $1 AND user_id = $2 AND used_at IS NULL AND expires_at > NOW() \
             RETURNING user_id",
        )
        .bind(&claims.jti)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to consume refresh token")?;

        if consumed.is_none() {
            let reused: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM refresh_tokens WHERE jti = $1 AND used_at IS NOT NULL)",
            )
            .bind(&claims.jti)
            .fetch_one(db)
            .await
            .context("Failed to look up refresh token")?;

            if reused {
                warn!(user_id, "Spent refresh token presented again; revoking sessions");
                Self::revoke_all(db, user_id).await?;
            }
            return Err(AppError::unauthorized(anyhow!(
                "Refresh token is no longer valid"
            )));
        }

        let user = UserService::get_user(db, user_id)
            .await
            .map_err(|err| {
                if err.status == StatusCode::NOT_FOUND {
                    AppError::unauthorized(anyhow!("User no longer exists"))
                } else {
                    err
                }
            })?;

        Self::issue_tokens(db, user, jwt_config).await
    }

    /// Spends the presented refresh token, if it is a valid one.
    #[instrument(skip_all)]
    pub async fn signout(
        db: &PgPool,
        refresh_token: Option<&str>,
        jwt_config: &JwtConfig,
    ) -> Result<(), AppError> {
        let Some(claims) = refresh_token.and_then(|token| verify_refresh_token(token, jwt_config).ok())
        else {
            return Ok(());
        };

        sqlx::query("UPDATE refresh_tokens SET used_at = NOW() WHERE jti = $1 AND used_at IS NULL")
            .bind(&claims.jti)
            .execute(db)
            .await
            .context("Failed to revoke refresh token")?;
        Ok(())
    }

    async fn revoke_all(db: &PgPool, user_id: i64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE refresh_tokens SET used_at = NOW() WHERE user_id = $1 AND used_at IS NULL",
        )
        .bind(user_id)
        .execute(db)
        .await
        .context("Failed to revoke refresh tokens")?;
        Ok(())
    }

    /// Signs a new pair and records the refresh token's `jti`.
    pub async fn issue_tokens(
        db: &PgPool,
        user: User,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResult, AppError> {
        let access = create_access_token(user.id, user.role, jwt_config).map_err(token_error)?;
        let refresh = create_refresh_token(user.id, jwt_config).map_err(token_error)?;

        sqlx::query(
            "INSERT INTO refresh_tokens (jti, user_id, expires_at) VALUES ($1, $2, to_timestamp($3))",
        )
        .bind(&refresh.jti)
        .bind(user.id)
        .bind(refresh.expires_at as f64)
        .execute(db)
        .await
        .context("Failed to record refresh token")?;

        metrics::track_tokens_issued("access");
        metrics::track_tokens_issued("refresh");

        Ok(AuthResult {
            access_token: access.token,
            refresh_token: refresh.token,
            access_token_expired_at: access.expires_at,
            refresh_token_expired_at: refresh.expires_at,
            user,
        })
    }
}
