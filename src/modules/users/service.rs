use anyhow::{Context, anyhow};
use gourze_auth::UserRole;
use gourze_core::{AppError, ListQuery, hash_password};
use gourze_db::{PgPool, fetch_page, map_write_error};
use gourze_models::{CreateUserDto, USER_COLUMNS, UpdateUserDto, User, UserWithPassword};
use tracing::instrument;

const DUPLICATE_USER: &str = "Username or email is already taken";

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let role = dto.role.unwrap_or_default();
        Self::insert(db, &dto.username, &dto.email, &dto.full_name, &dto.password, role).await
    }

    /// Hashes `password` and inserts the user with empty meta.
    pub(crate) async fn insert(
        db: &PgPool,
        username: &str,
        email: &str,
        full_name: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        let password_hash = hash_password(password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, full_name, password, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(db)
        .await
        .map_err(|e| map_write_error(e, DUPLICATE_USER))?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn list_users(db: &PgPool, query: &ListQuery) -> Result<(Vec<User>, i64), AppError> {
        let page = fetch_page(db, "users", USER_COLUMNS, query)
            .await
            .context("Failed to fetch users")?;
        Ok(page)
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user by ID")?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Credentials lookup for sign-in.
    #[instrument(skip(db))]
    pub async fn find_with_password(
        db: &PgPool,
        username_or_email: &str,
    ) -> Result<Option<UserWithPassword>, AppError> {
        let user = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE username = $1 OR email = $1"
        ))
        .bind(username_or_email)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user credentials")?;

        Ok(user)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_user(db: &PgPool, id: i64, dto: UpdateUserDto) -> Result<User, AppError> {
        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                username = COALESCE($1, username), \
                email = COALESCE($2, email), \
                full_name = COALESCE($3, full_name), \
                password = COALESCE($4, password), \
                role = COALESCE($5, role), \
                meta = COALESCE($6, meta), \
                updated_at = NOW() \
             WHERE id = $7 RETURNING {USER_COLUMNS}"
        ))
        .bind(dto.username)
        .bind(dto.email)
        .bind(dto.full_name)
        .bind(password_hash)
        .bind(dto.role.map(|r| r.as_str()))
        .bind(dto.meta)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_write_error(e, DUPLICATE_USER))?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to delete user")?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }
}
