use gourze_auth::UserRole;
use gourze_core::hash_password;
use sqlx::PgPool;

/// Creates a super user. Super users can only be created from the CLI.
pub async fn create_super_user(
    db: &PgPool,
    username: &str,
    email: &str,
    full_name: &str,
    password: &str,
) -> Result<i64, Box<dyn std::error::Error>> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".into());
    }

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, email, full_name, password, role)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT DO NOTHING
         RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(full_name)
    .bind(&hashed_password)
    .bind(UserRole::Super.as_str())
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| "A user with this username or email already exists".into())
}
