use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use gourze_cdn::{BunnyProvider, MediaProvider};
use gourze_config::{BunnyConfig, CorsConfig, JwtConfig, RateLimitConfig};
use gourze_db::{PgPool, init_db_pool, run_migrations};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub bunny_config: BunnyConfig,
    pub media: Arc<dyn MediaProvider>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("cors_config", &self.cors_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .field("media", &self.media.name())
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    let db = init_db_pool(&database_url, max_connections)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&db)
        .await
        .context("Failed to run database migrations")?;

    let bunny_config = BunnyConfig::from_env();
    let media: Arc<dyn MediaProvider> = Arc::new(BunnyProvider::new(bunny_config.clone()));

    Ok(AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        bunny_config,
        media,
    })
}
