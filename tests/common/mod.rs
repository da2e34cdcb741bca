use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use gourze::gourze_auth::{UserRole, create_access_token};
use gourze::gourze_cdn::{CdnError, CdnFuture, MediaProvider};
use gourze::gourze_config::{BunnyConfig, CorsConfig, JwtConfig, RateLimitConfig};
use gourze::gourze_core::hash_password;
use gourze::router::init_router;
use gourze::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;

pub const TEST_SECRET: &str = "test-secret-for-integration-tests";
#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "password123";

/// In-memory media provider; URLs point at a fake CDN host.
#[derive(Debug, Default)]
pub struct FakeMediaProvider;

impl MediaProvider for FakeMediaProvider {
    fn upload_file<'a>(
        &'a self,
        path: &'a str,
        _content: Vec<u8>,
        _content_type: &'a str,
    ) -> CdnFuture<'a, String> {
        Box::pin(async move { Ok(format!("https://cdn.test/{path}")) })
    }

    fn create_video<'a>(
        &'a self,
        _title: &'a str,
        _collection: Option<&'a str>,
    ) -> CdnFuture<'a, String> {
        Box::pin(async { Ok("video-123".to_string()) })
    }

    fn tus_signature(&self, video_id: &str, expires_at: u64) -> String {
        format!("sig-{video_id}-{expires_at}")
    }

    fn library_id(&self) -> u64 {
        42
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Provider whose storage and stream calls always fail upstream.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct OfflineMediaProvider;

impl MediaProvider for OfflineMediaProvider {
    fn upload_file<'a>(
        &'a self,
        _path: &'a str,
        _content: Vec<u8>,
        _content_type: &'a str,
    ) -> CdnFuture<'a, String> {
        Box::pin(async {
            Err(CdnError::Status {
                status: 503,
                body: "storage zone offline".to_string(),
            })
        })
    }

    fn create_video<'a>(
        &'a self,
        _title: &'a str,
        _collection: Option<&'a str>,
    ) -> CdnFuture<'a, String> {
        Box::pin(async {
            Err(CdnError::Status {
                status: 503,
                body: "library offline".to_string(),
            })
        })
    }

    fn tus_signature(&self, _video_id: &str, _expires_at: u64) -> String {
        String::new()
    }

    fn library_id(&self) -> u64 {
        42
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

pub fn test_state(pool: PgPool, rate_limit_config: RateLimitConfig) -> AppState {
    AppState {
        db: pool,
        jwt_config: JwtConfig::with_secret(TEST_SECRET),
        cors_config: CorsConfig::default(),
        rate_limit_config,
        bunny_config: BunnyConfig::default(),
        media: Arc::new(FakeMediaProvider),
    }
}

#[allow(dead_code)]
pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool, RateLimitConfig::disabled()))
}

#[allow(dead_code)]
pub fn setup_app_with_media(pool: PgPool, media: Arc<dyn MediaProvider>) -> Router {
    let state = AppState {
        media,
        ..test_state(pool, RateLimitConfig::disabled())
    };
    init_router(state)
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

impl TestUser {
    pub fn token(&self) -> String {
        create_access_token(self.id, self.role, &JwtConfig::with_secret(TEST_SECRET))
            .unwrap()
            .token
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token())
    }
}

#[allow(dead_code)]
pub async fn create_test_user(pool: &PgPool, username: &str, role: UserRole) -> TestUser {
    let hashed = hash_password(TEST_PASSWORD).unwrap();
    let email = format!("{username}@test.com");

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, email, full_name, password, role)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(username)
    .bind(&email)
    .bind("Test User")
    .bind(hashed)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        username: username.to_string(),
        email,
        role,
    }
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
