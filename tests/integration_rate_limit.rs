mod common;

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::StatusCode;
use common::{json_request, test_state};
use gourze::gourze_config::RateLimitConfig;
use gourze::router::init_router;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn signin_from(addr: SocketAddr) -> axum::http::Request<axum::body::Body> {
    let mut request = json_request(
        "POST",
        "/api/auth/signin",
        None,
        json!({ "usernameOrEmail": "nobody", "password": "password123" }),
    );
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

#[sqlx::test(migrations = "./migrations")]
async fn test_auth_rate_limit_exceeded(pool: PgPool) {
    let config = RateLimitConfig {
        enabled: true,
        auth_per_second: 60,
        auth_burst_size: 1,
    };
    let app = init_router(test_state(pool, config));
    let client: SocketAddr = "192.168.1.100:40000".parse().unwrap();

    let first = app.clone().oneshot(signin_from(client)).await.unwrap();
    assert_eq!(first.status(), StatusCode::UNAUTHORIZED);

    let second = app.clone().oneshot(signin_from(client)).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    // Buckets are per peer IP.
    let other: SocketAddr = "192.168.1.101:40000".parse().unwrap();
    let third = app.oneshot(signin_from(other)).await.unwrap();
    assert_eq!(third.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rate_limit_only_covers_auth(pool: PgPool) {
    let config = RateLimitConfig {
        enabled: true,
        auth_per_second: 60,
        auth_burst_size: 1,
    };
    let app = init_router(test_state(pool, config));

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/courses")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
