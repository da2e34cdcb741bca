mod common;

use axum::http::StatusCode;
use common::{TestUser, body_json, create_test_user, empty_request, json_request, setup_test_app};
use gourze::gourze_auth::UserRole;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

async fn seed_course(pool: &PgPool, author: &TestUser, name: &str, price: f64) -> i64 {
    sqlx::query_scalar("INSERT INTO courses (name, price, user_id) VALUES ($1, $2, $3) RETURNING id")
        .bind(name)
        .bind(price)
        .bind(author.id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn place_order(pool: &PgPool, buyer: &TestUser, items: Value) -> Value {
    let response = setup_test_app(pool.clone())
        .oneshot(json_request(
            "POST",
            "/api/orders",
            Some(&buyer.bearer()),
            json!({ "items": items }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_order_prices_items_from_courses(pool: PgPool) {
    let author = create_test_user(&pool, "author", UserRole::Generic).await;
    let buyer = create_test_user(&pool, "buyer", UserRole::Generic).await;
    let rust = seed_course(&pool, &author, "Rust", 10.0).await;
    let sql = seed_course(&pool, &author, "SQL", 2.5).await;

    let order = place_order(
        &pool,
        &buyer,
        json!([{ "courseId": rust, "quantity": 2 }, { "courseId": sql }]),
    )
    .await;

    assert_eq!(order["userId"], buyer.id);
    assert_eq!(order["status"], "unpaid");
    assert_eq!(order["amount"], 22.5);
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["items"][0]["price"], 10.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_order_rejects_unknown_course_and_empty_items(pool: PgPool) {
    let buyer = create_test_user(&pool, "buyer", UserRole::Generic).await;

    let response = setup_test_app(pool.clone())
        .oneshot(json_request(
            "POST",
            "/api/orders",
            Some(&buyer.bearer()),
            json!({ "items": [{ "courseId": 424242 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = setup_test_app(pool)
        .oneshot(json_request(
            "POST",
            "/api/orders",
            Some(&buyer.bearer()),
            json!({ "items": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_generic_users_only_see_their_own_orders(pool: PgPool) {
    let author = create_test_user(&pool, "author", UserRole::Generic).await;
    let alice = create_test_user(&pool, "alice", UserRole::Generic).await;
    let bob = create_test_user(&pool, "bob", UserRole::Generic).await;
    let admin = create_test_user(&pool, "site_admin", UserRole::Admin).await;
    let course = seed_course(&pool, &author, "Rust", 10.0).await;

    let alice_order = place_order(&pool, &alice, json!([{ "courseId": course }])).await;
    place_order(&pool, &bob, json!([{ "courseId": course }])).await;

    let response = setup_test_app(pool.clone())
        .oneshot(empty_request("GET", "/api/orders", Some(&alice.bearer())))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["meta"]["numItems"], 1);
    assert_eq!(body["data"][0]["userId"], alice.id);

    let response = setup_test_app(pool.clone())
        .oneshot(empty_request("GET", "/api/orders", Some(&admin.bearer())))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["meta"]["numItems"], 2);

    let response = setup_test_app(pool)
        .oneshot(empty_request(
            "GET",
            &format!("/api/orders/{}", alice_order["id"]),
            Some(&bob.bearer()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_paying_an_order_enrolls_the_buyer(pool: PgPool) {
    let author = create_test_user(&pool, "author", UserRole::Generic).await;
    let buyer = create_test_user(&pool, "buyer", UserRole::Generic).await;
    let admin = create_test_user(&pool, "site_admin", UserRole::Admin).await;
    let course = seed_course(&pool, &author, "Rust", 10.0).await;

    let order = place_order(&pool, &buyer, json!([{ "courseId": course, "quantity": 3 }])).await;
    let uri = format!("/api/orders/{}", order["id"]);

    let response = setup_test_app(pool.clone())
        .oneshot(json_request("PUT", &uri, Some(&buyer.bearer()), json!({ "status": "paid" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    for _ in 0..2 {
        let response = setup_test_app(pool.clone())
            .oneshot(json_request("PUT", &uri, Some(&admin.bearer()), json!({ "status": "paid" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["status"], "paid");
    }

    let enrolled: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM course_users WHERE user_id = $1 AND course_id = $2",
    )
    .bind(buyer.id)
    .bind(course)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(enrolled, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ordered_course_cannot_be_deleted(pool: PgPool) {
    let author = create_test_user(&pool, "author", UserRole::Generic).await;
    let buyer = create_test_user(&pool, "buyer", UserRole::Generic).await;
    let course = seed_course(&pool, &author, "Rust", 10.0).await;
    place_order(&pool, &buyer, json!([{ "courseId": course }])).await;

    let response = setup_test_app(pool)
        .oneshot(empty_request(
            "DELETE",
            &format!("/api/courses/{course}"),
            Some(&author.bearer()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
