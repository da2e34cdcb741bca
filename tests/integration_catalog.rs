mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, empty_request, json_request, setup_test_app};
use gourze::gourze_auth::UserRole;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

async fn create_course(pool: &PgPool, auth: &str, body: Value) -> Value {
    let response = setup_test_app(pool.clone())
        .oneshot(json_request("POST", "/api/courses", Some(auth), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_categories_public_read_staff_write(pool: PgPool) {
    let admin = create_test_user(&pool, "site_admin", UserRole::Admin).await;
    let user = create_test_user(&pool, "john_doe", UserRole::Generic).await;

    let response = setup_test_app(pool.clone())
        .oneshot(json_request(
            "POST",
            "/api/courses/categories",
            Some(&user.bearer()),
            json!({ "name": "Programming" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = setup_test_app(pool.clone())
        .oneshot(json_request(
            "POST",
            "/api/courses/categories",
            Some(&admin.bearer()),
            json!({ "name": "Programming", "description": "Code" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = setup_test_app(pool.clone())
        .oneshot(empty_request("GET", "/api/courses/categories", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["name"], "Programming");
    assert_eq!(body["meta"]["numItems"], 1);

    let response = setup_test_app(pool)
        .oneshot(empty_request(
            "GET",
            &format!("/api/courses/categories/{id}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_author_defaults_to_caller(pool: PgPool) {
    let author = create_test_user(&pool, "author", UserRole::Generic).await;

    let course = create_course(
        &pool,
        &author.bearer(),
        json!({ "name": "Rust for Beginners", "price": 49.5 }),
    )
    .await;

    assert_eq!(course["userId"], author.id);
    assert_eq!(course["price"], 49.5);
    assert_eq!(course["meta"], json!({}));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_generic_user_cannot_create_course_for_someone_else(pool: PgPool) {
    let author = create_test_user(&pool, "author", UserRole::Generic).await;
    let other = create_test_user(&pool, "other", UserRole::Generic).await;

    let response = setup_test_app(pool)
        .oneshot(json_request(
            "POST",
            "/api/courses",
            Some(&author.bearer()),
            json!({ "name": "Impostor", "price": 1.0, "userId": other.id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_author_or_staff_edits_course(pool: PgPool) {
    let author = create_test_user(&pool, "author", UserRole::Generic).await;
    let stranger = create_test_user(&pool, "stranger", UserRole::Generic).await;
    let admin = create_test_user(&pool, "site_admin", UserRole::Admin).await;

    let course = create_course(&pool, &author.bearer(), json!({ "name": "Mine", "price": 10.0 })).await;
    let uri = format!("/api/courses/{}", course["id"]);

    let response = setup_test_app(pool.clone())
        .oneshot(json_request("PUT", &uri, Some(&stranger.bearer()), json!({ "name": "Stolen" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = setup_test_app(pool.clone())
        .oneshot(json_request("PUT", &uri, Some(&author.bearer()), json!({ "price": 12.0 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["price"], 12.0);
    assert_eq!(body["data"]["name"], "Mine");

    let response = setup_test_app(pool)
        .oneshot(empty_request("DELETE", &uri, Some(&admin.bearer())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_courses_are_public_and_filterable(pool: PgPool) {
    let author = create_test_user(&pool, "author", UserRole::Generic).await;
    create_course(&pool, &author.bearer(), json!({ "name": "Cheap", "price": 5.0 })).await;
    create_course(&pool, &author.bearer(), json!({ "name": "Pricey", "price": 99.0 })).await;

    let response = setup_test_app(pool)
        .oneshot(empty_request(
            "GET",
            "/api/courses?price.op=greater_than&price.val=10",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["meta"]["numItems"], 1);
    assert_eq!(body["data"][0]["name"], "Pricey");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_chapters_positions_and_scope(pool: PgPool) {
    let author = create_test_user(&pool, "author", UserRole::Generic).await;
    let stranger = create_test_user(&pool, "stranger", UserRole::Generic).await;
    let course = create_course(&pool, &author.bearer(), json!({ "name": "Course", "price": 0.0 })).await;
    let other = create_course(&pool, &author.bearer(), json!({ "name": "Other", "price": 0.0 })).await;
    let base = format!("/api/courses/{}/chapters", course["id"]);

    let mut ids = Vec::new();
    for name in ["Intro", "Ownership"] {
        let response = setup_test_app(pool.clone())
            .oneshot(json_request("POST", &base, Some(&author.bearer()), json!({ "name": name })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        ids.push(body["data"]["id"].as_i64().unwrap());
        assert_eq!(body["data"]["courseId"], course["id"]);
    }

    let response = setup_test_app(pool.clone())
        .oneshot(empty_request("GET", &format!("{base}?sortBy=position"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["position"], 1);
    assert_eq!(body["data"][1]["position"], 2);

    let response = setup_test_app(pool.clone())
        .oneshot(json_request("POST", &base, Some(&stranger.bearer()), json!({ "name": "Spam" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A chapter is only reachable through its own course.
    let response = setup_test_app(pool.clone())
        .oneshot(empty_request(
            "GET",
            &format!("/api/courses/{}/chapters/{}", other["id"], ids[0]),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = setup_test_app(pool)
        .oneshot(empty_request("GET", "/api/courses/999999/chapters", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
