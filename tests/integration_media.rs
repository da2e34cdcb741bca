mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;

use common::{
    OfflineMediaProvider, body_json, create_test_user, empty_request, json_request,
    setup_app_with_media, setup_test_app,
};
use gourze::gourze_auth::UserRole;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

const BOUNDARY: &str = "gourze-test-boundary";

fn multipart_photo(auth: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/media/upload-photo")
        .header("authorization", auth)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_photo_stores_original(pool: PgPool) {
    let user = create_test_user(&pool, "john_doe", UserRole::Generic).await;

    let response = setup_test_app(pool.clone())
        .oneshot(multipart_photo(&user.bearer(), "Cover Art.PNG", "image/png", b"\x89PNG fake"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let media = &body["data"];
    assert_eq!(media["type"], "image");
    assert_eq!(media["uploadStatus"], "ready");
    assert_eq!(media["title"], "Cover Art");

    let file = &media["data"]["files"][0];
    assert_eq!(file["id"], "original");
    let url = file["url"].as_str().unwrap();
    assert!(url.starts_with("https://cdn.test/photos/"));
    assert!(url.ends_with(".png"));

    let response = setup_test_app(pool)
        .oneshot(empty_request("GET", &format!("/api/media/{}", media["id"]), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_photo_rejects_non_image(pool: PgPool) {
    let user = create_test_user(&pool, "john_doe", UserRole::Generic).await;

    let response = setup_test_app(pool)
        .oneshot(multipart_photo(&user.bearer(), "notes.txt", "text/plain", b"hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_photo_requires_authentication(pool: PgPool) {
    let mut request = multipart_photo("", "a.png", "image/png", b"x");
    request.headers_mut().remove("authorization");

    let response = setup_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_video_via_tus_signs_upload(pool: PgPool) {
    let user = create_test_user(&pool, "john_doe", UserRole::Generic).await;

    let response = setup_test_app(pool.clone())
        .oneshot(json_request(
            "POST",
            "/api/media/upload-video-via-tus",
            Some(&user.bearer()),
            json!({ "title": "Lesson 1", "filetype": "video/mp4" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let headers = &body["data"]["headers"];
    assert_eq!(headers["videoId"], "video-123");
    assert_eq!(headers["libraryId"], 42);
    let expire = headers["authorizationExpire"].as_u64().unwrap();
    assert_eq!(
        headers["authorizationSignature"],
        format!("sig-video-123-{expire}")
    );
    assert_eq!(body["data"]["metadata"]["userId"], user.id);

    let (status, data): (String, serde_json::Value) =
        sqlx::query_as("SELECT upload_status, data FROM media WHERE type = 'video'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status, "uploading");
    assert_eq!(data["videoId"], "video-123");
    assert_eq!(data["provider"], "fake");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_media_edit_is_staff_only(pool: PgPool) {
    let user = create_test_user(&pool, "john_doe", UserRole::Generic).await;
    let admin = create_test_user(&pool, "site_admin", UserRole::Admin).await;

    let response = setup_test_app(pool.clone())
        .oneshot(multipart_photo(&user.bearer(), "a.jpg", "image/jpeg", b"jpeg"))
        .await
        .unwrap();
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/media/{id}");

    let response = setup_test_app(pool.clone())
        .oneshot(json_request("PUT", &uri, Some(&user.bearer()), json!({ "title": "Mine" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = setup_test_app(pool)
        .oneshot(json_request("PUT", &uri, Some(&admin.bearer()), json!({ "title": "Renamed" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["title"], "Renamed");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_media_allows_guests(pool: PgPool) {
    let user = create_test_user(&pool, "john_doe", UserRole::Generic).await;
    setup_test_app(pool.clone())
        .oneshot(multipart_photo(&user.bearer(), "a.jpg", "image/jpeg", b"jpeg"))
        .await
        .unwrap();

    let response = setup_test_app(pool)
        .oneshot(empty_request("GET", "/api/media", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["code"], "ok");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["numItems"], 1);
    assert_eq!(body["meta"]["page"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_photo_surfaces_cdn_failure(pool: PgPool) {
    let user = create_test_user(&pool, "john_doe", UserRole::Generic).await;

    let response = setup_app_with_media(pool.clone(), Arc::new(OfflineMediaProvider))
        .oneshot(multipart_photo(&user.bearer(), "a.png", "image/png", b"png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["code"], "upstream-error");
    assert_eq!(
        body["message"],
        "CDN responded with status 503: storage zone offline"
    );

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
