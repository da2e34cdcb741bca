//! Drives [`BunnyProvider`] against an in-process stand-in for the Bunny APIs.

use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::{post, put},
};
use gourze_cdn::{BunnyProvider, CdnError, MediaProvider};
use gourze_config::BunnyConfig;
use serde_json::{Value, json};

const STORAGE_KEY: &str = "storage-key";
const STREAM_KEY: &str = "stream-key";

fn has_key(headers: &HeaderMap, key: &str) -> bool {
    headers.get("AccessKey").and_then(|v| v.to_str().ok()) == Some(key)
}

async fn store(
    Path((zone, path)): Path<(String, String)>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> StatusCode {
    if !has_key(&headers, STORAGE_KEY) {
        return StatusCode::UNAUTHORIZED;
    }
    if zone != "zone" || path.is_empty() || body.is_empty() {
        return StatusCode::BAD_REQUEST;
    }
    StatusCode::CREATED
}

async fn create_video(
    Path(library_id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if !has_key(&headers, STREAM_KEY) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "guid": format!("{}-{}", library_id, body["title"].as_str().unwrap_or_default()),
        "collectionId": body["collectionId"],
    })))
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/storage/{zone}/{*path}", put(store))
        .route("/stream/library/{library_id}/videos", post(create_video));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn config(base: &str) -> BunnyConfig {
    BunnyConfig {
        storage_zone: "zone".to_string(),
        storage_access_key: STORAGE_KEY.to_string(),
        storage_endpoint: format!("{}/storage", base),
        download_base_url: "https://cdn.example.com".to_string(),
        stream_library_id: 42,
        stream_access_key: STREAM_KEY.to_string(),
        stream_endpoint: format!("{}/stream", base),
        ..BunnyConfig::default()
    }
}

#[tokio::test]
async fn test_upload_file_returns_download_url() {
    let base = spawn_stub().await;
    let provider = BunnyProvider::new(config(&base));

    let url = provider
        .upload_file("photos/123.png", vec![1, 2, 3], "image/png")
        .await
        .unwrap();

    assert_eq!(url, "https://cdn.example.com/photos/123.png");
}

#[tokio::test]
async fn test_upload_file_surfaces_status_error() {
    let base = spawn_stub().await;
    let provider = BunnyProvider::new(BunnyConfig {
        storage_access_key: "wrong".to_string(),
        ..config(&base)
    });

    let err = provider
        .upload_file("photos/123.png", vec![1], "image/png")
        .await
        .unwrap_err();

    assert!(matches!(err, CdnError::Status { status: 401, .. }));
}

#[tokio::test]
async fn test_upload_file_rejects_bad_path_without_calling_out() {
    let provider = BunnyProvider::new(config("http://127.0.0.1:9"));

    let err = provider
        .upload_file("../escape.png", vec![1], "image/png")
        .await
        .unwrap_err();

    assert!(matches!(err, CdnError::InvalidPath(_)));
}

#[tokio::test]
async fn test_create_video_reads_guid() {
    let base = spawn_stub().await;
    let provider = BunnyProvider::new(config(&base));

    let guid = provider.create_video("intro", None).await.unwrap();

    assert_eq!(guid, "42-intro");
}

#[tokio::test]
async fn test_create_video_with_wrong_key_fails() {
    let base = spawn_stub().await;
    let provider = BunnyProvider::new(BunnyConfig {
        stream_access_key: "wrong".to_string(),
        ..config(&base)
    });

    let err = provider.create_video("intro", Some("c1")).await.unwrap_err();

    assert!(matches!(err, CdnError::Status { status: 401, .. }));
}
