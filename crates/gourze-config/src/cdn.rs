//! Bunny CDN configuration.
//!
//! Two Bunny products are used: Edge Storage for photos and Stream for
//! videos (uploaded by the client straight to Bunny over TUS).
//!
//! # Environment Variables
//!
//! - `BUNNY_STORAGE_ZONE`, `BUNNY_STORAGE_ACCESS_KEY`, `BUNNY_STORAGE_REGION`
//! - `BUNNY_STORAGE_DOWNLOAD_BASE_URL`: public pull-zone URL for stored files
//! - `BUNNY_STREAM_LIBRARY_ID`, `BUNNY_STREAM_ACCESS_KEY`
//! - `BUNNY_STREAM_UPLOAD_EXPIRATION_TIME`: lifetime of a TUS upload
//!   signature in seconds (default: 3600)
//! - `BUNNY_STORAGE_ENDPOINT`, `BUNNY_STREAM_ENDPOINT`: API base URLs,
//!   derived from the region by default
//! - `MEDIA_MAX_UPLOAD_BYTES`: request body limit for photo uploads
//!   (default: 10 MiB)

use std::env;

use crate::env_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BunnyConfig {
    pub storage_zone: String,
    pub storage_access_key: String,
    pub storage_endpoint: String,
    pub download_base_url: String,
    pub stream_library_id: u64,
    pub stream_access_key: String,
    pub stream_endpoint: String,
    pub upload_expiration_secs: u64,
    pub max_upload_bytes: usize,
}

impl BunnyConfig {
    pub fn from_env() -> Self {
        let region = env::var("BUNNY_STORAGE_REGION").unwrap_or_default();
        let storage_endpoint = env::var("BUNNY_STORAGE_ENDPOINT")
            .unwrap_or_else(|_| storage_endpoint_for_region(&region));

        Self {
            storage_zone: env::var("BUNNY_STORAGE_ZONE").unwrap_or_default(),
            storage_access_key: env::var("BUNNY_STORAGE_ACCESS_KEY").unwrap_or_default(),
            storage_endpoint,
            download_base_url: env::var("BUNNY_STORAGE_DOWNLOAD_BASE_URL").unwrap_or_default(),
            stream_library_id: env_or("BUNNY_STREAM_LIBRARY_ID", 0),
            stream_access_key: env::var("BUNNY_STREAM_ACCESS_KEY").unwrap_or_default(),
            stream_endpoint: env::var("BUNNY_STREAM_ENDPOINT")
                .unwrap_or_else(|_| "https://video.bunnycdn.com".to_string()),
            upload_expiration_secs: env_or("BUNNY_STREAM_UPLOAD_EXPIRATION_TIME", 3600),
            max_upload_bytes: env_or("MEDIA_MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
        }
    }
}

/// `https://{region}.storage.bunnycdn.com`, or the main endpoint when no
/// region is configured.
pub fn storage_endpoint_for_region(region: &str) -> String {
    if region.is_empty() {
        "https://storage.bunnycdn.com".to_string()
    } else {
        format!("https://{}.storage.bunnycdn.com", region)
    }
}

impl Default for BunnyConfig {
    fn default() -> Self {
        Self {
            storage_zone: String::new(),
            storage_access_key: String::new(),
            storage_endpoint: storage_endpoint_for_region(""),
            download_base_url: String::new(),
            stream_library_id: 0,
            stream_access_key: String::new(),
            stream_endpoint: "https://video.bunnycdn.com".to_string(),
            upload_expiration_secs: 3600,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}
