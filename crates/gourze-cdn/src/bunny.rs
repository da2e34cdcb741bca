//! Bunny Edge Storage and Bunny Stream client.

use gourze_config::BunnyConfig;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::provider::{CdnError, CdnFuture, MediaProvider, validate_path};

const ACCESS_KEY_HEADER: &str = "AccessKey";

#[derive(Clone, Debug)]
pub struct BunnyProvider {
    client: Client,
    config: BunnyConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateVideoRequest<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    collection_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreateVideoResponse {
    guid: String,
}

impl BunnyProvider {
    pub fn new(config: BunnyConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: BunnyConfig) -> Self {
        Self { client, config }
    }

    async fn put_file(
        &self,
        path: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<String, CdnError> {
        validate_path(path)?;

        let url = format!(
            "{}/{}/{}",
            self.config.storage_endpoint.trim_end_matches('/'),
            self.config.storage_zone,
            path
        );
        debug!(%url, bytes = content.len(), "Uploading file to storage");

        let response = self
            .client
            .put(&url)
            .header(ACCESS_KEY_HEADER, &self.config.storage_access_key)
            .header(CONTENT_TYPE, content_type)
            .body(content)
            .send()
            .await?;

        expect_status(response, StatusCode::CREATED).await?;

        Ok(format!(
            "{}/{}",
            self.config.download_base_url.trim_end_matches('/'),
            path
        ))
    }

    async fn post_video(&self, title: &str, collection: Option<&str>) -> Result<String, CdnError> {
        let url = format!(
            "{}/library/{}/videos",
            self.config.stream_endpoint.trim_end_matches('/'),
            self.config.stream_library_id
        );

        let response = self
            .client
            .post(&url)
            .header(ACCESS_KEY_HEADER, &self.config.stream_access_key)
            .json(&CreateVideoRequest {
                title,
                collection_id: collection,
            })
            .send()
            .await?;

        let response = expect_status(response, StatusCode::OK).await?;
        let created: CreateVideoResponse = response.json().await?;

        debug!(video_id = %created.guid, "Created stream video");
        Ok(created.guid)
    }
}

async fn expect_status(
    response: reqwest::Response,
    expected: StatusCode,
) -> Result<reqwest::Response, CdnError> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), %body, "Unexpected CDN response");
    Err(CdnError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Lowercase hex SHA-256 of `library_id + access_key + expires_at + video_id`.
pub fn tus_signature(library_id: u64, access_key: &str, expires_at: u64, video_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{library_id}{access_key}{expires_at}{video_id}"));
    hex::encode(hasher.finalize())
}

impl MediaProvider for BunnyProvider {
    fn upload_file<'a>(
        &'a self,
        path: &'a str,
        content: Vec<u8>,
        content_type: &'a str,
    ) -> CdnFuture<'a, String> {
        Box::pin(self.put_file(path, content, content_type))
    }

    fn create_video<'a>(
        &'a self,
        title: &'a str,
        collection: Option<&'a str>,
    ) -> CdnFuture<'a, String> {
        Box::pin(self.post_video(title, collection))
    }

    fn tus_signature(&self, video_id: &str, expires_at: u64) -> String {
        tus_signature(
            self.config.stream_library_id,
            &self.config.stream_access_key,
            expires_at,
            video_id,
        )
    }

    fn library_id(&self) -> u64 {
        self.config.stream_library_id
    }

    fn name(&self) -> &'static str {
        "bunny"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tus_signature_known_vector() {
        // sha256("123secret-key1700000000abc-123")
        assert_eq!(
            tus_signature(123, "secret-key", 1_700_000_000, "abc-123"),
            "3924177c7e76069bb904b34cacf8c15fc7bc15bf0aaba0584815e9ad3bd77597"
        );
    }

    #[test]
    fn test_provider_signs_with_configured_library() {
        let provider = BunnyProvider::new(BunnyConfig {
            stream_library_id: 123,
            stream_access_key: "secret-key".to_string(),
            ..BunnyConfig::default()
        });

        assert_eq!(
            provider.tus_signature("abc-123", 1_700_000_000),
            tus_signature(123, "secret-key", 1_700_000_000, "abc-123")
        );
        assert_eq!(provider.library_id(), 123);
    }

    #[test]
    fn test_create_video_request_omits_missing_collection() {
        let body = serde_json::to_value(CreateVideoRequest {
            title: "Lesson",
            collection_id: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "title": "Lesson" }));
    }
}
