//! Media stored on the CDN: uploaded images and streamed videos.
//!
//! The `data` column is provider-specific JSON. Images carry the list of
//! stored files ([`ImageMediaData`]); videos carry the stream video id
//! ([`VideoMediaData`]).

use std::fmt;

use chrono::{DateTime, Utc};
use gourze_core::{FieldKind, FilterField, ListSchema, SortField};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ParseEnumError;

pub const MEDIA_DATA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Document,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Document => "document",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for MediaType {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "image" => Ok(Self::Image),
            "document" => Ok(Self::Document),
            "video" => Ok(Self::Video),
            _ => Err(ParseEnumError {
                kind: "media type",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
    Ready,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Ready => "ready",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for UploadStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "uploading" => Ok(Self::Uploading),
            "ready" => Ok(Self::Ready),
            _ => Err(ParseEnumError {
                kind: "upload status",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub media_type: MediaType,
    #[sqlx(try_from = "String")]
    pub upload_status: UploadStatus,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const MEDIA_COLUMNS: &str =
    "id, type, upload_status, data, title, description, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMediaDto {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub upload_status: Option<UploadStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageMediaFile {
    /// Variant name; `original` for the file as uploaded
    pub id: String,
    pub file_name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageMediaData {
    pub version: String,
    pub files: Vec<ImageMediaFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoMediaData {
    pub version: String,
    pub provider: String,
    pub video_id: String,
}

/// Request for a resumable (TUS) video upload slot.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadVideoViaTusDto {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Lesson 1")]
    pub title: String,
    #[validate(length(min = 1))]
    #[schema(example = "video/mp4")]
    pub filetype: String,
    /// Stream collection id
    pub collection: Option<String>,
    /// Owner recorded in the upload metadata; defaults to the caller
    pub user_id: Option<i64>,
}

/// Headers the client sends to the TUS endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TusUploadHeaders {
    pub authorization_signature: String,
    /// Unix timestamp
    pub authorization_expire: u64,
    pub video_id: String,
    pub library_id: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TusUploadMetadata {
    pub filetype: String,
    pub title: String,
    pub collection: Option<String>,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TusUploadResult {
    pub headers: TusUploadHeaders,
    pub metadata: TusUploadMetadata,
}

pub const MEDIA_LIST: ListSchema = ListSchema {
    filters: &[
        FilterField::new("id", "id", FieldKind::Integer),
        FilterField::new("type", "type", FieldKind::Text),
        FilterField::new("title", "title", FieldKind::Text),
        FilterField::new("uploadStatus", "upload_status", FieldKind::Text),
    ],
    sortable: &[
        SortField::new("id", "id"),
        SortField::new("title", "title"),
        SortField::new("createdAt", "created_at"),
    ],
};
