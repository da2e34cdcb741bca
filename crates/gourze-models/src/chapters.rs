use chrono::{DateTime, Utc};
use gourze_core::{FieldKind, FilterField, ListSchema, SortField};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    /// Seconds
    pub duration: i32,
    pub media_id: Option<i64>,
    #[schema(value_type = Object)]
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const CHAPTER_COLUMNS: &str = "id, course_id, name, description, position, duration, media_id, meta, created_at, updated_at";

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChapterDto {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Ownership and borrowing")]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to after the last chapter of the course
    #[validate(range(min = 0))]
    pub position: Option<i32>,
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
    pub media_id: Option<i64>,
    #[schema(value_type = Option<Object>)]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChapterDto {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub position: Option<i32>,
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
    pub media_id: Option<i64>,
    #[schema(value_type = Option<Object>)]
    pub meta: Option<serde_json::Value>,
}

pub const CHAPTER_LIST: ListSchema = ListSchema {
    filters: &[
        FilterField::new("id", "id", FieldKind::Integer),
        FilterField::new("name", "name", FieldKind::Text),
        FilterField::new("position", "position", FieldKind::Integer),
    ],
    sortable: &[
        SortField::new("id", "id"),
        SortField::new("position", "position"),
        SortField::new("name", "name"),
        SortField::new("createdAt", "created_at"),
    ],
};
