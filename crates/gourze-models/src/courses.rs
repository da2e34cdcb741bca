//! Courses on sale in the marketplace.

use chrono::{DateTime, Utc};
use gourze_core::{FieldKind, FilterField, ListSchema, SortField};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<i64>,
    /// Author
    pub user_id: i64,
    #[schema(value_type = Object)]
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const COURSE_COLUMNS: &str =
    "id, name, description, price, category_id, user_id, meta, created_at, updated_at";

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Rust for Beginners")]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    #[schema(example = 49.99)]
    pub price: f64,
    pub category_id: Option<i64>,
    /// Author; defaults to the caller. Only super and admin may set another user.
    pub user_id: Option<i64>,
    #[schema(value_type = Option<Object>)]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub category_id: Option<i64>,
    #[schema(value_type = Option<Object>)]
    pub meta: Option<serde_json::Value>,
}

pub const COURSE_LIST: ListSchema = ListSchema {
    filters: &[
        FilterField::new("id", "id", FieldKind::Integer),
        FilterField::new("name", "name", FieldKind::Text),
        FilterField::new("userId", "user_id", FieldKind::Integer),
        FilterField::new("categoryId", "category_id", FieldKind::Integer),
        FilterField::new("price", "price", FieldKind::Float),
    ],
    sortable: &[
        SortField::new("id", "id"),
        SortField::new("name", "name"),
        SortField::new("price", "price"),
        SortField::new("createdAt", "created_at"),
    ],
};
