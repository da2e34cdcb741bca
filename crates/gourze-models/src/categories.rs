use chrono::{DateTime, Utc};
use gourze_core::{FieldKind, FilterField, ListSchema, SortField};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Programming")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
}

pub const CATEGORY_LIST: ListSchema = ListSchema {
    filters: &[
        FilterField::new("id", "id", FieldKind::Integer),
        FilterField::new("name", "name", FieldKind::Text),
    ],
    sortable: &[
        SortField::new("id", "id"),
        SortField::new("name", "name"),
        SortField::new("createdAt", "created_at"),
    ],
};
