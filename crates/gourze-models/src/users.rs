//! User entity and admin DTOs.

use chrono::{DateTime, Utc};
use gourze_auth::UserRole;
use gourze_core::{FieldKind, FilterField, ListSchema, SortField};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A registered user. The password hash lives in [`UserWithPassword`] and is
/// never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    #[schema(value_type = Object)]
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column list matching [`User`], for hand-written queries.
pub const USER_COLUMNS: &str =
    "id, username, email, full_name, role, meta, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct UserWithPassword {
    #[sqlx(flatten)]
    pub user: User,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(length(min = 3, max = 50))]
    #[schema(example = "john_doe")]
    pub username: String,
    #[validate(email)]
    #[schema(example = "john@example.com")]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[validate(length(min = 8))]
    pub password: String,
    /// Defaults to `generic`
    pub role: Option<UserRole>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub role: Option<UserRole>,
    #[schema(value_type = Option<Object>)]
    pub meta: Option<serde_json::Value>,
}

pub const USER_LIST: ListSchema = ListSchema {
    filters: &[
        FilterField::new("id", "id", FieldKind::Integer),
        FilterField::new("username", "username", FieldKind::Text),
        FilterField::new("email", "email", FieldKind::Text),
        FilterField::new("fullName", "full_name", FieldKind::Text),
        FilterField::new("role", "role", FieldKind::Text),
        FilterField::new("createdAt", "created_at", FieldKind::Timestamp),
    ],
    sortable: &[
        SortField::new("id", "id"),
        SortField::new("username", "username"),
        SortField::new("email", "email"),
        SortField::new("fullName", "full_name"),
        SortField::new("createdAt", "created_at"),
        SortField::new("updatedAt", "updated_at"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "john_doe".to_string(),
            email: "john@example.com".to_string(),
            full_name: "John Doe".to_string(),
            role: UserRole::Admin,
            meta: serde_json::json!({}),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_user_serializes_camel_case_without_password() {
        let json = serde_json::to_value(sample_user()).unwrap();

        assert_eq!(json["fullName"], "John Doe");
        assert_eq!(json["role"], "admin");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_create_user_dto_validation() {
        let dto: CreateUserDto = serde_json::from_value(serde_json::json!({
            "username": "john_doe",
            "email": "john@example.com",
            "fullName": "John Doe",
            "password": "password123"
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.role, None);

        let invalid = CreateUserDto {
            email: "not-an-email".to_string(),
            ..dto.clone()
        };
        assert!(invalid.validate().is_err());

        let short_password = CreateUserDto {
            password: "short".to_string(),
            ..dto
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_update_user_dto_empty_is_valid() {
        let dto: UpdateUserDto = serde_json::from_str("{}").unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_user_list_sorts_by_id() {
        assert!(USER_LIST.sortable.iter().any(|f| f.key == "id"));
    }
}
