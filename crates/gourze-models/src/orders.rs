//! Orders and the courses they buy.

use std::fmt;

use chrono::{DateTime, Utc};
use gourze_core::{FieldKind, FilterField, ListSchema, SortField};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Unpaid,
    Paid,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ParseEnumError {
                kind: "order status",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub items: Vec<OrderItem>,
}

pub const ORDER_COLUMNS: &str = "id, user_id, amount, status, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub course_id: i64,
    pub quantity: i32,
    /// Unit price captured when the order was placed
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, course_id, quantity, price, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemDto {
    pub course_id: i64,
    /// Defaults to 1
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderDto {
    /// Buyer; defaults to the caller. Only super and admin may set another user.
    pub user_id: Option<i64>,
    #[validate(length(min = 1), nested)]
    pub items: Vec<CreateOrderItemDto>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderDto {
    pub status: Option<OrderStatus>,
}

pub const ORDER_LIST: ListSchema = ListSchema {
    filters: &[
        FilterField::new("id", "id", FieldKind::Integer),
        FilterField::new("status", "status", FieldKind::Text),
        FilterField::new("userId", "user_id", FieldKind::Integer),
        FilterField::new("amount", "amount", FieldKind::Float),
    ],
    sortable: &[
        SortField::new("id", "id"),
        SortField::new("amount", "amount"),
        SortField::new("createdAt", "created_at"),
    ],
};
