//! Page-based pagination for list endpoints.
//!
//! Lists are addressed by a 1-based `page` and a page size `take`. The
//! response carries a [`PageMeta`] next to the items:
//!
//! ```json
//! {
//!   "code": "ok",
//!   "message": "Success",
//!   "data": [...],
//!   "meta": { "numItems": 25, "page": 3, "numPages": 3, "take": 10 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_TAKE: i64 = 10;
pub const MAX_TAKE: i64 = 100;
/// Largest page whose offset fits in an `i64` for any allowed `take`.
pub const MAX_PAGE: i64 = i64::MAX / MAX_TAKE;
pub const DEFAULT_SORT_BY: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Resolved paging and ordering for one list request.
///
/// `sort_column` is always a column name taken from a static whitelist,
/// never raw user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub take: i64,
    pub sort_column: &'static str,
    pub sort_order: SortOrder,
}

impl Pagination {
    pub fn new(page: i64, take: i64, sort_column: &'static str, sort_order: SortOrder) -> Self {
        Self {
            page,
            take,
            sort_column,
            sort_order,
        }
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.take)
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        self.take
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_TAKE, DEFAULT_SORT_BY, SortOrder::Asc)
    }
}

/// `ceil(total / take)` in integer arithmetic.
#[must_use]
pub fn num_pages(total: i64, take: i64) -> i64 {
    if take <= 0 {
        return 0;
    }
    (total + take - 1) / take
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total number of items matching the filters, across all pages
    pub num_items: i64,
    pub page: i64,
    pub num_pages: i64,
    pub take: i64,
}

impl PageMeta {
    pub fn new(total: i64, pagination: &Pagination) -> Self {
        Self {
            num_items: total,
            page: pagination.page,
            num_pages: num_pages(total, pagination.take),
            take: pagination.take,
        }
    }
}

/// Paging query parameters shared by every list endpoint.
///
/// Field filters are documented per endpoint; they use dotted keys such as
/// `username.op=contains&username.val=doe`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, 1-based (default: 1)
    pub page: Option<i64>,
    /// Page size, 1-100 (default: 10)
    pub take: Option<i64>,
    /// Field to sort by (default: id)
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default: asc)
    pub sort_order: Option<SortOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_pages_rounds_up() {
        assert_eq!(num_pages(25, 10), 3);
        assert_eq!(num_pages(30, 10), 3);
        assert_eq!(num_pages(31, 10), 4);
        assert_eq!(num_pages(1, 10), 1);
    }

    #[test]
    fn test_num_pages_empty() {
        assert_eq!(num_pages(0, 10), 0);
    }

    #[test]
    fn test_offset_from_page() {
        let pagination = Pagination::new(3, 10, "id", SortOrder::Asc);
        assert_eq!(pagination.offset(), 20);
        assert_eq!(pagination.limit(), 10);

        let first = Pagination::default();
        assert_eq!(first.offset(), 0);
    }

    #[test]
    fn test_offset_saturates_instead_of_overflowing() {
        let pagination = Pagination::new(i64::MAX, 10, "id", SortOrder::Asc);
        assert_eq!(pagination.offset(), i64::MAX);
    }

    #[test]
    fn test_page_meta() {
        let pagination = Pagination::new(2, 10, "id", SortOrder::Desc);
        let meta = PageMeta::new(25, &pagination);

        assert_eq!(
            meta,
            PageMeta {
                num_items: 25,
                page: 2,
                num_pages: 3,
                take: 10,
            }
        );
    }

    #[test]
    fn test_page_meta_serializes_camel_case() {
        let meta = PageMeta::new(0, &Pagination::default());
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["numItems"], 0);
        assert_eq!(json["numPages"], 0);
        assert_eq!(json["page"], 1);
        assert_eq!(json["take"], 10);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("DESC"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("sideways"), None);
        assert_eq!(SortOrder::Desc.as_sql(), "DESC");
    }
}
