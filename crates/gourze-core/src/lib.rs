//! # Gourze Core
//!
//! Foundational types shared by every Gourze crate:
//!
//! - [`errors`]: [`AppError`], the error envelope and its HTTP mapping
//! - [`response`]: [`ApiResponse`], the success envelope
//! - [`filter`]: dotted-key list filters and their validation
//! - [`pagination`]: page/take math and [`PageMeta`]
//! - [`password`]: bcrypt hashing
//!
//! # Example
//!
//! ```ignore
//! use gourze_core::{ApiResponse, AppError, ListQuery};
//!
//! let query = ListQuery::parse(&pairs, &USER_LIST).map_err(AppError::bad_request)?;
//! let (users, total) = UserService::list(&db, &query).await?;
//! Ok(ApiResponse::paginated(users, query.meta(total)))
//! ```

pub mod errors;
pub mod filter;
pub mod pagination;
pub mod password;
pub mod response;

pub use errors::AppError;
pub use filter::{
    FieldFilter, FieldKind, FilterError, FilterField, FilterOp, FilterValues, ListQuery,
    ListSchema, SortField,
};
pub use pagination::{PageMeta, Pagination, PaginationParams, SortOrder};
pub use password::{hash_password, verify_dummy_password, verify_password};
pub use response::ApiResponse;
