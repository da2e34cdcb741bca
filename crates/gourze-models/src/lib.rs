//! # Gourze Models
//!
//! Database entities, request/response DTOs, and the filter/sort whitelists
//! of every list endpoint.
//!
//! # Modules
//!
//! - [`auth`]: sign-in, sign-up, and token results
//! - [`users`]: users and their admin DTOs
//! - [`categories`]: course categories
//! - [`courses`]: courses
//! - [`chapters`]: chapters of a course
//! - [`media`]: uploaded images and videos
//! - [`orders`]: orders and their items
//!
//! Every entity serializes with camelCase keys. Enumerated columns are
//! stored as TEXT and decoded through `TryFrom<String>`.

pub mod auth;
pub mod categories;
pub mod chapters;
pub mod courses;
pub mod media;
pub mod orders;
pub mod users;

use thiserror::Error;

/// A TEXT column held a value outside its enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} `{value}`")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

pub use auth::{AuthResult, RefreshTokenDto, SignInDto, SignUpDto};
pub use categories::{CATEGORY_LIST, Category, CreateCategoryDto, UpdateCategoryDto};
pub use chapters::{CHAPTER_LIST, Chapter, CreateChapterDto, UpdateChapterDto};
pub use courses::{COURSE_LIST, Course, CreateCourseDto, UpdateCourseDto};
pub use media::{
    ImageMediaData, ImageMediaFile, MEDIA_LIST, Media, MediaType, TusUploadHeaders,
    TusUploadMetadata, TusUploadResult, UpdateMediaDto, UploadStatus, UploadVideoViaTusDto,
    VideoMediaData,
};
pub use orders::{
    CreateOrderDto, CreateOrderItemDto, ORDER_LIST, Order, OrderItem, OrderStatus, UpdateOrderDto,
};
pub use users::{CreateUserDto, USER_COLUMNS, USER_LIST, UpdateUserDto, User, UserWithPassword};
