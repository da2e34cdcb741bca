use gourze_auth::UserRole;
use gourze_core::{FilterOp, PageMeta, SortOrder};
use gourze_models::{
    AuthResult, Category, Chapter, Course, CreateCategoryDto, CreateChapterDto, CreateCourseDto,
    CreateOrderDto, CreateOrderItemDto, CreateUserDto, ImageMediaData, ImageMediaFile, Media,
    MediaType, Order, OrderItem, OrderStatus, RefreshTokenDto, SignInDto, SignUpDto,
    TusUploadHeaders, TusUploadMetadata, TusUploadResult, UpdateCategoryDto, UpdateChapterDto,
    UpdateCourseDto, UpdateMediaDto, UpdateOrderDto, UpdateUserDto, UploadStatus,
    UploadVideoViaTusDto, User, VideoMediaData,
};
use serde::Serialize;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::middleware::auth::ACCESS_TOKEN_COOKIE;

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable code such as `invalid-params` or `not-found`
    pub code: String,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::signin,
        crate::modules::auth::controller::signup,
        crate::modules::auth::controller::refresh,
        crate::modules::auth::controller::signout,
        crate::modules::auth::controller::me,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::media::controller::list_media,
        crate::modules::media::controller::get_media,
        crate::modules::media::controller::update_media,
        crate::modules::media::controller::delete_media,
        crate::modules::media::controller::upload_photo,
        crate::modules::media::controller::upload_video_via_tus,
        crate::modules::categories::controller::list_categories,
        crate::modules::categories::controller::get_category,
        crate::modules::categories::controller::create_category,
        crate::modules::categories::controller::update_category,
        crate::modules::categories::controller::delete_category,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::chapters::controller::list_chapters,
        crate::modules::chapters::controller::get_chapter,
        crate::modules::chapters::controller::create_chapter,
        crate::modules::chapters::controller::update_chapter,
        crate::modules::chapters::controller::delete_chapter,
        crate::modules::orders::controller::list_orders,
        crate::modules::orders::controller::create_order,
        crate::modules::orders::controller::get_order,
        crate::modules::orders::controller::update_order,
        crate::modules::orders::controller::delete_order,
    ),
    components(
        schemas(
            ErrorResponse,
            PageMeta,
            SortOrder,
            FilterOp,
            User,
            UserRole,
            CreateUserDto,
            UpdateUserDto,
            SignInDto,
            SignUpDto,
            RefreshTokenDto,
            AuthResult,
            Category,
            CreateCategoryDto,
            UpdateCategoryDto,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            Chapter,
            CreateChapterDto,
            UpdateChapterDto,
            Media,
            MediaType,
            UploadStatus,
            UpdateMediaDto,
            ImageMediaData,
            ImageMediaFile,
            VideoMediaData,
            UploadVideoViaTusDto,
            TusUploadResult,
            TusUploadHeaders,
            TusUploadMetadata,
            Order,
            OrderItem,
            OrderStatus,
            CreateOrderDto,
            CreateOrderItemDto,
            UpdateOrderDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-in, sign-up, and token rotation"),
        (name = "Users", description = "User administration (super and admin)"),
        (name = "Media", description = "Photo uploads and TUS video uploads"),
        (name = "Categories", description = "Course categories"),
        (name = "Courses", description = "Courses"),
        (name = "Chapters", description = "Chapters of a course"),
        (name = "Orders", description = "Orders and enrollment")
    ),
    info(
        title = "Gourze API",
        version = "0.1.0",
        description = "Course marketplace API. Every response is wrapped in `{code, message, data, meta?}`; list endpoints accept `page`, `take`, `sortBy`, `sortOrder`, and `<field>.op` / `<field>.val` filters.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(ACCESS_TOKEN_COOKIE))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes_and_schemes() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/auth/signin"));
        assert!(doc.paths.paths.contains_key("/api/courses/{id}/chapters/{chapter_id}"));
        assert!(doc.paths.paths.contains_key("/api/media/upload-video-via-tus"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.security_schemes.contains_key("cookie_auth"));
        assert!(components.schemas.contains_key("ErrorResponse"));
    }
}
