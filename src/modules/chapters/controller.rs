use axum::extract::State;
use axum::http::StatusCode;
use gourze_core::{ApiResponse, AppError, ListQuery, PaginationParams};
use gourze_models::{CHAPTER_LIST, Chapter, CreateChapterDto, UpdateChapterDto};
use tracing::instrument;

use crate::docs::ErrorResponse;
use crate::middleware::auth::CurrentUser;
use crate::modules::courses::controller::editable_course;
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::validator::{ApiPath, ApiQuery, ValidatedJson};

use super::service::ChapterService;

/// List the chapters of a course
#[utoipa::path(
    get,
    path = "/api/courses/{id}/chapters",
    params(("id" = i64, Path, description = "Course ID"), PaginationParams),
    responses(
        (status = 200, description = "Page of chapters", body = Vec<Chapter>),
        (status = 400, description = "Invalid filter or paging parameters", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Chapters"
)]
#[instrument(skip(state))]
pub async fn list_chapters(
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<Vec<(String, String)>>,
) -> Result<ApiResponse<Vec<Chapter>>, AppError> {
    let query = ListQuery::parse(&params, &CHAPTER_LIST).map_err(AppError::bad_request)?;
    CourseService::get_course(&state.db, course_id).await?;

    let (chapters, total, query) =
        ChapterService::list_chapters(&state.db, course_id, query).await?;
    Ok(ApiResponse::paginated(chapters, query.meta(total)))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/chapters/{chapter_id}",
    params(
        ("id" = i64, Path, description = "Course ID"),
        ("chapter_id" = i64, Path, description = "Chapter ID")
    ),
    responses(
        (status = 200, description = "Chapter", body = Chapter),
        (status = 404, description = "Chapter not found", body = ErrorResponse)
    ),
    tag = "Chapters"
)]
#[instrument(skip(state))]
pub async fn get_chapter(
    State(state): State<AppState>,
    ApiPath((course_id, chapter_id)): ApiPath<(i64, i64)>,
) -> Result<ApiResponse<Chapter>, AppError> {
    let chapter = ChapterService::get_chapter(&state.db, course_id, chapter_id).await?;
    Ok(ApiResponse::ok(chapter))
}

#[utoipa::path(
    post,
    path = "/api/courses/{id}/chapters",
    params(("id" = i64, Path, description = "Course ID")),
    request_body = CreateChapterDto,
    responses(
        (status = 201, description = "Chapter created", body = Chapter),
        (status = 400, description = "Validation error or unknown media", body = ErrorResponse),
        (status = 401, description = "Caller is not the course author, super, or admin", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Chapters"
)]
#[instrument(skip(state, dto))]
pub async fn create_chapter(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(course_id): ApiPath<i64>,
    ValidatedJson(dto): ValidatedJson<CreateChapterDto>,
) -> Result<(StatusCode, ApiResponse<Chapter>), AppError> {
    editable_course(&state, &current_user, course_id).await?;
    let chapter = ChapterService::create_chapter(&state.db, course_id, dto).await?;
    Ok(ApiResponse::created("Chapter created successfully", chapter))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}/chapters/{chapter_id}",
    params(
        ("id" = i64, Path, description = "Course ID"),
        ("chapter_id" = i64, Path, description = "Chapter ID")
    ),
    request_body = UpdateChapterDto,
    responses(
        (status = 200, description = "Chapter updated", body = Chapter),
        (status = 401, description = "Caller is not the course author, super, or admin", body = ErrorResponse),
        (status = 404, description = "Course or chapter not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Chapters"
)]
#[instrument(skip(state, dto))]
pub async fn update_chapter(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath((course_id, chapter_id)): ApiPath<(i64, i64)>,
    ValidatedJson(dto): ValidatedJson<UpdateChapterDto>,
) -> Result<ApiResponse<Chapter>, AppError> {
    editable_course(&state, &current_user, course_id).await?;
    let chapter = ChapterService::update_chapter(&state.db, course_id, chapter_id, dto).await?;
    Ok(ApiResponse::with_message("Chapter updated successfully", chapter))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}/chapters/{chapter_id}",
    params(
        ("id" = i64, Path, description = "Course ID"),
        ("chapter_id" = i64, Path, description = "Chapter ID")
    ),
    responses(
        (status = 200, description = "Deleted chapter", body = Chapter),
        (status = 401, description = "Caller is not the course author, super, or admin", body = ErrorResponse),
        (status = 404, description = "Course or chapter not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Chapters"
)]
#[instrument(skip(state))]
pub async fn delete_chapter(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath((course_id, chapter_id)): ApiPath<(i64, i64)>,
) -> Result<ApiResponse<Chapter>, AppError> {
    editable_course(&state, &current_user, course_id).await?;
    let chapter = ChapterService::delete_chapter(&state.db, course_id, chapter_id).await?;
    Ok(ApiResponse::with_message("Chapter deleted successfully", chapter))
}
