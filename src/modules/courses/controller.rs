use anyhow::anyhow;
use axum::extract::State;
use axum::http::StatusCode;
use gourze_core::{ApiResponse, AppError, ListQuery, PaginationParams};
use gourze_models::{COURSE_LIST, Course, CreateCourseDto, UpdateCourseDto};
use tracing::instrument;

use crate::docs::ErrorResponse;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::validator::{ApiPath, ApiQuery, ValidatedJson};

use super::service::CourseService;

/// Loads a course the caller may modify: its author, super, or admin.
pub async fn editable_course(
    state: &AppState,
    current_user: &CurrentUser,
    id: i64,
) -> Result<Course, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    if !current_user.can_act_for(course.user_id) {
        return Err(AppError::unauthorized(anyhow!(
            "Only the course author may modify this course"
        )));
    }
    Ok(course)
}

/// List courses
///
/// Filterable by `name`, `userId`, `categoryId`, and `price`.
#[utoipa::path(
    get,
    path = "/api/courses",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of courses", body = Vec<Course>),
        (status = 400, description = "Invalid filter or paging parameters", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<Vec<(String, String)>>,
) -> Result<ApiResponse<Vec<Course>>, AppError> {
    let query = ListQuery::parse(&params, &COURSE_LIST).map_err(AppError::bad_request)?;
    let (courses, total) = CourseService::list_courses(&state.db, &query).await?;
    Ok(ApiResponse::paginated(courses, query.meta(total)))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = Course),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Course>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    Ok(ApiResponse::ok(course))
}

/// Create a course
///
/// The author defaults to the caller. Only super and admin may author a
/// course on someone else's behalf.
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Validation error or unknown category", body = ErrorResponse),
        (status = 401, description = "Not signed in, or authoring for another user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, ApiResponse<Course>), AppError> {
    let author_id = dto.user_id.unwrap_or(current_user.id);
    if !current_user.can_act_for(author_id) {
        return Err(AppError::unauthorized(anyhow!(
            "Cannot create a course for another user"
        )));
    }

    let course = CourseService::create_course(&state.db, author_id, dto).await?;
    Ok(ApiResponse::created("Course created successfully", course))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 401, description = "Caller is not the author, super, or admin", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<ApiResponse<Course>, AppError> {
    editable_course(&state, &current_user, id).await?;
    let course = CourseService::update_course(&state.db, id, dto).await?;
    Ok(ApiResponse::with_message("Course updated successfully", course))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Deleted course", body = Course),
        (status = 401, description = "Caller is not the author, super, or admin", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Course appears in an order", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Course>, AppError> {
    editable_course(&state, &current_user, id).await?;
    let course = CourseService::delete_course(&state.db, id).await?;
    Ok(ApiResponse::with_message("Course deleted successfully", course))
}
