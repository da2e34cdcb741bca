use axum::extract::State;
use axum::http::StatusCode;
use gourze_core::{ApiResponse, AppError, ListQuery, PaginationParams};
use gourze_models::{CATEGORY_LIST, Category, CreateCategoryDto, UpdateCategoryDto};
use tracing::instrument;

use crate::docs::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ApiPath, ApiQuery, ValidatedJson};

use super::service::CategoryService;

/// List course categories
#[utoipa::path(
    get,
    path = "/api/courses/categories",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of categories", body = Vec<Category>),
        (status = 400, description = "Invalid filter or paging parameters", body = ErrorResponse)
    ),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<Vec<(String, String)>>,
) -> Result<ApiResponse<Vec<Category>>, AppError> {
    let query = ListQuery::parse(&params, &CATEGORY_LIST).map_err(AppError::bad_request)?;
    let (categories, total) = CategoryService::list_categories(&state.db, &query).await?;
    Ok(ApiResponse::paginated(categories, query.meta(total)))
}

#[utoipa::path(
    get,
    path = "/api/courses/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Category>, AppError> {
    let category = CategoryService::get_category(&state.db, id).await?;
    Ok(ApiResponse::ok(category))
}

#[utoipa::path(
    post,
    path = "/api/courses/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not signed in as super or admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateCategoryDto>,
) -> Result<(StatusCode, ApiResponse<Category>), AppError> {
    let category = CategoryService::create_category(&state.db, dto).await?;
    Ok(ApiResponse::created("Category created successfully", category))
}

#[utoipa::path(
    put,
    path = "/api/courses/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 401, description = "Not signed in as super or admin", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateCategoryDto>,
) -> Result<ApiResponse<Category>, AppError> {
    let category = CategoryService::update_category(&state.db, id, dto).await?;
    Ok(ApiResponse::with_message("Category updated successfully", category))
}

#[utoipa::path(
    delete,
    path = "/api/courses/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted category", body = Category),
        (status = 401, description = "Not signed in as super or admin", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Category>, AppError> {
    let category = CategoryService::delete_category(&state.db, id).await?;
    Ok(ApiResponse::with_message("Category deleted successfully", category))
}
