use axum::extract::State;
use axum::http::StatusCode;
use gourze_core::{ApiResponse, AppError, ListQuery, PaginationParams};
use gourze_models::{CreateUserDto, USER_LIST, UpdateUserDto, User};
use tracing::instrument;

use crate::docs::ErrorResponse;
use crate::metrics::track_user_created;
use crate::state::AppState;
use crate::validator::{ApiPath, ApiQuery, ValidatedJson};

use super::service::UserService;

/// List users
///
/// Filterable by `username`, `email`, `fullName`, `role`, `id`, and
/// `createdAt`, e.g. `?username.op=contains&username.val=doe`.
#[utoipa::path(
    get,
    path = "/api/users",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of users", body = Vec<User>),
        (status = 400, description = "Invalid filter or paging parameters", body = ErrorResponse),
        (status = 401, description = "Not signed in as super or admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<Vec<(String, String)>>,
) -> Result<ApiResponse<Vec<User>>, AppError> {
    let query = ListQuery::parse(&params, &USER_LIST).map_err(AppError::bad_request)?;
    let (users, total) = UserService::list_users(&state.db, &query).await?;
    Ok(ApiResponse::paginated(users, query.meta(total)))
}

/// Create a user with any role
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not signed in as super or admin", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, ApiResponse<User>), AppError> {
    let user = UserService::create_user(&state.db, dto).await?;
    track_user_created(user.role.as_str());
    Ok(ApiResponse::created("User created successfully", user))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<User>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(ApiResponse::ok(user))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<ApiResponse<User>, AppError> {
    let user = UserService::update_user(&state.db, id, dto).await?;
    Ok(ApiResponse::with_message("User updated successfully", user))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted user", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<User>, AppError> {
    let user = UserService::delete_user(&state.db, id).await?;
    Ok(ApiResponse::with_message("User deleted successfully", user))
}
