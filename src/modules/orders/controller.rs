use anyhow::anyhow;
use axum::extract::State;
use axum::http::StatusCode;
use gourze_core::{
    ApiResponse, AppError, FieldFilter, FilterOp, FilterValues, ListQuery, PaginationParams,
};
use gourze_models::{CreateOrderDto, ORDER_LIST, Order, UpdateOrderDto};
use tracing::instrument;

use crate::docs::ErrorResponse;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::validator::{ApiPath, ApiQuery, ValidatedJson};

use super::service::OrderService;

/// Loads an order the caller may see: their own, or any for staff.
async fn visible_order(
    state: &AppState,
    current_user: &CurrentUser,
    id: i64,
) -> Result<Order, AppError> {
    let order = OrderService::get_order(&state.db, id).await?;
    if !current_user.can_act_for(order.user_id) {
        return Err(AppError::unauthorized(anyhow!(
            "Order belongs to another user"
        )));
    }
    Ok(order)
}

/// List orders
///
/// Generic users only ever see their own orders. Filterable by `status`,
/// `userId`, and `amount`.
#[utoipa::path(
    get,
    path = "/api/orders",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of orders with their items", body = Vec<Order>),
        (status = 400, description = "Invalid filter or paging parameters", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Orders"
)]
#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiQuery(params): ApiQuery<Vec<(String, String)>>,
) -> Result<ApiResponse<Vec<Order>>, AppError> {
    let mut query = ListQuery::parse(&params, &ORDER_LIST).map_err(AppError::bad_request)?;
    if !current_user.is_staff() {
        query.push_filter(FieldFilter::new(
            "user_id",
            FilterOp::Equals,
            FilterValues::Integer(vec![current_user.id]),
        ));
    }

    let (orders, total) = OrderService::list_orders(&state.db, &query).await?;
    Ok(ApiResponse::paginated(orders, query.meta(total)))
}

/// Place an order
///
/// The buyer defaults to the caller; only super and admin may order for
/// someone else. Prices are taken from the courses.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderDto,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Validation error or unknown course", body = ErrorResponse),
        (status = 401, description = "Not signed in, or ordering for another user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Orders"
)]
#[instrument(skip(state))]
pub async fn create_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateOrderDto>,
) -> Result<(StatusCode, ApiResponse<Order>), AppError> {
    let buyer_id = dto.user_id.unwrap_or(current_user.id);
    if !current_user.can_act_for(buyer_id) {
        return Err(AppError::unauthorized(anyhow!(
            "Cannot place an order for another user"
        )));
    }

    let order = OrderService::create_order(&state.db, buyer_id, dto).await?;
    Ok(ApiResponse::created("Order created successfully", order))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with its items", body = Order),
        (status = 401, description = "Not signed in, or not the buyer", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Orders"
)]
#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Order>, AppError> {
    let order = visible_order(&state, &current_user, id).await?;
    Ok(ApiResponse::ok(order))
}

/// Update an order
///
/// Only super and admin may change the status. Setting it to `paid` enrolls
/// the buyer in the ordered courses.
#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = UpdateOrderDto,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 401, description = "Not the buyer, or a status change by a generic user", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Orders"
)]
#[instrument(skip(state))]
pub async fn update_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateOrderDto>,
) -> Result<ApiResponse<Order>, AppError> {
    visible_order(&state, &current_user, id).await?;
    if dto.status.is_some() && !current_user.is_staff() {
        return Err(AppError::unauthorized(anyhow!(
            "Only super and admin users may change an order's status"
        )));
    }

    let order = OrderService::update_order(&state.db, id, dto).await?;
    Ok(ApiResponse::with_message("Order updated successfully", order))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Deleted order", body = Order),
        (status = 401, description = "Not signed in, or not the buyer", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Orders"
)]
#[instrument(skip(state))]
pub async fn delete_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Order>, AppError> {
    visible_order(&state, &current_user, id).await?;
    let order = OrderService::delete_order(&state.db, id).await?;
    Ok(ApiResponse::with_message("Order deleted successfully", order))
}
