use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::middleware::role::{Gate, authorize};
use crate::state::AppState;

use super::controller::{
    create_category, delete_category, get_category, list_categories, update_category,
};

/// Reads are public; writes are staff-only.
pub fn init_categories_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_categories).merge(
                post(create_category)
                    .route_layer(middleware::from_fn_with_state(Gate::STAFF, authorize)),
            ),
        )
        .route(
            "/{id}",
            get(get_category).merge(
                put(update_category)
                    .delete(delete_category)
                    .route_layer(middleware::from_fn_with_state(Gate::STAFF, authorize)),
            ),
        )
}
