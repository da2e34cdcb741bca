use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::middleware::role::{Gate, authorize};
use crate::state::AppState;

use super::controller::{create_course, delete_course, get_course, list_courses, update_course};

/// Reads are public; writes need a signed-in caller, and updates or deletes
/// are further limited to the author and staff by the handlers.
pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_courses).merge(
                post(create_course)
                    .route_layer(middleware::from_fn_with_state(Gate::AUTHENTICATED, authorize)),
            ),
        )
        .route(
            "/{id}",
            get(get_course).merge(
                put(update_course)
                    .delete(delete_course)
                    .route_layer(middleware::from_fn_with_state(Gate::AUTHENTICATED, authorize)),
            ),
        )
}
