use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::middleware::role::{Gate, authorize};
use crate::state::AppState;

use super::controller::{
    create_chapter, delete_chapter, get_chapter, list_chapters, update_chapter,
};

/// Mounted under `/courses/{id}/chapters`.
pub fn init_chapters_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_chapters).merge(
                post(create_chapter)
                    .route_layer(middleware::from_fn_with_state(Gate::AUTHENTICATED, authorize)),
            ),
        )
        .route(
            "/{chapter_id}",
            get(get_chapter).merge(
                put(update_chapter)
                    .delete(delete_chapter)
                    .route_layer(middleware::from_fn_with_state(Gate::AUTHENTICATED, authorize)),
            ),
        )
}
