use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
};

use crate::middleware::role::{Gate, authorize};
use crate::state::AppState;

use super::controller::{
    delete_media, get_media, list_media, update_media, upload_photo, upload_video_via_tus,
};

/// `max_upload_bytes` caps the photo upload body.
pub fn init_media_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_media).route_layer(middleware::from_fn_with_state(Gate::OPTIONAL, authorize)),
        )
        .route(
            "/{id}",
            get(get_media)
                .route_layer(middleware::from_fn_with_state(Gate::OPTIONAL, authorize))
                .merge(
                    put(update_media)
                        .delete(delete_media)
                        .route_layer(middleware::from_fn_with_state(Gate::STAFF, authorize)),
                ),
        )
        .route(
            "/upload-photo",
            post(upload_photo)
                .layer(DefaultBodyLimit::max(max_upload_bytes))
                .route_layer(middleware::from_fn_with_state(Gate::AUTHENTICATED, authorize)),
        )
        .route(
            "/upload-video-via-tus",
            post(upload_video_via_tus)
                .route_layer(middleware::from_fn_with_state(Gate::AUTHENTICATED, authorize)),
        )
}
