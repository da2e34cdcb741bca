use std::sync::Arc;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::auth::authenticate;
use crate::middleware::role::{Gate, authorize};
use crate::modules::auth::router::init_auth_router;
use crate::modules::categories::router::init_categories_router;
use crate::modules::chapters::router::init_chapters_router;
use crate::modules::courses::router::init_courses_router;
use crate::modules::media::router::init_media_router;
use crate::modules::orders::router::init_orders_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

fn auth_routes(state: &AppState) -> Router<AppState> {
    match state.rate_limit_config.auth_governor_config() {
        Some(config) => init_auth_router().layer(GovernorLayer::new(Arc::new(config))),
        None => init_auth_router(),
    }
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes(&state))
        .nest(
            "/users",
            init_users_router().route_layer(middleware::from_fn_with_state(Gate::STAFF, authorize)),
        )
        .nest(
            "/media",
            init_media_router(state.bunny_config.max_upload_bytes),
        )
        .nest(
            "/courses",
            init_courses_router()
                .nest("/categories", init_categories_router())
                .nest("/{id}/chapters", init_chapters_router()),
        )
        .nest(
            "/orders",
            init_orders_router()
                .route_layer(middleware::from_fn_with_state(Gate::AUTHENTICATED, authorize)),
        )
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api)
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
