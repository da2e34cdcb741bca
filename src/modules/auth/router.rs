use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::role::{Gate, authorize};
use crate::state::AppState;

use super::controller::{me, refresh, signin, signout, signup};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signin", post(signin))
        .route("/signup", post(signup))
        .route("/refresh", post(refresh))
        .route("/signout", post(signout))
        .route(
            "/me",
            get(me).route_layer(middleware::from_fn_with_state(Gate::AUTHENTICATED, authorize)),
        )
}
