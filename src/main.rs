use std::net::SocketAddr;

use dotenvy::dotenv;
use gourze::logging::init_tracing;
use gourze::metrics::{init_metrics, metrics_app};
use gourze::router::init_router;
use gourze::state::init_app_state;
use tracing::info;

#[tokio::main]
async fn main() {
    dotenv().ok();
    let _log_guards = init_tracing().expect("Failed to initialize tracing");

    let metrics_handle = init_metrics().expect("Failed to initialize metrics");

    let state = init_app_state()
        .await
        .expect("Failed to initialize application state");

    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
        info!("Prometheus metrics available at /metrics");
    }

    let addr = std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");

    info!(%addr, "Server running");
    println!("🚀 Server running on http://{addr}");
    println!("📚 Swagger UI available at http://{addr}/swagger-ui");
    println!("📖 Scalar UI available at http://{addr}/scalar");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
