//! Tracing setup and per-request logging.
//!
//! Every request runs inside a `request` span carrying its id, so events
//! emitted by handlers and services are tied to the request that caused them.
//! The id is taken from an incoming `x-request-id` header when present and
//! echoed back on the response.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, Level, error, info, info_span, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_DIR: &str = "storage/logs";

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn request_id(req: &Request) -> String {
    req.headers()
        .get(&REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn level_for(status: u16) -> Level {
    match status {
        500.. => Level::ERROR,
        400..=499 => Level::WARN,
        _ => Level::INFO,
    }
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let id = request_id(&req);
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let span = info_span!("request", request_id = %id, %method, path = %route);
    let mut response = next.run(req).instrument(span.clone()).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;
    let level = level_for(status);
    span.in_scope(|| {
        if level == Level::ERROR {
            error!(status, latency_ms, "Request failed");
        } else if level == Level::WARN {
            warn!(status, latency_ms, "Request rejected");
        } else {
            info!(status, latency_ms, "Request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID, value);
    }
    response
}

/// `RUST_LOG` when set, else `LOG_LEVEL` (default `info`) for the gourze
/// crates with quieter framework targets.
fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::new(format!(
            "{crate}={level},gourze_db={level},gourze_cdn={level},tower_http=warn,sqlx=warn",
            crate = env!("CARGO_CRATE_NAME"),
        ))
    })
}

/// Installs the global subscriber:
///
/// - console: compact, filtered by [`console_filter`]
/// - `storage/logs/gourze.log`: errors only, rotated daily
/// - `storage/logs/gourze.json`: info and above as JSON, rotated daily
///
/// File writes go through background workers; keep the returned guards alive
/// for the life of the process or buffered lines are lost.
pub fn init_tracing() -> anyhow::Result<Vec<WorkerGuard>> {
    std::fs::create_dir_all(LOG_DIR)?;

    let (error_writer, error_guard) =
        tracing_appender::non_blocking(RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "gourze.log"));
    let (json_writer, json_guard) =
        tracing_appender::non_blocking(RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "gourze.json"));

    let console_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_filter(console_filter());

    let error_layer = fmt::layer()
        .with_writer(error_writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(EnvFilter::new("error"));

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_writer)
        .with_current_span(true)
        .with_span_list(false)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(error_layer)
        .with(json_layer)
        .try_init()?;

    info!(log_dir = LOG_DIR, "Tracing initialized");
    Ok(vec![error_guard, json_guard])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_level_for_status() {
        assert_eq!(level_for(200), Level::INFO);
        assert_eq!(level_for(302), Level::INFO);
        assert_eq!(level_for(404), Level::WARN);
        assert_eq!(level_for(500), Level::ERROR);
    }

    #[test]
    fn test_request_id_reuses_header() {
        let req = Request::builder()
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(&req), "abc-123");

        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(request_id(&req).len(), 36);
    }
}
