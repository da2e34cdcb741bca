//! Prometheus metrics: per-route HTTP counters and latency histograms, plus
//! a handful of marketplace counters (sign-ups, sign-ins, orders, uploads).
//!
//! Everything is a no-op when `OBSERVABILITY_ENABLED` is `false` or `0`.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::Context;
use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

static ENABLED: OnceLock<bool> = OnceLock::new();

pub fn is_observability_enabled() -> bool {
    *ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0"))
            .unwrap_or(true)
    })
}

/// Runs `record` only when metrics are on.
fn when_enabled(record: impl FnOnce()) {
    if is_observability_enabled() {
        record();
    }
}

/// Installs the global Prometheus recorder and spawns its upkeep task.
///
/// `Ok(None)` when observability is disabled.
pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )
        .context("Invalid latency buckets")?
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(5));
        loop {
            interval.tick().await;
            upkeep.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// `2xx`, `3xx`, `4xx`, `5xx`, or `other`.
fn status_class(status: u16) -> &'static str {
    match status / 100 {
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "other",
    }
}

/// Counts requests and records their latency, labelled by the matched
/// route template rather than the raw path.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let method = req.method().to_string();
    let route = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => "unmatched".to_string(),
    };

    let in_flight = gauge!("http_requests_in_flight");
    in_flight.increment(1.0);
    let started = Instant::now();

    let response = next.run(req).await;

    let elapsed = started.elapsed().as_secs_f64();
    let status = response.status().as_u16();
    in_flight.decrement(1.0);

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.to_string(),
        "class" => status_class(status)
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "route" => route)
        .record(elapsed);

    response
}

/// Router serving `GET /metrics` in the Prometheus text format.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || std::future::ready(handle.render())))
}

pub fn track_user_signup() {
    when_enabled(|| counter!("gourze_signups_total").increment(1));
}

pub fn track_user_created(role: &str) {
    let role = role.to_string();
    when_enabled(|| counter!("gourze_users_created_total", "role" => role).increment(1));
}

pub fn track_user_login_success(role: &str) {
    let role = role.to_string();
    when_enabled(|| {
        counter!("gourze_signins_total", "outcome" => "success", "role" => role).increment(1)
    });
}

pub fn track_user_login_failure(reason: &'static str) {
    when_enabled(|| {
        counter!("gourze_signins_total", "outcome" => "failure", "reason" => reason).increment(1)
    });
}

pub fn track_tokens_issued(kind: &'static str) {
    when_enabled(|| counter!("gourze_tokens_issued_total", "kind" => kind).increment(1));
}

pub fn track_order_created(amount: f64) {
    when_enabled(|| {
        counter!("gourze_orders_created_total").increment(1);
        histogram!("gourze_order_amount").record(amount);
    });
}

pub fn track_order_paid() {
    when_enabled(|| counter!("gourze_orders_paid_total").increment(1));
}

pub fn track_media_uploaded(media_type: &'static str) {
    when_enabled(|| counter!("gourze_media_uploads_total", "type" => media_type).increment(1));
}
