//! Prometheus metrics.
//!
//! Nothing in the request path depends on these values. When no recorder is
//! installed (observability disabled) the `metrics` macros are no-ops, so
//! the helpers below can be called unconditionally.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use registrar_core::ErrorKind;
use std::time::{Duration, Instant};

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Installs the global Prometheus recorder and spawns its upkeep task.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(handle)
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let uri_path = req.uri().path().to_owned();

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or(uri_path);

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status.clone()).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path, "status" => status).record(latency);

    if let Some(kind) = response.extensions().get::<ErrorKind>() {
        track_api_error(*kind);
    }

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router exposing the Prometheus text format at `/metrics`.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

pub fn track_api_error(kind: ErrorKind) {
    counter!("http_errors_total", "error_type" => kind.as_str()).increment(1);
}

/// Counts one store operation, e.g. `"insert_student"` or `"delete_course"`.
pub fn track_db_operation(operation: &'static str) {
    counter!("database_operations_total", "operation" => operation).increment(1);
}

pub fn track_student_created() {
    counter!("students_created_total").increment(1);
}

pub fn track_course_created() {
    counter!("courses_created_total").increment(1);
}

pub fn track_enrollment_created() {
    counter!("enrollments_created_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_error_counter_is_labelled_by_kind() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            track_api_error(ErrorKind::AlreadyEnrolled);
            track_api_error(ErrorKind::AlreadyEnrolled);
            track_db_operation("insert_enrollment");
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"http_errors_total{error_type="already_enrolled"} 2"#));
        assert!(rendered.contains(r#"database_operations_total{operation="insert_enrollment"} 1"#));
    }

    #[test]
    fn test_helpers_without_recorder_are_noops() {
        track_student_created();
        track_course_created();
        track_enrollment_created();
    }
}
