//! Prometheus metrics for the API server.

use animchat_models::FrameOutcome;
use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "animchat_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "animchat_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "animchat_http_requests_in_flight";

    // Pipeline metrics
    pub const LLM_CALL_DURATION_SECONDS: &str = "animchat_llm_call_duration_seconds";
    pub const LLM_CALLS_TOTAL: &str = "animchat_llm_calls_total";
    pub const FRAMES_TOTAL: &str = "animchat_frames_total";
    pub const PIPELINE_RUNS_TOTAL: &str = "animchat_pipeline_runs_total";
    pub const PIPELINE_LINKS_RETURNED: &str = "animchat_pipeline_links_returned";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "animchat_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record one LLM call for a pipeline stage.
pub fn record_llm_call(stage: &str, success: bool, duration_secs: f64) {
    let labels = [
        ("stage", stage.to_string()),
        ("result", if success { "ok" } else { "error" }.to_string()),
    ];
    counter!(names::LLM_CALLS_TOTAL, &labels).increment(1);
    histogram!(names::LLM_CALL_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record the outcome of one frame render.
pub fn record_frame_outcome(outcome: &FrameOutcome) {
    let status = if outcome.is_rendered() { "rendered" } else { "failed" };
    counter!(names::FRAMES_TOTAL, "status" => status).increment(1);
}

/// Record a finished pipeline run. `outcome` is "success" or the failing stage.
pub fn record_pipeline_outcome(outcome: &str, links: usize) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::PIPELINE_RUNS_TOTAL, &labels).increment(1);
    histogram!(names::PIPELINE_LINKS_RETURNED).record(links as f64);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels (remove IDs, etc.).
fn sanitize_path(path: &str) -> String {
    // Replace UUIDs and numeric IDs with placeholders
    let path = regex_lite::Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .map(|re| re.replace_all(path, ":id").into_owned())
        .unwrap_or_else(|_| path.to_string());
    regex_lite::Regex::new(r"/[0-9]+(/|$)")
        .map(|re| re.replace_all(&path, "/:id$1").into_owned())
        .unwrap_or(path)
}

/// Metrics middleware for HTTP requests.
///
/// Routed requests are labelled with their route template; anything else
/// falls back to the sanitized raw path.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => sanitize_path(request.uri().path()),
    };
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/chat/550e8400-e29b-41d4-a716-446655440000"),
            "/api/chat/:id"
        );
        assert_eq!(sanitize_path("/api/frames/12/retry"), "/api/frames/:id/retry");
        assert_eq!(sanitize_path("/api/chat"), "/api/chat");
    }
}
