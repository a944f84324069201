use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

const PREFIX: &str = "courseshop";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    pub static ref AUTH_LOGIN_ATTEMPTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_auth_login_attempts_total"), "Total login attempts"),
        &["status"]
    ).expect("Failed to create auth_login_attempts_total metric");

    pub static ref AUTH_ACTIVE_SESSIONS: Gauge = Gauge::new(
        format!("{PREFIX}_auth_active_sessions"),
        "Number of active sessions"
    ).expect("Failed to create auth_active_sessions metric");

    pub static ref CATALOG_COURSES_TOTAL: Gauge = Gauge::new(
        format!("{PREFIX}_catalog_courses_total"),
        "Total courses in the catalog"
    ).expect("Failed to create catalog_courses_total metric");
}

/// Registers all metrics; safe to call more than once.
pub fn init_metrics() {
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(AUTH_LOGIN_ATTEMPTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(AUTH_ACTIVE_SESSIONS.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_COURSES_TOTAL.clone()));

    tracing::info!("Metrics system initialized");
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

pub fn record_login_attempt(status: &str) {
    AUTH_LOGIN_ATTEMPTS_TOTAL.with_label_values(&[status]).inc();
}

pub fn set_active_sessions(count: usize) {
    AUTH_ACTIVE_SESSIONS.set(count as f64);
}

pub fn set_catalog_courses(count: usize) {
    CATALOG_COURSES_TOTAL.set(count as f64);
}

/// Handler for the /metrics endpoint on the metrics port.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_initialize_without_panic() {
        init_metrics();
        init_metrics();

        let metric_families = REGISTRY.gather();
        assert!(!metric_families.is_empty());
    }

    #[test]
    fn http_requests_are_recorded() {
        init_metrics();

        record_http_request("GET", "/api/courses", 200, Duration::from_millis(5));

        let metrics = REGISTRY.gather();
        assert!(metrics
            .iter()
            .any(|m| m.get_name() == "courseshop_http_requests_total"));
    }

    #[test]
    fn login_attempts_are_recorded() {
        init_metrics();

        record_login_attempt("success");
        record_login_attempt("failure");

        let metrics = REGISTRY.gather();
        assert!(metrics
            .iter()
            .any(|m| m.get_name() == "courseshop_auth_login_attempts_total"));
    }

    #[test]
    fn gauges_track_latest_value() {
        init_metrics();

        set_active_sessions(3);
        assert_eq!(AUTH_ACTIVE_SESSIONS.get(), 3.0);
        set_active_sessions(0);
        assert_eq!(AUTH_ACTIVE_SESSIONS.get(), 0.0);

        set_catalog_courses(12);
        assert_eq!(CATALOG_COURSES_TOTAL.get(), 12.0);
    }
}
