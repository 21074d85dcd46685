//! Metrics collection for observability

use prometheus::{
    CounterVec, Histogram, HistogramVec, Opts, Registry,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_histogram_with_registry,
};
use std::sync::Arc;
use once_cell::sync::Lazy;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // HTTP surface
    pub api_requests: CounterVec,
    pub api_request_duration: HistogramVec,

    // Assistant / completion service
    pub assistant_requests: CounterVec,
    pub upstream_duration: Histogram,

    // Aggregation
    pub fixture_fallbacks: CounterVec,

    // Google collaborator
    pub google_syncs: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let api_requests = register_counter_vec_with_registry!(
            Opts::new("dashboard_api_requests_total", "Total dashboard API requests"),
            &["endpoint", "status"],
            registry
        )?;

        let api_request_duration = register_histogram_vec_with_registry!(
            "dashboard_api_request_duration_seconds",
            "Dashboard API request duration in seconds",
            &["endpoint"],
            registry
        )?;

        let assistant_requests = register_counter_vec_with_registry!(
            Opts::new("assistant_requests_total", "Total assistant queries"),
            &["status"],
            registry
        )?;

        let upstream_duration = register_histogram_with_registry!(
            "assistant_upstream_duration_seconds",
            "Completion service call duration in seconds",
            registry
        )?;

        let fixture_fallbacks = register_counter_vec_with_registry!(
            Opts::new("fixture_fallbacks_total", "Aggregations served from a fixture bundle"),
            &["dataset"],
            registry
        )?;

        let google_syncs = register_counter_vec_with_registry!(
            Opts::new("google_syncs_total", "Google sync runs by outcome"),
            &["status"],
            registry
        )?;

        Ok(Self {
            registry,
            api_requests,
            api_request_duration,
            assistant_requests,
            upstream_duration,
            fixture_fallbacks,
            google_syncs,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record an API request outcome and its latency
    pub fn record_request(&self, endpoint: &str, success: bool, seconds: f64) {
        let status = if success { "success" } else { "error" };
        self.api_requests.with_label_values(&[endpoint, status]).inc();
        self.api_request_duration
            .with_label_values(&[endpoint])
            .observe(seconds);
    }

    /// Record an assistant query
    pub fn record_assistant(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.assistant_requests.with_label_values(&[status]).inc();
    }

    /// Record a fixture fallback for the given 1-based dataset number
    pub fn record_fixture_fallback(&self, dataset: u8) {
        self.fixture_fallbacks
            .with_label_values(&[&dataset.to_string()])
            .inc();
    }

    /// Record a Google sync run
    pub fn record_google_sync(&self, status: &str) {
        self.google_syncs.with_label_values(&[status]).inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
