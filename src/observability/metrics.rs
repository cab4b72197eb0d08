use crate::config::ServiceConfig;
use crate::errors::Result;
use prometheus::{
    HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

/// Content type of the Prometheus text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Request metrics backed by an owned registry.
///
/// Cloning is cheap and every clone records into the same registry, so one
/// instance is built at startup and handed to the router. Tests build their
/// own instances without touching any process-global state.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    /// http_request_count_total{method, path}
    requests_total: IntCounterVec,

    /// http_request_duration_seconds{method, path, status}
    request_duration: HistogramVec,
}

impl Metrics {
    pub fn new(service: &ServiceConfig) -> Result<Self> {
        let registry = Registry::new();

        let app_info = IntGaugeVec::new(
            Opts::new("app_info", "Application info"),
            &["service", "version"],
        )?;

        let requests_total = IntCounterVec::new(
            Opts::new("http_request_count_total", "Total HTTP requests"),
            &["method", "path"],
        )?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.010, 0.050, 0.100, 0.500, 1.0, 2.5, 5.0,
            ]),
            &["method", "path", "status"],
        )?;

        registry.register(Box::new(app_info.clone()))?;
        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;

        app_info
            .with_label_values(&[service.name.as_str(), service.version.as_str()])
            .set(1);

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            request_duration,
        })
    }

    pub fn record_request(&self, method: &str, path: &str) {
        self.requests_total.with_label_values(&[method, path]).inc();
    }

    pub fn record_duration(&self, method: &str, path: &str, status: u16, duration: Duration) {
        self.request_duration
            .with_label_values(&[method, path, &status.to_string()])
            .observe(duration.as_secs_f64());
    }

    /// Current value of the request counter for one label pair.
    pub fn request_count(&self, method: &str, path: &str) -> u64 {
        self.requests_total.with_label_values(&[method, path]).get()
    }

    /// Export all metrics in Prometheus format
    pub fn encode(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        Ok(encoder.encode_to_string(&metric_families)?)
    }
}
