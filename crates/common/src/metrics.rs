//! Metrics collection for ShardChat
//!
//! This module provides Prometheus metrics for observability. Generation
//! runs are unbounded, so the duration buckets reach into the hours.

use lazy_static::lazy_static;
use prometheus::{Histogram, IntCounter, IntGauge, Registry};
use std::sync::Arc;

/// Metrics registry for ShardChat
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    pub registry: Arc<Registry>,
    pub requests: RequestMetrics,
    pub launch: LaunchMetrics,
}

/// Request-level metrics
#[derive(Debug, Clone)]
pub struct RequestMetrics {
    /// Total number of chat-completion requests
    pub requests_total: IntCounter,

    /// Total number of successful requests
    pub requests_success: IntCounter,

    /// Total number of failed requests
    pub requests_failed: IntCounter,

    /// End-to-end request duration
    pub request_duration: Histogram,

    /// Assembled prompt size in characters
    pub prompt_chars: Histogram,

    /// Current in-flight requests
    pub active_requests: IntGauge,
}

/// Launch/subprocess metrics
#[derive(Debug, Clone)]
pub struct LaunchMetrics {
    /// Total distributed runs launched
    pub launches_total: IntCounter,

    /// Runs that exited non-zero
    pub launch_failures: IntCounter,

    /// Runs that produced empty stdout with exit code zero
    pub empty_outputs: IntCounter,

    /// Wall-clock duration of the external run
    pub run_duration: Histogram,
}

lazy_static! {
    /// Global metrics registry instance
    pub static ref METRICS: MetricsRegistry = MetricsRegistry::new();
}

impl MetricsRegistry {
    /// Create a new metrics registry
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        let requests_total = IntCounter::new(
            "chat_requests_total",
            "Total number of chat-completion requests",
        )
        .unwrap();

        let requests_success = IntCounter::new(
            "chat_requests_success_total",
            "Total number of successful chat-completion requests",
        )
        .unwrap();

        let requests_failed = IntCounter::new(
            "chat_requests_failed_total",
            "Total number of failed chat-completion requests",
        )
        .unwrap();

        let request_duration = Histogram::with_opts(
            prometheus::HistogramOpts::new(
                "chat_request_duration_seconds",
                "End-to-end chat-completion request duration in seconds",
            )
            .buckets(vec![
                0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0, 3600.0,
            ]),
        )
        .unwrap();

        let prompt_chars = Histogram::with_opts(
            prometheus::HistogramOpts::new(
                "chat_prompt_chars",
                "Assembled prompt size in characters",
            )
            .buckets(vec![
                100.0, 1000.0, 10_000.0, 50_000.0, 100_000.0, 300_000.0, 600_000.0,
            ]),
        )
        .unwrap();

        let active_requests = IntGauge::new(
            "chat_active_requests",
            "Current number of in-flight chat-completion requests",
        )
        .unwrap();

        let launches_total = IntCounter::new(
            "launch_runs_total",
            "Total number of distributed generation runs launched",
        )
        .unwrap();

        let launch_failures = IntCounter::new(
            "launch_runs_failed_total",
            "Distributed runs that exited non-zero",
        )
        .unwrap();

        let empty_outputs = IntCounter::new(
            "launch_empty_outputs_total",
            "Successful runs that produced empty stdout",
        )
        .unwrap();

        let run_duration = Histogram::with_opts(
            prometheus::HistogramOpts::new(
                "launch_run_duration_seconds",
                "Wall-clock duration of the external generation run in seconds",
            )
            .buckets(vec![
                0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0, 3600.0,
            ]),
        )
        .unwrap();

        // Register all metrics
        registry.register(Box::new(requests_total.clone())).unwrap();
        registry
            .register(Box::new(requests_success.clone()))
            .unwrap();
        registry
            .register(Box::new(requests_failed.clone()))
            .unwrap();
        registry
            .register(Box::new(request_duration.clone()))
            .unwrap();
        registry.register(Box::new(prompt_chars.clone())).unwrap();
        registry
            .register(Box::new(active_requests.clone()))
            .unwrap();

        registry.register(Box::new(launches_total.clone())).unwrap();
        registry
            .register(Box::new(launch_failures.clone()))
            .unwrap();
        registry.register(Box::new(empty_outputs.clone())).unwrap();
        registry.register(Box::new(run_duration.clone())).unwrap();

        let requests = RequestMetrics {
            requests_total,
            requests_success,
            requests_failed,
            request_duration,
            prompt_chars,
            active_requests,
        };

        let launch = LaunchMetrics {
            launches_total,
            launch_failures,
            empty_outputs,
            run_duration,
        };

        MetricsRegistry {
            registry,
            requests,
            launch,
        }
    }

    /// Gather all metrics as text
    pub fn gather(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registry() {
        let metrics = MetricsRegistry::new();

        metrics.requests.requests_total.inc();
        metrics.requests.active_requests.inc();
        metrics.launch.launches_total.inc();

        let output = metrics.gather();
        assert!(output.contains("chat_requests_total"));
        assert!(output.contains("launch_runs_total"));
    }
}
