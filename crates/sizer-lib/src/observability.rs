//! Observability infrastructure for the workload sizer
//!
//! Prometheus metrics (request latency, per-outcome counters, in-flight
//! gauge) and structured logging for significant sizing events.

use prometheus::{
    register_histogram, register_int_counter_vec, register_int_gauge, Histogram, IntCounterVec,
    IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::coordinator::RecommendationOutcome;
use crate::models::SizingRecommendation;

/// Histogram buckets for request latency (seconds). Requests include a
/// simulated round trip, so the buckets run into whole seconds.
const LATENCY_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<SizerMetricsInner> = OnceLock::new();

struct SizerMetricsInner {
    request_latency_seconds: Histogram,
    requests_total: IntCounterVec,
    requests_in_flight: IntGauge,
}

impl SizerMetricsInner {
    fn new() -> Self {
        Self {
            request_latency_seconds: register_histogram!(
                "workload_sizer_request_latency_seconds",
                "Time from submit to outcome, including simulated latency",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register request_latency_seconds"),

            requests_total: register_int_counter_vec!(
                "workload_sizer_requests_total",
                "Recommendation requests by outcome kind",
                &["outcome"]
            )
            .expect("Failed to register requests_total"),

            requests_in_flight: register_int_gauge!(
                "workload_sizer_requests_in_flight",
                "Requests currently being computed"
            )
            .expect("Failed to register requests_in_flight"),
        }
    }
}

/// Lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct SizerMetrics {
    _private: (),
}

impl Default for SizerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SizerMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(SizerMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &SizerMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_request_latency(&self, duration_secs: f64) {
        self.inner().request_latency_seconds.observe(duration_secs);
    }

    pub fn inc_outcome(&self, outcome: &RecommendationOutcome) {
        self.inner()
            .requests_total
            .with_label_values(&[outcome_label(outcome)])
            .inc();
    }

    pub fn inc_in_flight(&self) {
        self.inner().requests_in_flight.inc();
    }

    pub fn dec_in_flight(&self) {
        self.inner().requests_in_flight.dec();
    }

    pub fn in_flight(&self) -> i64 {
        self.inner().requests_in_flight.get()
    }
}

fn outcome_label(outcome: &RecommendationOutcome) -> &'static str {
    match outcome {
        RecommendationOutcome::Success { .. } => "success",
        RecommendationOutcome::ValidationFailed { .. } => "validation_failed",
        RecommendationOutcome::ParseFailed { .. } => "parse_failed",
        RecommendationOutcome::InsufficientData => "insufficient_data",
        RecommendationOutcome::InternalFailure { .. } => "internal_failure",
        RecommendationOutcome::Superseded => "superseded",
    }
}

/// Structured logger for sizing events
#[derive(Clone)]
pub struct SizerLogger {
    instance: String,
}

impl SizerLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_recommendations(&self, source: &str, recommendations: &[SizingRecommendation]) {
        let costs: Vec<u64> = recommendations
            .iter()
            .map(|r| r.estimated_monthly_cost)
            .collect();
        info!(
            event = "recommendations_generated",
            instance = %self.instance,
            source = %source,
            tiers = recommendations.len(),
            monthly_costs_usd = ?costs,
            "Generated sizing recommendations"
        );
    }

    pub fn log_validation_failure(&self, fields: &[String]) {
        info!(
            event = "validation_failed",
            instance = %self.instance,
            fields = ?fields,
            "Request rejected with field-level errors"
        );
    }

    pub fn log_parse_failure(&self, file_name: &str, reason: &str) {
        warn!(
            event = "parse_failed",
            instance = %self.instance,
            file = %file_name,
            reason = %reason,
            "Uploaded file rejected"
        );
    }

    pub fn log_startup(&self, version: &str) {
        info!(
            event = "sizer_started",
            instance = %self.instance,
            version = %version,
            "Workload sizer started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "sizer_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Workload sizer shutting down"
        );
    }
}
