//! Prometheus metrics for the mail service.
//!
//! - Dispatch outcomes by template (sent, failed)
//! - Template misses and request validation failures
//! - Delivery log write failures
//! - Email provider latency

mod helpers;

pub use helpers::{encode_metrics, EmailMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "villa_mail";

lazy_static! {
    /// Emails handed to the provider, by template and outcome
    pub static ref EMAILS_DISPATCHED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_emails_dispatched_total", METRIC_PREFIX),
        "Emails handed to the provider",
        &["template", "outcome"]
    ).unwrap();

    /// Requests naming an absent or inactive template
    pub static ref TEMPLATE_MISSES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_template_misses_total", METRIC_PREFIX),
        "Dispatch requests for absent or inactive templates"
    ).unwrap();

    /// Requests rejected before any I/O
    pub static ref VALIDATION_FAILURES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_validation_failures_total", METRIC_PREFIX),
        "Dispatch requests rejected by validation"
    ).unwrap();

    /// Delivery log appends that failed after a send
    pub static ref LOG_WRITE_FAILURES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_log_write_failures_total", METRIC_PREFIX),
        "Delivery log entries that could not be written"
    ).unwrap();

    /// Time spent waiting on the email provider
    pub static ref GATEWAY_LATENCY: HistogramVec = register_histogram_vec!(
        format!("{}_gateway_latency_seconds", METRIC_PREFIX),
        "Email provider call latency in seconds",
        &["provider"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();
}
