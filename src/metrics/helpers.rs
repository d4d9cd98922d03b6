//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    EMAILS_DISPATCHED_TOTAL, GATEWAY_LATENCY, LOG_WRITE_FAILURES_TOTAL, TEMPLATE_MISSES_TOTAL,
    VALIDATION_FAILURES_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording dispatch metrics
pub struct EmailMetrics;

impl EmailMetrics {
    /// Record an email accepted by the provider
    pub fn record_sent(template: &str) {
        EMAILS_DISPATCHED_TOTAL
            .with_label_values(&[template, "sent"])
            .inc();
    }

    /// Record an email rejected by the provider
    pub fn record_failed(template: &str) {
        EMAILS_DISPATCHED_TOTAL
            .with_label_values(&[template, "failed"])
            .inc();
    }

    pub fn record_template_miss() {
        TEMPLATE_MISSES_TOTAL.inc();
    }

    pub fn record_validation_failure() {
        VALIDATION_FAILURES_TOTAL.inc();
    }

    pub fn record_log_failure() {
        LOG_WRITE_FAILURES_TOTAL.inc();
    }

    /// Observe how long a provider call took
    pub fn observe_gateway_latency(provider: &str, elapsed: Duration) {
        GATEWAY_LATENCY
            .with_label_values(&[provider])
            .observe(elapsed.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_metrics_are_encoded() {
        EmailMetrics::record_sent("metrics_test_template");
        EmailMetrics::observe_gateway_latency("metrics_test_provider", Duration::from_millis(20));

        let output = encode_metrics().unwrap();
        assert!(output.contains("villa_mail_emails_dispatched_total"));
        assert!(output.contains("metrics_test_template"));
        assert!(output.contains("villa_mail_gateway_latency_seconds"));
    }
}
