use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::delivery::{AttemptDetails, DeliveryAttempt, DeliveryLog};
use crate::gateway::{DeliveryOutcome, EmailGateway, OutgoingEmail};
use crate::metrics::EmailMetrics;
use crate::template::TemplateStore;

use super::{DispatchError, DispatchReceipt, NotificationRequest};

/// Statistics for the email dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    /// Dispatch calls received
    pub total_requests: AtomicU64,
    /// Emails accepted by the provider
    pub total_sent: AtomicU64,
    /// Emails rejected by the provider
    pub total_failed: AtomicU64,
    /// Requests naming an absent or inactive template
    pub template_not_found: AtomicU64,
    /// Requests rejected before any I/O
    pub validation_failed: AtomicU64,
    /// Delivery log writes that failed
    pub log_failures: AtomicU64,
}

impl DispatcherStats {
    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            total_sent: self.total_sent.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
            template_not_found: self.template_not_found.load(Ordering::Relaxed),
            validation_failed: self.validation_failed.load(Ordering::Relaxed),
            log_failures: self.log_failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub total_requests: u64,
    pub total_sent: u64,
    pub total_failed: u64,
    pub template_not_found: u64,
    pub validation_failed: u64,
    pub log_failures: u64,
}

/// Renders templates and hands them to the email gateway.
///
/// Each call makes at most one delivery attempt and writes exactly one log
/// entry once the gateway has answered. Retries and duplicate suppression are
/// left to the caller.
pub struct EmailDispatcher {
    templates: Arc<dyn TemplateStore>,
    gateway: Arc<dyn EmailGateway>,
    delivery_log: Arc<dyn DeliveryLog>,
    stats: DispatcherStats,
}

impl EmailDispatcher {
    pub fn new(
        templates: Arc<dyn TemplateStore>,
        gateway: Arc<dyn EmailGateway>,
        delivery_log: Arc<dyn DeliveryLog>,
    ) -> Self {
        Self {
            templates,
            gateway,
            delivery_log,
            stats: DispatcherStats::default(),
        }
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Fetch, render, send and log a single email
    #[tracing::instrument(
        name = "dispatcher.dispatch",
        skip(self, request),
        fields(template = %request.template_name, provider = self.gateway.name())
    )]
    pub async fn dispatch(
        &self,
        request: NotificationRequest,
    ) -> Result<DispatchReceipt, DispatchError> {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);

        let request = request.normalized();
        if let Err(e) = request.validate() {
            self.stats.validation_failed.fetch_add(1, Ordering::Relaxed);
            EmailMetrics::record_validation_failure();
            return Err(e);
        }

        let template = match self.templates.find_active(&request.template_name).await {
            Ok(Some(template)) => template,
            Ok(None) => {
                self.stats.template_not_found.fetch_add(1, Ordering::Relaxed);
                EmailMetrics::record_template_miss();
                tracing::info!(template = %request.template_name, "No active email template");
                return Err(DispatchError::TemplateNotFound(request.template_name));
            }
            Err(e) => {
                tracing::error!(error = %e, "Template lookup failed");
                return Err(DispatchError::Store(e));
            }
        };

        let rendered = template.render(&request.variables);
        let email = OutgoingEmail {
            to: request.recipient_email.clone(),
            subject: rendered.subject,
            html: rendered.html,
            text: rendered.text,
        };

        let started = Instant::now();
        let outcome = self.gateway.send(&email).await;
        EmailMetrics::observe_gateway_latency(self.gateway.name(), started.elapsed());

        let details = AttemptDetails {
            template_id: template.id,
            template_name: template.name,
            recipient_email: request.recipient_email,
            recipient_name: request.recipient_name,
            subject: email.subject,
            variables: request.variables,
        };

        match outcome {
            DeliveryOutcome::Delivered { id } => {
                let attempt = details.sent(id.clone());
                self.record(&attempt).await;

                self.stats.total_sent.fetch_add(1, Ordering::Relaxed);
                EmailMetrics::record_sent(&attempt.template_name);
                tracing::info!(message_id = %id, log_id = %attempt.id, "Email sent");

                Ok(DispatchReceipt {
                    id,
                    log_id: attempt.id,
                })
            }
            DeliveryOutcome::Rejected { error } => {
                let attempt = details.failed(error.clone());
                self.record(&attempt).await;

                self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                EmailMetrics::record_failed(&attempt.template_name);
                tracing::warn!(error = %error, log_id = %attempt.id, "Email delivery failed");

                Err(DispatchError::Gateway {
                    message: error,
                    log_id: attempt.id,
                })
            }
        }
    }

    /// Append to the delivery log. A failed write leaves the send outcome as is.
    async fn record(&self, attempt: &DeliveryAttempt) {
        if let Err(e) = self.delivery_log.append(attempt).await {
            self.stats.log_failures.fetch_add(1, Ordering::Relaxed);
            EmailMetrics::record_log_failure();
            tracing::warn!(
                error = %e,
                log_id = %attempt.id,
                status = attempt.status.as_str(),
                "Failed to write delivery log entry"
            );
        }
    }
}
