//! Dispatch Engine
//!
//! Areas are processed one after another. Within an area the sends run as a
//! bounded parallel map: a semaphore caps in-flight sends, every send has its
//! own timeout, and results come back in recipient order before they are
//! counted. A failure anywhere inside an area is caught at the area boundary
//! so the remaining areas still run.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pdn_common::SenderIdentity;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::report::{aggregate, AreaOutcome, DispatchReport, RecipientFailure};
use super::request::DispatchRequest;
use crate::customer::{AreaDirectory, Recipient};
use crate::email::{AlertTemplate, EmailTransport, OutgoingEmail, RenderedAlert};
use crate::notification::AuditLogger;
use crate::shared::error::{PlatformError, Result};

/// What an audit write failure means for an area whose emails already went
/// out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditFailurePolicy {
    /// The area is reported as `error` and its sends are not counted.
    #[default]
    FailArea,
    /// The failure is logged and the area keeps its delivery counts.
    Decoupled,
}

impl FromStr for AuditFailurePolicy {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail_area" => Ok(AuditFailurePolicy::FailArea),
            "decoupled" => Ok(AuditFailurePolicy::Decoupled),
            other => Err(PlatformError::configuration(format!(
                "unknown audit failure policy '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Sends in flight per area; 1 sends sequentially
    pub send_concurrency: usize,
    pub send_timeout: Duration,
    pub audit_failure_policy: AuditFailurePolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            send_concurrency: 1,
            send_timeout: Duration::from_secs(30),
            audit_failure_policy: AuditFailurePolicy::FailArea,
        }
    }
}

pub struct DispatchEngine {
    directory: Arc<dyn AreaDirectory>,
    transport: Arc<dyn EmailTransport>,
    audit: AuditLogger,
    template: AlertTemplate,
    config: DispatchConfig,
}

impl DispatchEngine {
    pub fn new(
        directory: Arc<dyn AreaDirectory>,
        transport: Arc<dyn EmailTransport>,
        audit: AuditLogger,
        template: AlertTemplate,
        config: DispatchConfig,
    ) -> Self {
        Self {
            directory,
            transport,
            audit,
            template,
            config,
        }
    }

    /// Run one dispatch. Never fails as a whole: every problem ends up in the
    /// report, either against a recipient or against an area.
    pub async fn dispatch(&self, request: &DispatchRequest, sender: &SenderIdentity) -> DispatchReport {
        let span = info_span!(
            "dispatch",
            sender_id = sender.id,
            areas = request.areas().len(),
        );

        async {
            let sent_at = Utc::now();
            let mut outcomes = Vec::with_capacity(request.areas().len());

            for area in request.areas() {
                let outcome = match self.process_area(area, request.message(), sender, sent_at).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        error!(area = %area, error = %e, "Error processing area");
                        AreaOutcome::Failed {
                            area: area.clone(),
                            reason: e.to_string(),
                        }
                    }
                };

                metrics::counter!("notifier.areas.processed_total", "status" => outcome.status().as_str())
                    .increment(1);
                outcomes.push(outcome);
            }

            let report = aggregate(request, outcomes);

            info!(
                success = report.overall_success,
                total_recipients = report.total_recipients,
                total_sent = report.total_sent,
                total_failed = report.total_failed,
                "Dispatch complete"
            );

            report
        }
        .instrument(span)
        .await
    }

    async fn process_area(
        &self,
        area: &str,
        message: &str,
        sender: &SenderIdentity,
        sent_at: DateTime<Utc>,
    ) -> Result<AreaOutcome> {
        let recipients = self.directory.lookup_by_area(area).await?;

        if recipients.is_empty() {
            info!(area = %area, "No customers found in area");
            return Ok(AreaOutcome::NoCustomers { area: area.to_string() });
        }

        let alert = self.template.render(area, message, &sender.name, sent_at);
        let failures: Vec<RecipientFailure> = self
            .send_all(&recipients, &alert)
            .await
            .into_iter()
            .filter_map(|result| result.err())
            .collect();
        let sent = recipients.len() - failures.len();

        metrics::counter!("notifier.emails.sent_total").increment(sent as u64);
        metrics::counter!("notifier.emails.failed_total").increment(failures.len() as u64);

        info!(
            area = %area,
            recipients = recipients.len(),
            sent,
            failed = failures.len(),
            "Area sends complete"
        );

        if let Err(e) = self.audit.record(area, message, sent, sender.id).await {
            match self.config.audit_failure_policy {
                AuditFailurePolicy::FailArea => return Err(e),
                AuditFailurePolicy::Decoupled => {
                    metrics::counter!("notifier.audit.failures_total").increment(1);
                    warn!(area = %area, error = %e, "Audit record missing for delivered area");
                }
            }
        }

        Ok(AreaOutcome::Delivered {
            area: area.to_string(),
            recipients: recipients.len(),
            sent,
            failures,
        })
    }

    /// One result per recipient, in recipient order.
    async fn send_all(
        &self,
        recipients: &[Recipient],
        alert: &RenderedAlert,
    ) -> Vec<std::result::Result<(), RecipientFailure>> {
        let semaphore = Semaphore::new(self.config.send_concurrency.clamp(1, Semaphore::MAX_PERMITS));
        let semaphore = &semaphore;

        let sends = recipients.iter().map(|recipient| {
            let email = OutgoingEmail {
                to: recipient.email.clone(),
                subject: alert.subject.clone(),
                html: alert.html.clone(),
            };

            async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return Err(RecipientFailure {
                            email: email.to,
                            error: format!("Send pool closed: {}", e),
                        })
                    }
                };
                self.send_one(email).await
            }
        });

        futures::future::join_all(sends).await
    }

    async fn send_one(&self, email: OutgoingEmail) -> std::result::Result<(), RecipientFailure> {
        let limit = self.config.send_timeout;

        let error = match timeout(limit, self.transport.send(&email)).await {
            Ok(Ok(())) => {
                debug!(to = %email.to, "Email sent");
                return Ok(());
            }
            Ok(Err(e)) => e,
            Err(_) => PlatformError::timeout(format!("send to {}", email.to), limit.as_millis() as u64),
        };

        warn!(to = %email.to, error = %error, "Failed to send email");
        Err(RecipientFailure {
            email: email.to,
            error: error.to_string(),
        })
    }
}
