//! Dispatch outcomes and aggregation
//!
//! Each area ends in exactly one [`AreaOutcome`]. [`aggregate`] folds the
//! outcomes of a batch into a [`DispatchReport`] without touching any store,
//! and [`DispatchResponse`] wraps the report in the caller-facing envelope.

use serde::{Deserialize, Serialize};

use super::request::DispatchRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaStatus {
    Success,
    NoCustomers,
    Error,
}

impl AreaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaStatus::Success => "success",
            AreaStatus::NoCustomers => "no_customers",
            AreaStatus::Error => "error",
        }
    }
}

/// A send that did not reach the relay or was refused by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientFailure {
    pub email: String,
    pub error: String,
}

/// How processing one area ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaOutcome {
    /// Sends ran for every recipient and the audit step completed.
    /// `sent + failures.len() == recipients` always holds.
    Delivered {
        area: String,
        recipients: usize,
        sent: usize,
        failures: Vec<RecipientFailure>,
    },
    NoCustomers {
        area: String,
    },
    /// Lookup or audit failed; nothing from this area counts toward totals.
    Failed {
        area: String,
        reason: String,
    },
}

impl AreaOutcome {
    pub fn area(&self) -> &str {
        match self {
            AreaOutcome::Delivered { area, .. }
            | AreaOutcome::NoCustomers { area }
            | AreaOutcome::Failed { area, .. } => area,
        }
    }

    pub fn status(&self) -> AreaStatus {
        match self {
            AreaOutcome::Delivered { .. } => AreaStatus::Success,
            AreaOutcome::NoCustomers { .. } => AreaStatus::NoCustomers,
            AreaOutcome::Failed { .. } => AreaStatus::Error,
        }
    }

    pub fn to_result(&self) -> AreaResult {
        match self {
            AreaOutcome::Delivered {
                area,
                recipients,
                sent,
                failures,
            } => AreaResult {
                area: area.clone(),
                status: AreaStatus::Success,
                recipients_count: *recipients,
                sent_count: *sent,
                failed_count: failures.len(),
                message: None,
            },
            AreaOutcome::NoCustomers { area } => AreaResult {
                area: area.clone(),
                status: AreaStatus::NoCustomers,
                recipients_count: 0,
                sent_count: 0,
                failed_count: 0,
                message: Some(format!("No customers found in area: {}", area)),
            },
            AreaOutcome::Failed { area, reason } => AreaResult {
                area: area.clone(),
                status: AreaStatus::Error,
                recipients_count: 0,
                sent_count: 0,
                failed_count: 0,
                message: Some(reason.clone()),
            },
        }
    }
}

/// Per-area line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaResult {
    pub area: String,
    pub status: AreaStatus,
    #[serde(rename = "recipients")]
    pub recipients_count: usize,
    #[serde(rename = "sent")]
    pub sent_count: usize,
    #[serde(rename = "failed")]
    pub failed_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Entry of the report's error list: a failed recipient or a failed area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DispatchErrorEntry {
    Recipient { email: String, error: String },
    Area(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub areas: Vec<String>,
    pub message: String,
    pub total_recipients: usize,
    pub total_sent: usize,
    pub total_failed: usize,
    pub results: Vec<AreaResult>,
    pub errors: Vec<DispatchErrorEntry>,
    #[serde(skip)]
    pub overall_success: bool,
}

impl DispatchReport {
    pub fn result_for(&self, area: &str) -> Option<&AreaResult> {
        self.results.iter().find(|r| r.area == area)
    }

    pub fn successful_areas(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == AreaStatus::Success)
            .count()
    }
}

/// Fold per-area outcomes, in request order, into a report.
///
/// Totals only include `Delivered` areas. The batch succeeds when at least
/// one area was delivered, even if every send in it failed.
pub fn aggregate(request: &DispatchRequest, outcomes: Vec<AreaOutcome>) -> DispatchReport {
    let mut report = DispatchReport {
        areas: request.areas().to_vec(),
        message: request.message().to_string(),
        total_recipients: 0,
        total_sent: 0,
        total_failed: 0,
        results: Vec::with_capacity(outcomes.len()),
        errors: Vec::new(),
        overall_success: false,
    };

    for outcome in outcomes {
        report.results.push(outcome.to_result());

        match outcome {
            AreaOutcome::Delivered {
                recipients,
                sent,
                failures,
                ..
            } => {
                report.overall_success = true;
                report.total_recipients += recipients;
                report.total_sent += sent;
                report.total_failed += failures.len();
                report.errors.extend(
                    failures
                        .into_iter()
                        .map(|f| DispatchErrorEntry::Recipient { email: f.email, error: f.error }),
                );
            }
            AreaOutcome::NoCustomers { .. } => {}
            AreaOutcome::Failed { area, reason } => {
                report
                    .errors
                    .push(DispatchErrorEntry::Area(format!("Error processing area {}: {}", area, reason)));
            }
        }
    }

    report
}

/// Caller-facing envelope: `{success, message, data}`.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    pub success: bool,
    pub message: String,
    pub data: DispatchReport,
}

impl DispatchResponse {
    /// A batch where no area was delivered is a server-side failure.
    pub fn is_server_error(&self) -> bool {
        !self.success
    }
}

impl From<DispatchReport> for DispatchResponse {
    fn from(report: DispatchReport) -> Self {
        let message = if report.overall_success {
            format!(
                "Notification sent successfully to {} recipients across {} area(s)",
                report.total_sent,
                report.areas.len()
            )
        } else {
            "Failed to send notifications to any areas".to_string()
        };

        Self {
            success: report.overall_success,
            message,
            data: report,
        }
    }
}
