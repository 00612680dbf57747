//! Notification Service
//!
//! Entry point for callers that already authenticated a technician: accepts
//! the raw request body, validates it, runs the dispatch and returns the
//! response envelope. History and connectivity checks are exposed here too
//! so callers only hold one handle.

use std::sync::Arc;

use pdn_common::SenderIdentity;
use tracing::{info, warn};

use super::engine::DispatchEngine;
use super::report::DispatchResponse;
use super::request::{DispatchBody, DispatchRequest, ValidationPolicy};
use crate::email::EmailTransport;
use crate::notification::{AuditLogger, NotificationRecord, NotificationStats};
use crate::shared::error::Result;

pub struct NotificationService {
    engine: DispatchEngine,
    audit: AuditLogger,
    transport: Arc<dyn EmailTransport>,
    policy: ValidationPolicy,
}

impl NotificationService {
    pub fn new(
        engine: DispatchEngine,
        audit: AuditLogger,
        transport: Arc<dyn EmailTransport>,
        policy: ValidationPolicy,
    ) -> Self {
        Self {
            engine,
            audit,
            transport,
            policy,
        }
    }

    /// Validate and dispatch. `Err` only for rejected requests; a batch that
    /// reached no area is an `Ok` response with `success == false`.
    pub async fn send(&self, body: DispatchBody, sender: &SenderIdentity) -> Result<DispatchResponse> {
        let request = DispatchRequest::try_from(body)?;
        self.send_request(&request, sender).await
    }

    pub async fn send_request(&self, request: &DispatchRequest, sender: &SenderIdentity) -> Result<DispatchResponse> {
        if let Err(e) = self.policy.check(request) {
            warn!(sender = %sender, error = %e, "Rejected dispatch request");
            return Err(e);
        }

        info!(sender = %sender, areas = ?request.areas(), "Dispatching notification");
        let report = self.engine.dispatch(request, sender).await;

        Ok(DispatchResponse::from(report))
    }

    pub async fn history(&self) -> Result<Vec<NotificationRecord>> {
        self.audit.history().await
    }

    pub async fn history_for(&self, sender_id: i64) -> Result<Vec<NotificationRecord>> {
        self.audit.history_for(sender_id).await
    }

    pub async fn stats(&self) -> Result<NotificationStats> {
        self.audit.stats().await
    }

    pub async fn test_email_service(&self) -> Result<bool> {
        self.transport.test_connection().await
    }
}
