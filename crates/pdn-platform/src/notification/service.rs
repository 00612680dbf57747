//! Audit Logger
//!
//! Records one entry per area after its sends complete. Unlike a
//! fire-and-forget audit trail, failures propagate: the dispatch engine
//! decides what an unrecorded area means.

use std::sync::Arc;

use tracing::{error, info};

use super::entity::{NewNotification, NotificationRecord, NotificationStats};
use super::repository::AuditStore;
use crate::shared::error::Result;

#[derive(Clone)]
pub struct AuditLogger {
    store: Arc<dyn AuditStore>,
}

impl AuditLogger {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Append a record for `area` with the delivered count.
    pub async fn record(&self, area: &str, message: &str, delivered: usize, sender_id: i64) -> Result<i64> {
        let entry = NewNotification::new(area, message, delivered, sender_id);

        match self.store.insert(&entry).await {
            Ok(id) => {
                info!(
                    record_id = id,
                    area = %area,
                    delivered,
                    sender_id,
                    "Notification recorded"
                );
                Ok(id)
            }
            Err(e) => {
                error!(area = %area, sender_id, error = %e, "Failed to record notification");
                Err(e)
            }
        }
    }

    pub async fn history(&self) -> Result<Vec<NotificationRecord>> {
        self.store.find_all().await
    }

    pub async fn history_for(&self, sender_id: i64) -> Result<Vec<NotificationRecord>> {
        self.store.find_by_sender(sender_id).await
    }

    pub async fn stats(&self) -> Result<NotificationStats> {
        self.store.stats().await
    }
}
