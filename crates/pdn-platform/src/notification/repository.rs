//! Audit Store Trait

use async_trait::async_trait;

use super::entity::{NewNotification, NotificationRecord, NotificationStats};
use crate::shared::error::Result;

/// Append-only notification log.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append an entry and return its id.
    async fn insert(&self, entry: &NewNotification) -> Result<i64>;

    /// All entries, newest first.
    async fn find_all(&self) -> Result<Vec<NotificationRecord>>;

    /// Entries sent by one technician, newest first.
    async fn find_by_sender(&self, sender_id: i64) -> Result<Vec<NotificationRecord>>;

    async fn stats(&self) -> Result<NotificationStats>;
}
