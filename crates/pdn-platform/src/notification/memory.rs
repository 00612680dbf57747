//! In-memory Audit Store

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::entity::{NewNotification, NotificationRecord, NotificationStats};
use super::repository::AuditStore;
use crate::shared::error::Result;

#[derive(Default)]
pub struct InMemoryAuditStore {
    records: Mutex<Vec<NotificationRecord>>,
    sender_names: HashMap<i64, String>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `sender_id` to `name` on reads, like the technician join.
    pub fn with_sender_name(mut self, sender_id: i64, name: impl Into<String>) -> Self {
        self.sender_names.insert(sender_id, name.into());
        self
    }

    /// Records in insertion order.
    pub fn records(&self) -> Vec<NotificationRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    fn newest_first(&self, filter: impl Fn(&NotificationRecord) -> bool) -> Vec<NotificationRecord> {
        let mut records: Vec<_> = self.records.lock().iter().filter(|r| filter(r)).cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn insert(&self, entry: &NewNotification) -> Result<i64> {
        let mut records = self.records.lock();
        let id = records.len() as i64 + 1;

        records.push(NotificationRecord {
            id,
            area: entry.area.clone(),
            message: entry.message.clone(),
            recipients_count: entry.recipients_count,
            sent_by: entry.sent_by,
            sent_by_name: self.sender_names.get(&entry.sent_by).cloned(),
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<NotificationRecord>> {
        Ok(self.newest_first(|_| true))
    }

    async fn find_by_sender(&self, sender_id: i64) -> Result<Vec<NotificationRecord>> {
        Ok(self.newest_first(|r| r.sent_by == sender_id))
    }

    async fn stats(&self) -> Result<NotificationStats> {
        let records = self.records.lock();
        let areas: HashSet<&str> = records.iter().map(|r| r.area.as_str()).collect();

        Ok(NotificationStats {
            total_notifications: records.len() as i64,
            total_recipients: records.iter().map(|r| r.recipients_count).sum(),
            unique_areas: areas.len() as i64,
        })
    }
}
