//! Notification audit entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit entry to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub area: String,
    pub message: String,
    /// Delivered volume, not the size of the area
    pub recipients_count: i64,
    pub sent_by: i64,
}

impl NewNotification {
    pub fn new(area: impl Into<String>, message: impl Into<String>, recipients_count: usize, sent_by: i64) -> Self {
        Self {
            area: area.into(),
            message: message.into(),
            recipients_count: recipients_count as i64,
            sent_by,
        }
    }
}

/// A stored audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: i64,
    pub area: String,
    pub message: String,
    pub recipients_count: i64,
    pub sent_by: i64,
    /// Technician display name, when the store can resolve it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStats {
    pub total_notifications: i64,
    pub total_recipients: i64,
    pub unique_areas: i64,
}
