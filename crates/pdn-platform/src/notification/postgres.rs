//! PostgreSQL Audit Store
//!
//! Writes to `notifications` and resolves sender names from
//! `registered_technicians` on read. `id`, `recipients_count` and `sent_by`
//! are BIGINT, `created_at` is TIMESTAMPTZ with a `now()` default.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::debug;

use super::entity::{NewNotification, NotificationRecord, NotificationStats};
use super::repository::AuditStore;
use crate::shared::error::Result;

const SELECT_WITH_SENDER: &str = "SELECT n.id, n.area, n.message, n.recipients_count, n.sent_by, \
     t.name AS sent_by_name, n.created_at \
     FROM notifications n \
     LEFT JOIN registered_technicians t ON n.sent_by = t.id";

pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_row(row: &PgRow) -> NotificationRecord {
        NotificationRecord {
            id: row.get("id"),
            area: row.get("area"),
            message: row.get("message"),
            recipients_count: row.get("recipients_count"),
            sent_by: row.get("sent_by"),
            sent_by_name: row.get("sent_by_name"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl AuditStore for PgNotificationRepository {
    async fn insert(&self, entry: &NewNotification) -> Result<i64> {
        let row = sqlx::query(
            "INSERT INTO notifications (area, message, recipients_count, sent_by) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&entry.area)
        .bind(&entry.message)
        .bind(entry.recipients_count)
        .bind(entry.sent_by)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = row.get("id");
        debug!(id, area = %entry.area, "Inserted notification record");

        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<NotificationRecord>> {
        let query = format!("{} ORDER BY n.created_at DESC, n.id DESC", SELECT_WITH_SENDER);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(Self::parse_row).collect())
    }

    async fn find_by_sender(&self, sender_id: i64) -> Result<Vec<NotificationRecord>> {
        let query = format!(
            "{} WHERE n.sent_by = $1 ORDER BY n.created_at DESC, n.id DESC",
            SELECT_WITH_SENDER
        );
        let rows = sqlx::query(&query)
            .bind(sender_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(Self::parse_row).collect())
    }

    async fn stats(&self) -> Result<NotificationStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total_notifications, \
             COALESCE(SUM(recipients_count), 0)::BIGINT AS total_recipients, \
             COUNT(DISTINCT area) AS unique_areas \
             FROM notifications",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(NotificationStats {
            total_notifications: row.get("total_notifications"),
            total_recipients: row.get("total_recipients"),
            unique_areas: row.get("unique_areas"),
        })
    }
}
