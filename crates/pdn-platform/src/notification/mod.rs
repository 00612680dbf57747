//! Notification Audit
//!
//! One append-only record per area per dispatch that reached the send stage,
//! plus the read-side history queries.

pub mod entity;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod service;

pub use entity::{NewNotification, NotificationRecord, NotificationStats};
pub use memory::InMemoryAuditStore;
pub use postgres::PgNotificationRepository;
pub use repository::AuditStore;
pub use service::AuditLogger;
