//! Power Delay Notifier Platform
//!
//! Technicians broadcast outage alerts to every registered customer in one
//! or more service areas. This crate holds the fan-out workflow and its
//! collaborators:
//!
//! - `customer`: area directory (PostgreSQL and in-memory)
//! - `email`: alert template and transports (SMTP and recording)
//! - `notification`: append-only audit log and history queries
//! - `dispatch`: request handling, fan-out engine and result aggregation

pub mod customer;
pub mod dispatch;
pub mod email;
pub mod notification;
pub mod shared;

pub use customer::{AreaDirectory, Customer, InMemoryCustomerDirectory, PgCustomerRepository, Recipient};
pub use dispatch::{
    aggregate, AreaOutcome, AreaResult, AreaSelection, AreaStatus, AuditFailurePolicy, DispatchBody, DispatchConfig,
    DispatchEngine, DispatchErrorEntry, DispatchReport, DispatchRequest, DispatchResponse, NotificationService,
    RecipientFailure, ValidationPolicy,
};
pub use email::{
    AlertTemplate, EmailTransport, OutgoingEmail, RecordingEmailTransport, RenderedAlert, SmtpConfig,
    SmtpEmailTransport, SmtpSecurity,
};
pub use notification::{
    AuditLogger, AuditStore, InMemoryAuditStore, NewNotification, NotificationRecord, NotificationStats,
    PgNotificationRepository,
};
pub use pdn_common::SenderIdentity;
pub use shared::error::{PlatformError, Result};
