//! Notification Dispatch
//!
//! Fan-out of one alert message to every customer in a set of areas:
//!
//! - `request`: caller input, normalization and validation
//! - `engine`: per-area lookup, bounded per-recipient sends, audit
//! - `report`: per-area outcomes folded into the response envelope
//! - `service`: the caller-facing entry point tying them together

pub mod engine;
pub mod report;
pub mod request;
pub mod service;

pub use engine::{AuditFailurePolicy, DispatchConfig, DispatchEngine};
pub use report::{
    aggregate, AreaOutcome, AreaResult, AreaStatus, DispatchErrorEntry, DispatchReport, DispatchResponse,
    RecipientFailure,
};
pub use request::{AreaSelection, DispatchBody, DispatchRequest, ValidationPolicy};
pub use service::NotificationService;
