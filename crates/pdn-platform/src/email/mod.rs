//! Alert Email
//!
//! Rendering of the outage alert and the transports that deliver it.

pub mod smtp;
pub mod template;
pub mod transport;

pub use smtp::{SmtpConfig, SmtpEmailTransport, SmtpSecurity};
pub use template::{AlertTemplate, RenderedAlert};
pub use transport::{EmailTransport, OutgoingEmail, RecordingEmailTransport};
