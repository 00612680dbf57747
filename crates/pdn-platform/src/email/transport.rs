//! Email Transport Trait

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::shared::error::{PlatformError, Result};

/// One addressed alert email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivers a single email.
///
/// `Ok` means the relay accepted the message; anything else is a failure for
/// that recipient only.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;

    /// Check that the relay is reachable and accepts our credentials.
    async fn test_connection(&self) -> Result<bool>;
}

/// Transport that keeps every email in memory.
///
/// Addresses registered with [`failing_for`](Self::failing_for) are rejected,
/// and an optional delay simulates a slow relay.
#[derive(Default)]
pub struct RecordingEmailTransport {
    sent: Mutex<Vec<OutgoingEmail>>,
    rejected: HashSet<String>,
    delay: Option<Duration>,
}

impl RecordingEmailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rejected.extend(addresses.into_iter().map(Into::into));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Accepted emails in acceptance order.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl EmailTransport for RecordingEmailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.rejected.contains(&email.to) {
            return Err(PlatformError::email(format!("Recipient rejected: {}", email.to)));
        }

        debug!(to = %email.to, subject = %email.subject, "Recorded email");
        self.sent.lock().push(email.clone());
        Ok(())
    }

    async fn test_connection(&self) -> Result<bool> {
        Ok(true)
    }
}
