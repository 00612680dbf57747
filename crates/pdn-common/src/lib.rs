//! Power Delay Notifier Common
//!
//! Types shared by the platform crate and the operator binaries, plus the
//! logging bootstrap every binary calls on startup.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod logging;

/// Identity of the technician issuing a dispatch.
///
/// Authentication happens outside this workspace; callers hand over the
/// already-verified id and display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SenderIdentity {
    pub id: i64,
    pub name: String,
}

impl SenderIdentity {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for SenderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_display() {
        let sender = SenderIdentity::new(7, "Ravi Kumar");
        assert_eq!(sender.to_string(), "Ravi Kumar (#7)");
    }

    #[test]
    fn test_sender_serde() {
        let json = serde_json::to_value(SenderIdentity::new(3, "Asha")).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Asha");
    }
}
