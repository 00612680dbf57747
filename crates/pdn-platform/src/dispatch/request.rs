//! Dispatch requests
//!
//! A request is a set of area labels plus one message. The wire form allows
//! `areas` to be a single string or an array.

use serde::{Deserialize, Serialize};

use crate::shared::error::{PlatformError, Result};

/// `areas` as sent by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AreaSelection {
    One(String),
    Many(Vec<String>),
}

impl AreaSelection {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            AreaSelection::One(area) => vec![area],
            AreaSelection::Many(areas) => areas,
        }
    }
}

/// Request body as received from a caller.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchBody {
    pub areas: AreaSelection,
    pub message: String,
}

/// A normalized request: trimmed, deduplicated, non-empty area list. Blank
/// labels are kept so [`ValidationPolicy::check`] can report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchRequest {
    areas: Vec<String>,
    message: String,
}

impl DispatchRequest {
    /// Trims every label, drops repeats (first occurrence wins) and trims the
    /// message. Fails only when no label was given at all.
    pub fn new<I, S>(areas: I, message: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for area in areas {
            let area = area.as_ref().trim();
            if !normalized.iter().any(|a| a == area) {
                normalized.push(area.to_string());
            }
        }

        if normalized.is_empty() {
            return Err(PlatformError::validation("At least one area must be specified"));
        }

        Ok(Self {
            areas: normalized,
            message: message.into().trim().to_string(),
        })
    }

    pub fn areas(&self) -> &[String] {
        &self.areas
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl TryFrom<DispatchBody> for DispatchRequest {
    type Error = PlatformError;

    fn try_from(body: DispatchBody) -> Result<Self> {
        DispatchRequest::new(body.areas.into_vec(), body.message)
    }
}

/// Length limits applied before any area is processed, in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub min_area_len: usize,
    pub max_area_len: usize,
    pub min_message_len: usize,
    pub max_message_len: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_area_len: 2,
            max_area_len: 100,
            min_message_len: 10,
            max_message_len: 1000,
        }
    }
}

impl ValidationPolicy {
    /// Check every rule and report all violations in one error.
    pub fn check(&self, request: &DispatchRequest) -> Result<()> {
        let mut errors = Vec::new();

        for area in request.areas() {
            let len = area.chars().count();
            if len < self.min_area_len || len > self.max_area_len {
                errors.push(format!(
                    "Area '{}' must be between {} and {} characters",
                    area, self.min_area_len, self.max_area_len
                ));
            }
        }

        let len = request.message().chars().count();
        if len < self.min_message_len || len > self.max_message_len {
            errors.push(format!(
                "Message must be between {} and {} characters",
                self.min_message_len, self.max_message_len
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PlatformError::validation(errors.join("; ")))
        }
    }
}
