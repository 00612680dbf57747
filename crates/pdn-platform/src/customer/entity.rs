//! Customer entity and its dispatch projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered customer.
///
/// `email` is unique across the directory. Customers are never hard-deleted;
/// moving house is an area update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub area: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>, area: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            email: email.into(),
            area: area.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn move_to_area(&mut self, area: impl Into<String>) {
        self.area = area.into();
        self.updated_at = Utc::now();
    }

    pub fn in_area(&self, area: &str) -> bool {
        self.area == area
    }

    pub fn recipient(&self) -> Recipient {
        Recipient {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Contact details of one alert recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_match_is_exact() {
        let customer = Customer::new(1, "Meena", "meena@example.com", "chickpete");
        assert!(customer.in_area("chickpete"));
        assert!(!customer.in_area("Chickpete"));
        assert!(!customer.in_area("chickpete "));
    }

    #[test]
    fn test_move_to_area_touches_updated_at() {
        let mut customer = Customer::new(1, "Meena", "meena@example.com", "chickpete");
        let before = customer.updated_at;
        customer.move_to_area("balepete");
        assert_eq!(customer.area, "balepete");
        assert!(customer.updated_at >= before);
        assert_eq!(customer.created_at, before);
    }

    #[test]
    fn test_recipient_projection() {
        let customer = Customer::new(9, "Irfan", "irfan@example.com", "akkipete");
        assert_eq!(
            customer.recipient(),
            Recipient {
                id: 9,
                name: "Irfan".to_string(),
                email: "irfan@example.com".to_string(),
            }
        );
    }
}
