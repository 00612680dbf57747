//! Area Directory Trait

use async_trait::async_trait;

use super::entity::{Customer, Recipient};
use crate::shared::error::Result;

/// Read access to registered customers.
///
/// Area matching is plain string equality on the stored label.
#[async_trait]
pub trait AreaDirectory: Send + Sync {
    /// Contacts of every customer in `area`, in a stable order.
    ///
    /// No match is an empty list, not an error.
    async fn lookup_by_area(&self, area: &str) -> Result<Vec<Recipient>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>>;

    /// All customers, newest registration first.
    async fn list_all(&self) -> Result<Vec<Customer>>;

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
