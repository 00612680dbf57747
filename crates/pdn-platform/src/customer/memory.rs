//! In-memory Area Directory
//!
//! Backs tests and dry runs. Registration and area updates enforce the same
//! rules the relational store does: unique email, exact area labels.

use async_trait::async_trait;
use parking_lot::RwLock;

use super::entity::{Customer, Recipient};
use super::repository::AreaDirectory;
use crate::shared::error::{PlatformError, Result};

#[derive(Default)]
pub struct InMemoryCustomerDirectory {
    customers: RwLock<Vec<Customer>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a customer, assigning the next id.
    pub fn register(&self, name: impl Into<String>, email: impl Into<String>, area: impl Into<String>) -> Result<Customer> {
        let email = email.into();
        let mut customers = self.customers.write();

        if customers.iter().any(|c| c.email == email) {
            return Err(PlatformError::duplicate("Customer", "email", email));
        }

        let id = customers.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let customer = Customer::new(id, name, email, area);
        customers.push(customer.clone());

        Ok(customer)
    }

    pub fn update_area(&self, email: &str, area: impl Into<String>) -> Result<Customer> {
        let mut customers = self.customers.write();
        let customer = customers
            .iter_mut()
            .find(|c| c.email == email)
            .ok_or_else(|| PlatformError::not_found("Customer", email))?;

        customer.move_to_area(area);
        Ok(customer.clone())
    }

    pub fn len(&self) -> usize {
        self.customers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.read().is_empty()
    }
}

#[async_trait]
impl AreaDirectory for InMemoryCustomerDirectory {
    async fn lookup_by_area(&self, area: &str) -> Result<Vec<Recipient>> {
        Ok(self
            .customers
            .read()
            .iter()
            .filter(|c| c.in_area(area))
            .map(Customer::recipient)
            .collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        Ok(self.customers.read().iter().find(|c| c.email == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Customer>> {
        let mut customers = self.customers.read().clone();
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(customers)
    }
}
