//! PostgreSQL Area Directory
//!
//! Reads the `customers` table. Schema management lives outside this crate;
//! `id` is BIGINT and the timestamps are TIMESTAMPTZ.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::debug;

use super::entity::{Customer, Recipient};
use super::repository::AreaDirectory;
use crate::shared::error::Result;

const CUSTOMER_COLUMNS: &str = "id, name, email, area, created_at, updated_at";

pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_customer(row: &PgRow) -> Customer {
        Customer {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            area: row.get("area"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl AreaDirectory for PgCustomerRepository {
    async fn lookup_by_area(&self, area: &str) -> Result<Vec<Recipient>> {
        let rows = sqlx::query("SELECT id, name, email FROM customers WHERE area = $1 ORDER BY id")
            .bind(area)
            .fetch_all(&self.pool)
            .await?;

        let recipients: Vec<Recipient> = rows
            .iter()
            .map(|row| Recipient {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
            })
            .collect();

        debug!(area = %area, count = recipients.len(), "Resolved area recipients");

        Ok(recipients)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let query = format!("SELECT {} FROM customers WHERE email = $1", CUSTOMER_COLUMNS);
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(Self::parse_customer))
    }

    async fn list_all(&self) -> Result<Vec<Customer>> {
        let query = format!("SELECT {} FROM customers ORDER BY created_at DESC, id DESC", CUSTOMER_COLUMNS);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(Self::parse_customer).collect())
    }
}
