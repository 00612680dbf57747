//! Customer Area Directory
//!
//! Customers register with a free-text service area. Dispatch only needs the
//! contact projection of every customer sharing an area label.

pub mod entity;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use entity::{Customer, Recipient};
pub use memory::InMemoryCustomerDirectory;
pub use postgres::PgCustomerRepository;
pub use repository::AreaDirectory;
