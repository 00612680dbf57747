//! Shared platform infrastructure

pub mod error;
