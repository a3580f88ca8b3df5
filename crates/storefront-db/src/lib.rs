//! Order and product persistence for the storefront.
//!
//! The crate wraps a SQLite session ([`connection::DbConnection`]) and
//! exposes repositories that borrow it for one unit of work.

pub mod connection;
pub mod error;
pub mod migration;
pub mod models;
pub mod repository;
pub mod schema;

pub use error::{DbError, Result};

#[cfg(test)]
mod test_utils;
