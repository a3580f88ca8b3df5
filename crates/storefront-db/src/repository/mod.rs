//! Repository pattern implementations for database operations.
//!
//! Each repository borrows one session and handles a single domain:
//!
//! - [`OrderStore`](order::OrderStore) - Order aggregates with lines and products
//! - [`ProductStore`](product::ProductStore) - Catalog products

pub mod order;
pub mod product;
