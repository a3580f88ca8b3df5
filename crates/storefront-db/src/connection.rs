//! Database connection management.
//!
//! A [`DbConnection`] owns one SQLite session. Repositories never open or
//! close connections themselves; they borrow the session for the duration
//! of a unit of work:
//!
//! ```ignore
//! use storefront_db::{connection::DbConnection, repository::order::OrderRepository};
//!
//! let mut db = DbConnection::open("/path/to/storefront.db")?;
//! let orders = db.orders().orders()?;
//! ```

use std::path::Path;

use diesel::{sql_query, Connection, RunQueryDsl, SqliteConnection};
use tracing::debug;

use crate::{
    error::{DbError, Result},
    migration::apply_migrations,
    repository::{order::OrderStore, product::ProductStore},
};

/// Database connection wrapper with migration support.
pub struct DbConnection {
    conn: SqliteConnection,
}

impl DbConnection {
    /// Opens a database file and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy();
        debug!(path = %path_str, "opening database");
        let mut conn = SqliteConnection::establish(&path_str)?;

        // WAL mode for better concurrent access
        sql_query("PRAGMA journal_mode = WAL;").execute(&mut conn)?;

        Self::prepare(conn)
    }

    /// Opens a private in-memory database with the schema applied.
    pub fn open_in_memory() -> Result<Self> {
        let conn = SqliteConnection::establish(":memory:")?;
        Self::prepare(conn)
    }

    /// Opens a database connection without running migrations.
    ///
    /// Use this when you know the database is already migrated.
    pub fn open_without_migrations<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy();
        let mut conn = SqliteConnection::establish(&path_str)?;
        sql_query("PRAGMA foreign_keys = ON;").execute(&mut conn)?;
        Ok(Self { conn })
    }

    fn prepare(mut conn: SqliteConnection) -> Result<Self> {
        // SQLite leaves foreign keys off unless asked, per connection
        sql_query("PRAGMA foreign_keys = ON;").execute(&mut conn)?;

        apply_migrations(&mut conn).map_err(|e| DbError::MigrationError(e.to_string()))?;

        Ok(Self { conn })
    }

    /// Gets a mutable reference to the underlying connection.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Borrows this session as an order store.
    pub fn orders(&mut self) -> OrderStore<'_> {
        OrderStore::new(&mut self.conn)
    }

    /// Borrows this session as a product store.
    pub fn products(&mut self) -> ProductStore<'_> {
        ProductStore::new(&mut self.conn)
    }
}

impl std::ops::Deref for DbConnection {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl std::ops::DerefMut for DbConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}
