//! Error types for storefront-db.

use diesel::result::DatabaseErrorKind;
use miette::Diagnostic;
use thiserror::Error;

/// Database error type for storefront-db operations.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Database connection failed: {0}")]
    #[diagnostic(
        code(storefront_db::connection),
        help("Check if the database file exists and is accessible")
    )]
    ConnectionError(String),

    #[error("Database query failed: {0}")]
    #[diagnostic(code(storefront_db::query))]
    QueryError(String),

    #[error("Constraint violation: {0}")]
    #[diagnostic(
        code(storefront_db::constraint),
        help("Check that every referenced product exists and quantities are positive")
    )]
    ConstraintViolation(String),

    #[error("Database migration failed: {0}")]
    #[diagnostic(
        code(storefront_db::migration),
        help("The database schema may be corrupted. Try removing the database file.")
    )]
    MigrationError(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(storefront_db::not_found))]
    NotFound(String),

    #[error("Order line references product `{0}` which has not been saved")]
    #[diagnostic(
        code(storefront_db::unsaved_product),
        help("Save the product first; order lines can only reference stored products by id")
    )]
    UnsavedProduct(String),
}

impl From<diesel::result::Error> for DbError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => DbError::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation,
                info,
            ) => DbError::ConstraintViolation(info.message().to_string()),
            diesel::result::Error::DatabaseError(_, info) => {
                DbError::QueryError(info.message().to_string())
            }
            other => DbError::QueryError(other.to_string()),
        }
    }
}

impl From<diesel::result::ConnectionError> for DbError {
    fn from(err: diesel::result::ConnectionError) -> Self {
        DbError::ConnectionError(err.to_string())
    }
}

/// Result type alias for storefront-db operations.
pub type Result<T> = std::result::Result<T, DbError>;
