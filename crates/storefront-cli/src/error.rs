//! Error types for the storefront binary.

use miette::Diagnostic;
use storefront_config::error::ConfigError;
use storefront_db::DbError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum StorefrontError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),

    #[error("Error while {action}")]
    #[diagnostic(code(storefront::io), help("Check file permissions and disk space"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    #[diagnostic(
        code(storefront::json),
        help("Orders are JSON objects with name, address fields and a `lines` array")
    )]
    Json(#[from] serde_json::Error),

    #[error("Order {0} not found")]
    #[diagnostic(code(storefront::order_not_found), help("Run 'storefront orders list' to see stored orders"))]
    OrderNotFound(i32),
}

pub type StorefrontResult<T> = std::result::Result<T, StorefrontError>;

pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> StorefrontResult<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> StorefrontResult<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            StorefrontError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
