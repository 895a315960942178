//! # Database Error Types
//!
//! Error types for the persistence layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                        │
//! │                                                             │
//! │  SQLite Error (sqlx::Error)                                 │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  DbError (this module) ← adds context and categorization    │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  Caller surfaces a human-readable message; the process      │
//! │  never crashes and - thanks to the transaction boundaries - │
//! │  never observes partial state                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use brew_core::{CoreError, StockStore};
use thiserror::Error;

/// Database and domain-conflict errors of the persistence layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// State conflict: opening a shift while one is open, closing a
    /// shift that is not open, re-cancelling a cancelled order.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Withdraw/transfer/move exceeding the available bucket quantity.
    ///
    /// Rejected before mutation; no partial ledger entry is written.
    #[error("Insufficient {store:?} stock for {ingredient}: available {available}, requested {requested}")]
    InsufficientStock {
        ingredient: String,
        store: StockStore,
        available: f64,
        requested: f64,
    },

    /// Operation not allowed in the order's current status
    /// (e.g. replacing items of a completed order, cancelling a
    /// completed order).
    #[error("Order {order_id} is {status}, cannot perform operation")]
    InvalidOrderStatus { order_id: String, status: String },

    /// Business rule violation from brew-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Unique constraint violation.
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        DbError::Conflict(message.into())
    }

    /// Creates an InvalidOrderStatus error.
    pub fn invalid_status(order_id: impl Into<String>, status: impl std::fmt::Debug) -> Self {
        DbError::InvalidOrderStatus {
            order_id: order_id.into(),
            status: format!("{status:?}"),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE: "UNIQUE constraint failed: <table>.<column>"
                // FK: "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
