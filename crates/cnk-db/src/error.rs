//! Database-specific error types and conversions.

use cnk_core::error::PortalError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query rejected: {0}")]
    Query(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Transaction conflict: {0}")]
    Conflict(String),

    #[error("Refused by store: last admin account")]
    LastAdmin,
}

impl DbError {
    /// Classify a failed account write by the error text SurrealDB
    /// reports for it.
    pub(crate) fn from_write(message: String) -> Self {
        if message.contains(crate::schema::LAST_ADMIN_SIGNAL) {
            DbError::LastAdmin
        } else if is_retryable(&message) {
            DbError::Conflict(message)
        } else {
            DbError::Query(message)
        }
    }
}

fn is_retryable(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("conflict") || message.contains("can be retried")
}

impl From<DbError> for PortalError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => PortalError::NotFound { entity, id },
            DbError::Hashing(msg) => PortalError::Crypto(msg),
            DbError::LastAdmin => PortalError::LastAdmin,
            other => PortalError::Database(other.to_string()),
        }
    }
}
