//! Error types for the CNK portal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    /// The write would leave the store without an admin account.
    #[error("Refused: last admin account")]
    LastAdmin,
}

impl PortalError {
    /// Whether this error means the looked-up record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortalError::NotFound { .. })
    }
}

pub type PortalResult<T> = Result<T, PortalError>;
