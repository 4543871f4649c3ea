//! Error types for EcoCollect storage.

use ecocollect_core::DomainError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was missing.
        entity: &'static str,
        /// The ID that was looked up.
        id: String,
    },

    /// A lifecycle precondition failed (idempotency guard or illegal
    /// transition).
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StoreError {
    /// Whether this error is an idempotency guard firing: the record was
    /// already advanced past the requested mutation. Duplicate trigger
    /// deliveries surface here and are treated as no-op successes.
    #[must_use]
    pub fn is_already_processed(&self) -> bool {
        matches!(
            self,
            Self::Domain(DomainError::AlreadyAssigned { .. } | DomainError::AlreadyFinalized { .. })
        )
    }
}
