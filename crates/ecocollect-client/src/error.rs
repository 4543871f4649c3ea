//! Client error types.

/// Errors returned by the EcoCollect client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network or protocol error from the HTTP client.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Insufficient permissions for the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The record was already in the requested (or a later) state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other API error.
    #[error("api error {status}: {code}: {message}")]
    Api {
        /// Machine-readable error code from the service.
        code: String,
        /// Human-readable message.
        message: String,
        /// HTTP status.
        status: u16,
    },
}
