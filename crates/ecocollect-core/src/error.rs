//! Error types for EcoCollect domain operations.

use crate::ReportStatus;

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Errors that can occur when mutating a report's lifecycle state.
///
/// `AlreadyAssigned` and `AlreadyFinalized` are the idempotency guards:
/// a duplicate trigger delivery surfaces as one of these, and callers
/// treat them as a safe no-op rather than a failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A status change that is not a legal forward transition.
    #[error("invalid status transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// The current status.
        from: ReportStatus,
        /// The requested status.
        to: ReportStatus,
    },

    /// The report already has a worker bound (or is past `pending`).
    #[error("report already assigned: {report_id}")]
    AlreadyAssigned {
        /// The report in question.
        report_id: String,
    },

    /// The report has already been finalized (`collected_at` set).
    #[error("report already finalized: {report_id}")]
    AlreadyFinalized {
        /// The report in question.
        report_id: String,
    },

    /// Finalization requested for a report that is not `collected`.
    #[error("report not collected yet: {report_id}")]
    NotCollected {
        /// The report in question.
        report_id: String,
    },
}
