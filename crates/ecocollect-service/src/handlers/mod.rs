//! HTTP handlers.

pub mod assignment;
pub mod completion;
pub mod events;
pub mod health;
pub mod reports;
pub mod users;

use serde::{Deserialize, Serialize};

use ecocollect_core::WasteReport;

/// Structured result of a trigger handler invocation.
///
/// Trigger handlers communicate their outcome through this envelope
/// rather than HTTP status codes: precondition-not-met is a successful
/// no-op, "no workers available" is a non-throwing failure, and store
/// failures surface in `error`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TriggerResponse {
    /// Whether the handler completed (including as a no-op).
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// The mutated report, when a mutation happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<WasteReport>,
    /// Error detail, when the handler failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TriggerResponse {
    /// A successful mutation.
    #[must_use]
    pub fn mutated(message: impl Into<String>, report: WasteReport) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(report),
            error: None,
        }
    }

    /// A successful no-op (precondition not met; duplicate delivery).
    #[must_use]
    pub fn noop(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    /// A non-throwing failure (e.g. no workers available).
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    /// A handler failure with error detail.
    #[must_use]
    pub fn error(message: impl Into<String>, error: impl ToString) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error.to_string()),
        }
    }
}
