//! Change-feed message types.
//!
//! The record store emits a `FeedMessage` for every report create and
//! update. Each message carries the list of event channel strings it
//! matches (both the concrete per-document channel and the collection
//! wildcard), so consumers filter by string equality against a pattern,
//! then by payload predicate.

use serde::{Deserialize, Serialize};

use crate::{ReportId, WasteReport};

/// Channel prefix for report document events.
pub const REPORTS_CHANNEL: &str = "collections.waste_reports.documents";

/// Wildcard pattern matched by every report update event.
pub const REPORT_UPDATE_PATTERN: &str = "collections.waste_reports.documents.*.update";

/// Wildcard pattern matched by every report create event.
pub const REPORT_CREATE_PATTERN: &str = "collections.waste_reports.documents.*.create";

/// The kind of document change a feed message describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A report was created.
    Create,

    /// A report was updated.
    Update,
}

impl ChangeKind {
    /// Event-string suffix for this kind.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

/// One change event as delivered to feed subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedMessage {
    /// Channel strings this event matches.
    pub events: Vec<String>,

    /// Post-change snapshot of the report.
    pub payload: WasteReport,
}

impl FeedMessage {
    /// Build the feed message for a report change.
    #[must_use]
    pub fn report(kind: ChangeKind, payload: WasteReport) -> Self {
        Self {
            events: report_event_channels(&payload.id, kind),
            payload,
        }
    }

    /// Whether this message describes a report update.
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.events.iter().any(|e| e == REPORT_UPDATE_PATTERN)
    }

    /// Whether this message describes a report creation.
    #[must_use]
    pub fn is_create(&self) -> bool {
        self.events.iter().any(|e| e == REPORT_CREATE_PATTERN)
    }
}

/// Channel strings for a change to one report document.
#[must_use]
pub fn report_event_channels(id: &ReportId, kind: ChangeKind) -> Vec<String> {
    vec![
        format!("{REPORTS_CHANNEL}.{id}.{}", kind.suffix()),
        format!("{REPORTS_CHANNEL}.*.{}", kind.suffix()),
    ]
}
