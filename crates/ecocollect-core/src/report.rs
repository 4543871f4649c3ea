//! Waste report types.
//!
//! `WasteReport` is the record the whole lifecycle engine revolves around.
//! Its `status` is a forward-only state machine; `collected_at` doubles as
//! the idempotency marker for completion, which is why it is set by the
//! completion handler rather than the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::{ReportId, UserId};

/// A waste-collection incident report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteReport {
    /// Report ID (ULID, time-ordered).
    pub id: ReportId,

    /// The resident who filed the report.
    pub resident_id: UserId,

    /// Free-text location description.
    pub location_text: String,

    /// Latitude of the reported site.
    pub latitude: f64,

    /// Longitude of the reported site.
    pub longitude: f64,

    /// Reference to the uploaded waste photo (blob storage is external).
    pub waste_photo_url: String,

    /// Lifecycle status.
    pub status: ReportStatus,

    /// The worker bound to this report. Set exactly once, by the
    /// assignment handler.
    pub assigned_worker_id: Option<UserId>,

    /// Reference to the pickup photo, set by the client at collection.
    pub pickup_photo_url: Option<String>,

    /// Points credited for this collection. Set exactly once, by the
    /// completion handler.
    pub reward_amount: Option<i64>,

    /// When the report was filed.
    pub created_at: DateTime<Utc>,

    /// When the collection was finalized. Also the completion
    /// idempotency marker: a report with `collected_at` set is terminal.
    pub collected_at: Option<DateTime<Utc>>,
}

impl WasteReport {
    /// Create a new pending report.
    ///
    /// Status is always `Pending` for a fresh report; callers never choose
    /// the initial state.
    #[must_use]
    pub fn new(
        resident_id: UserId,
        location_text: impl Into<String>,
        latitude: f64,
        longitude: f64,
        waste_photo_url: impl Into<String>,
    ) -> Self {
        Self {
            id: ReportId::generate(),
            resident_id,
            location_text: location_text.into(),
            latitude,
            longitude,
            waste_photo_url: waste_photo_url.into(),
            status: ReportStatus::Pending,
            assigned_worker_id: None,
            pickup_photo_url: None,
            reward_amount: None,
            created_at: Utc::now(),
            collected_at: None,
        }
    }

    /// Whether the completion handler has already processed this report.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.collected_at.is_some()
    }

    /// Whether the assignment handler still has work to do here.
    #[must_use]
    pub fn awaiting_assignment(&self) -> bool {
        self.status == ReportStatus::Pending && self.assigned_worker_id.is_none()
    }

    /// Bind a worker to this report.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyAssigned` unless the report is still `pending`
    /// with no worker bound.
    pub fn assign(&mut self, worker_id: UserId) -> Result<(), DomainError> {
        if !self.awaiting_assignment() {
            return Err(DomainError::AlreadyAssigned {
                report_id: self.id.to_string(),
            });
        }
        self.assigned_worker_id = Some(worker_id);
        self.status = ReportStatus::Assigned;
        Ok(())
    }

    /// Record the collection performed by the assigned worker.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the report is currently
    /// `assigned`.
    pub fn collect(&mut self, pickup_photo_url: Option<String>) -> Result<(), DomainError> {
        if !self.status.can_transition_to(ReportStatus::Collected) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: ReportStatus::Collected,
            });
        }
        self.status = ReportStatus::Collected;
        if pickup_photo_url.is_some() {
            self.pickup_photo_url = pickup_photo_url;
        }
        Ok(())
    }

    /// Finalize the collection: stamp the reward and the completion
    /// marker.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyFinalized` if `collected_at` is already set, and
    /// `NotCollected` if the report has not reached `collected`.
    pub fn finalize(&mut self, reward_amount: i64) -> Result<(), DomainError> {
        if self.is_finalized() {
            return Err(DomainError::AlreadyFinalized {
                report_id: self.id.to_string(),
            });
        }
        if self.status != ReportStatus::Collected {
            return Err(DomainError::NotCollected {
                report_id: self.id.to_string(),
            });
        }
        self.reward_amount = Some(reward_amount);
        self.collected_at = Some(Utc::now());
        Ok(())
    }
}

/// Lifecycle status of a waste report.
///
/// Transitions are forward-only: `Pending → Assigned → Collected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Filed, no worker bound yet.
    Pending,

    /// A worker has been bound by the assignment handler.
    Assigned,

    /// The worker has collected the waste. Terminal.
    Collected,
}

impl ReportStatus {
    /// Check whether moving to `next` is a legal forward transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Assigned) | (Self::Assigned, Self::Collected)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> WasteReport {
        WasteReport::new(UserId::generate(), "Main St", 1.0, 2.0, "photos/f1")
    }

    #[test]
    fn new_report_is_pending() {
        let report = sample_report();
        assert_eq!(report.status, ReportStatus::Pending);
        assert!(report.assigned_worker_id.is_none());
        assert!(report.awaiting_assignment());
        assert!(!report.is_finalized());
    }

    #[test]
    fn forward_transitions_allowed() {
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Assigned));
        assert!(ReportStatus::Assigned.can_transition_to(ReportStatus::Collected));
    }

    #[test]
    fn regressions_and_skips_rejected() {
        assert!(!ReportStatus::Assigned.can_transition_to(ReportStatus::Pending));
        assert!(!ReportStatus::Collected.can_transition_to(ReportStatus::Assigned));
        assert!(!ReportStatus::Collected.can_transition_to(ReportStatus::Pending));
        assert!(!ReportStatus::Pending.can_transition_to(ReportStatus::Collected));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ReportStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&ReportStatus::Assigned).unwrap(),
            "\"assigned\""
        );
        assert_eq!(
            serde_json::to_string(&ReportStatus::Collected).unwrap(),
            "\"collected\""
        );
    }

    #[test]
    fn assign_binds_worker_once() {
        let mut report = sample_report();
        let worker = UserId::generate();
        report.assign(worker).unwrap();
        assert_eq!(report.status, ReportStatus::Assigned);
        assert_eq!(report.assigned_worker_id, Some(worker));

        let err = report.assign(UserId::generate()).unwrap_err();
        assert!(matches!(err, DomainError::AlreadyAssigned { .. }));
        assert_eq!(report.assigned_worker_id, Some(worker));
    }

    #[test]
    fn collect_requires_assignment() {
        let mut report = sample_report();
        let err = report.collect(None).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        report.assign(UserId::generate()).unwrap();
        report.collect(Some("photos/p1".into())).unwrap();
        assert_eq!(report.status, ReportStatus::Collected);
        assert_eq!(report.pickup_photo_url.as_deref(), Some("photos/p1"));
    }

    #[test]
    fn finalize_is_single_shot() {
        let mut report = sample_report();
        report.assign(UserId::generate()).unwrap();
        report.collect(None).unwrap();

        report.finalize(10).unwrap();
        assert!(report.is_finalized());
        assert_eq!(report.reward_amount, Some(10));

        let err = report.finalize(10).unwrap_err();
        assert!(matches!(err, DomainError::AlreadyFinalized { .. }));
    }

    #[test]
    fn finalize_rejects_uncollected_report() {
        let mut report = sample_report();
        let err = report.finalize(10).unwrap_err();
        assert!(matches!(err, DomainError::NotCollected { .. }));
        assert!(report.reward_amount.is_none());
    }

    #[test]
    fn report_roundtrips_through_json() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let parsed: WasteReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, report.id);
        assert_eq!(parsed.status, ReportStatus::Pending);
        assert_eq!(parsed.location_text, "Main St");
    }
}
