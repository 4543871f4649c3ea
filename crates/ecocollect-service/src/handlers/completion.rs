//! Completion handler.
//!
//! Triggered once per report update event with the post-update snapshot.
//! When a report has transitioned into `collected`, it finalizes the
//! record (reward amount + `collected_at`) and credits the assigned
//! worker. `collected_at` is the idempotency marker: a snapshot that
//! already carries it, or a store-level `AlreadyFinalized`, means a
//! duplicate delivery and the handler no-ops.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use ecocollect_core::{ReportStatus, WasteReport};
use ecocollect_store::{Store, StoreError};

use crate::auth::ServiceAuth;
use crate::handlers::TriggerResponse;
use crate::state::AppState;

/// Trigger endpoint: a report was updated.
pub async fn report_updated(
    State(state): State<Arc<AppState>>,
    auth: ServiceAuth,
    Json(report): Json<WasteReport>,
) -> Json<TriggerResponse> {
    tracing::debug!(
        service = %auth.service_name,
        report_id = %report.id,
        status = ?report.status,
        "Processing report-updated trigger"
    );

    Json(complete_collection(&state, &report))
}

/// Finalize a collected report and credit the assigned worker.
///
/// Finalizing the report is the primary contract; crediting is
/// best-effort. A missing worker profile is logged and does not fail
/// the handler.
pub fn complete_collection(state: &AppState, report: &WasteReport) -> TriggerResponse {
    // This fires on every report update; only the transition into
    // `collected` is ours.
    if report.status != ReportStatus::Collected {
        return TriggerResponse::noop("Status is not collected. Ignoring.");
    }

    if report.is_finalized() {
        return TriggerResponse::noop("Report already finalized. Ignoring.");
    }

    let reward = state.reward_policy.reward_for(report);

    let finalized = match state.store.finalize_report(&report.id, reward) {
        Ok(finalized) => finalized,
        // The stored record was finalized between snapshot and update:
        // the reward has already been handed out.
        Err(e) if e.is_already_processed() => {
            return TriggerResponse::noop("Report already finalized. Ignoring.");
        }
        Err(e) => {
            tracing::error!(report_id = %report.id, error = %e, "Failed to finalize report");
            return TriggerResponse::error("Failed to finalize report.", e);
        }
    };

    if let Some(worker_id) = finalized.assigned_worker_id {
        match state.store.credit_reward_points(&worker_id, reward) {
            Ok(total) => {
                tracing::info!(
                    report_id = %finalized.id,
                    worker_id = %worker_id,
                    points = reward,
                    total_points = total,
                    "Awarded points to worker"
                );
            }
            Err(StoreError::NotFound { .. }) => {
                tracing::error!(
                    report_id = %finalized.id,
                    worker_id = %worker_id,
                    "Worker profile not found; report finalized without credit"
                );
            }
            Err(e) => {
                tracing::error!(
                    report_id = %finalized.id,
                    worker_id = %worker_id,
                    error = %e,
                    "Failed to credit worker; report finalized without credit"
                );
            }
        }
    }

    TriggerResponse::mutated("Collection finalized and rewards credited.", finalized)
}
