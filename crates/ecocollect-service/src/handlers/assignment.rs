//! Assignment handler.
//!
//! Triggered once per report creation event with the post-creation
//! snapshot. Picks a worker uniformly at random and moves the report
//! from `pending` to `assigned`. Safe under duplicate delivery: the
//! snapshot guard catches replays of already-advanced reports, and the
//! store's conditional update catches the race the snapshot can't see.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use rand::Rng;

use ecocollect_core::{Role, WasteReport};
use ecocollect_store::Store;

use crate::auth::ServiceAuth;
use crate::handlers::TriggerResponse;
use crate::state::AppState;

/// Trigger endpoint: a report was created.
pub async fn report_created(
    State(state): State<Arc<AppState>>,
    auth: ServiceAuth,
    Json(report): Json<WasteReport>,
) -> Json<TriggerResponse> {
    tracing::debug!(
        service = %auth.service_name,
        report_id = %report.id,
        "Processing report-created trigger"
    );

    Json(assign_worker(&state, &report))
}

/// Assign a worker to a newly created report.
///
/// This is the handler body proper; the HTTP endpoint above and the
/// in-process dispatcher both call it. All failure paths are converted
/// to a structured response, never a panic or an HTTP error.
pub fn assign_worker(state: &AppState, report: &WasteReport) -> TriggerResponse {
    // Only proceed if the snapshot is still pending with no worker bound.
    if !report.awaiting_assignment() {
        return TriggerResponse::noop("Report already assigned or not pending.");
    }

    let workers = match state.store.list_users_by_role(Role::Worker) {
        Ok(workers) => workers,
        Err(e) => {
            tracing::error!(report_id = %report.id, error = %e, "Failed to query workers");
            return TriggerResponse::error("Failed to query workers.", e);
        }
    };

    if workers.is_empty() {
        tracing::warn!(report_id = %report.id, "No workers found to assign");
        return TriggerResponse::failure("No workers available.");
    }

    // Uniform random pick. Round-robin would need a persisted rotation
    // cursor; random keeps the handler stateless.
    let index = rand::rng().random_range(0..workers.len());
    let worker = &workers[index];

    match state.store.assign_report(&report.id, &worker.user_id) {
        Ok(updated) => {
            tracing::info!(
                report_id = %report.id,
                worker_id = %worker.user_id,
                "Assigned report to worker"
            );
            TriggerResponse::mutated("Worker assigned successfully.", updated)
        }
        // The stored record advanced between snapshot and update: a
        // duplicate delivery won the race. Nothing left to do.
        Err(e) if e.is_already_processed() => {
            TriggerResponse::noop("Report already assigned or not pending.")
        }
        Err(e) => {
            tracing::error!(report_id = %report.id, error = %e, "Failed to assign worker");
            TriggerResponse::error("Failed to assign worker.", e)
        }
    }
}
