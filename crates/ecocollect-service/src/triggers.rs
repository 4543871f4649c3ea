//! In-process trigger dispatcher.
//!
//! The assignment and completion handlers are callable units behind any
//! trigger adapter. This module is the built-in one: a background task
//! that consumes the store's change feed and invokes the matching
//! handler for each event. Delivery is at-least-once from the handlers'
//! point of view (the HTTP trigger endpoints may fire for the same
//! change), which is safe because both handlers are idempotent.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use ecocollect_store::Store;

use crate::handlers::{assignment, completion};
use crate::state::AppState;

/// Spawn the dispatcher task. It runs until the store's feed closes.
pub fn spawn_dispatcher(state: Arc<AppState>) -> JoinHandle<()> {
    let mut rx = state.store.subscribe();

    tokio::spawn(async move {
        tracing::info!("Trigger dispatcher started");

        loop {
            match rx.recv().await {
                Ok(event) => {
                    let report = &event.payload;

                    let response = if event.is_create() {
                        assignment::assign_worker(&state, report)
                    } else if event.is_update() {
                        completion::complete_collection(&state, report)
                    } else {
                        continue;
                    };

                    if !response.success {
                        tracing::warn!(
                            report_id = %report.id,
                            message = %response.message,
                            error = ?response.error,
                            "Trigger handler reported failure"
                        );
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Missed events are not replayed; the affected
                    // reports stay in their pre-handler state until a
                    // later update or an external trigger delivery.
                    tracing::warn!(skipped, "Trigger dispatcher lagging; events missed");
                }
                Err(RecvError::Closed) => {
                    tracing::info!("Change feed closed; trigger dispatcher stopping");
                    break;
                }
            }
        }
    })
}
