//! Report handlers for the mobile client.
//!
//! Residents file reports and see their own; workers see the reports
//! assigned to them and mark them collected. Status is never taken from
//! the caller: creation forces `pending`, and collection is the only
//! client-driven transition.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use ecocollect_core::{ReportId, Role, WasteReport};
use ecocollect_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Default page size for listings.
const DEFAULT_LIMIT: usize = 50;

/// Create report request.
#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    /// Free-text location description.
    pub location_text: String,
    /// Latitude of the reported site.
    pub latitude: f64,
    /// Longitude of the reported site.
    pub longitude: f64,
    /// Reference to the uploaded waste photo.
    pub waste_photo_url: String,
}

/// Pagination parameters for listings.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Maximum number of reports to return.
    pub limit: Option<usize>,
    /// Number of reports to skip.
    pub offset: Option<usize>,
}

/// Collection request body.
#[derive(Debug, Default, Deserialize)]
pub struct CollectRequest {
    /// Reference to the pickup photo.
    pub pickup_photo_url: Option<String>,
}

/// File a new waste report. Residents only.
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateReportRequest>,
) -> Result<Json<WasteReport>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;

    if user.role != Role::Resident {
        return Err(ApiError::Forbidden("Only residents file reports".into()));
    }

    let report = WasteReport::new(
        auth.user_id,
        body.location_text,
        body.latitude,
        body.longitude,
        body.waste_photo_url,
    );
    state.store.create_report(&report)?;

    tracing::info!(
        report_id = %report.id,
        resident_id = %auth.user_id,
        "Report filed"
    );

    Ok(Json(report))
}

/// List the caller's reports: residents see what they filed, workers see
/// what is assigned to them. Newest first.
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<WasteReport>>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let reports = match user.role {
        Role::Resident => state
            .store
            .list_reports_by_resident(&auth.user_id, limit, offset)?,
        Role::Worker => state
            .store
            .list_reports_by_worker(&auth.user_id, limit, offset)?,
    };

    Ok(Json(reports))
}

/// Fetch one report. Visible to the filing resident and the assigned
/// worker.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<WasteReport>, ApiError> {
    let report_id = parse_report_id(&id)?;

    let report = state
        .store
        .get_report(&report_id)?
        .ok_or_else(|| ApiError::NotFound(format!("report not found: {id}")))?;

    let is_owner = report.resident_id == auth.user_id;
    let is_assignee = report.assigned_worker_id == Some(auth.user_id);
    if !is_owner && !is_assignee {
        return Err(ApiError::Forbidden("Not your report".into()));
    }

    Ok(Json(report))
}

/// Mark a report collected. Only the assigned worker may do this; the
/// completion handler picks the change up from the feed and finalizes it.
pub async fn collect_report(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<CollectRequest>,
) -> Result<Json<WasteReport>, ApiError> {
    let report_id = parse_report_id(&id)?;

    let report = state
        .store
        .get_report(&report_id)?
        .ok_or_else(|| ApiError::NotFound(format!("report not found: {id}")))?;

    if report.assigned_worker_id != Some(auth.user_id) {
        return Err(ApiError::Forbidden(
            "Only the assigned worker can collect".into(),
        ));
    }

    let updated = state
        .store
        .collect_report(&report_id, body.pickup_photo_url)?;

    tracing::info!(
        report_id = %report_id,
        worker_id = %auth.user_id,
        "Report marked collected"
    );

    Ok(Json(updated))
}

fn parse_report_id(raw: &str) -> Result<ReportId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid report ID: {raw}")))
}
