//! User profile handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use ecocollect_core::{Role, User};
use ecocollect_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Create profile request.
#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role. Immutable after creation.
    pub role: Role,
}

/// Create the profile record after external signup.
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    if state.store.get_user(&auth.user_id)?.is_some() {
        return Err(ApiError::Conflict("Profile already exists".into()));
    }

    let user = User::new(auth.user_id, body.name, body.email, body.role);
    state.store.put_user(&user)?;

    tracing::info!(user_id = %auth.user_id, role = ?user.role, "Profile created");

    Ok(Json(user))
}

/// Get the current user's profile.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;

    Ok(Json(user))
}
