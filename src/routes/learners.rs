use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::Result;
use crate::models::Identity;
use crate::progress;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub email: String,
    pub username: String,
}

/// Register the calling identity as a learner
///
/// Called by the auth layer right after sign-up. Returns 409 Conflict if the
/// email is already registered.
pub async fn register_learner(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<RegisterResponse>> {
    let db = state.db.clone();
    let learner = identity.clone();
    let record =
        tokio::task::spawn_blocking(move || progress::register_learner(&db, &learner)).await??;

    Ok(Json(RegisterResponse {
        success: true,
        email: identity.email,
        username: record.username,
    }))
}
