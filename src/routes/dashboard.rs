use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::Result;
use crate::models::{Feature, Identity, LearnerDashboard, LearnerStatistics, Unlocks};
use crate::progress;
use crate::routes::identity::require_instructor;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub feature: Feature,
    pub unlocked: bool,
}

/// Progress summary for the calling learner
pub async fn learner_dashboard(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<LearnerDashboard>> {
    let db = state.db.clone();
    let dashboard =
        tokio::task::spawn_blocking(move || progress::learner_dashboard(&db, &identity.email))
            .await??;
    Ok(Json(dashboard))
}

/// Progress summary for every learner (instructors only)
pub async fn teacher_dashboard(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<LearnerStatistics>>> {
    require_instructor(&identity)?;

    let db = state.db.clone();
    let rows = tokio::task::spawn_blocking(move || progress::teacher_dashboard(&db)).await??;

    tracing::info!(
        "Teacher dashboard served to {}: {} learners",
        identity.email,
        rows.len()
    );
    Ok(Json(rows))
}

/// Unlock state of every gated game for the caller
pub async fn unlocks(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Unlocks>> {
    let db = state.db.clone();
    let unlocks =
        tokio::task::spawn_blocking(move || progress::unlocks(&db, &identity.email)).await??;
    Ok(Json(unlocks))
}

/// Unlock state of one gated game for the caller
pub async fn unlock(
    State(state): State<AppState>,
    identity: Identity,
    Path(feature): Path<String>,
) -> Result<Json<UnlockResponse>> {
    let feature: Feature = feature.parse()?;

    let db = state.db.clone();
    let unlocked = tokio::task::spawn_blocking(move || {
        progress::is_unlocked(&db, &identity.email, feature)
    })
    .await??;

    Ok(Json(UnlockResponse { feature, unlocked }))
}
