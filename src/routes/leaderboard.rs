use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::constants::MAX_LEADERBOARD_SIZE;
use crate::error::Result;
use crate::models::{Identity, LeaderboardEntry};
use crate::progress;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

/// Top learners by passed score
///
/// Recomputes the leaderboard from progress before reading it, so the result
/// reflects every submission committed before the request.
pub async fn leaderboard(
    State(state): State<AppState>,
    _identity: Identity,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>> {
    let limit = params
        .limit
        .unwrap_or(state.config.leaderboard_size)
        .clamp(1, MAX_LEADERBOARD_SIZE);

    let db = state.db.clone();
    let top = tokio::task::spawn_blocking(move || progress::leaderboard_top(&db, limit)).await??;

    Ok(Json(top))
}
