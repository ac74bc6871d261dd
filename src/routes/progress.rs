use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{GameType, Identity, MergeOutcome, ProgressSubmission};
use crate::progress;
use crate::AppState;

/// Field names follow the game pages; the older spellings are accepted too
#[derive(Debug, Deserialize)]
pub struct SubmitProgressRequest {
    #[serde(alias = "game_name", alias = "gameType")]
    pub game_type: Option<String>,
    pub stage: Option<i64>,
    pub score: Option<i64>,
    #[serde(alias = "total_soal", alias = "totalQuestions")]
    pub total_questions: Option<i64>,
    #[serde(alias = "timeTaken")]
    pub time_taken: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SubmitProgressResponse {
    pub status: &'static str,
    pub passed: bool,
    pub outcome: MergeOutcome,
}

fn required(value: Option<i64>, field: &str) -> Result<i64> {
    value.ok_or_else(|| AppError::MalformedPayload(format!("Missing field: {}", field)))
}

impl SubmitProgressRequest {
    /// Validate into a submission before anything touches storage
    pub fn into_submission(self) -> Result<ProgressSubmission> {
        let game_type = self
            .game_type
            .ok_or_else(|| AppError::MalformedPayload("Missing field: game_type".to_string()))?;
        // Unknown games are reported even when numbers are missing
        let game: GameType = game_type.parse()?;

        ProgressSubmission::new(
            game.as_str(),
            required(self.stage, "stage")?,
            required(self.score, "score")?,
            self.total_questions,
            self.time_taken,
        )
    }
}

/// Record a finished game stage for the calling learner
///
/// Returns whether this attempt passed. The stored record only changes when
/// the attempt beats it; any change also refreshes the leaderboard.
pub async fn submit_progress(
    State(state): State<AppState>,
    identity: Identity,
    payload: std::result::Result<Json<SubmitProgressRequest>, JsonRejection>,
) -> Result<Json<SubmitProgressResponse>> {
    let Json(payload) = payload?;
    let submission = payload.into_submission()?;

    let db = state.db.clone();
    let email = identity.email.clone();
    let result =
        tokio::task::spawn_blocking(move || progress::submit(&db, &email, &submission)).await??;

    Ok(Json(SubmitProgressResponse {
        status: "success",
        passed: result.passed,
        outcome: result.outcome,
    }))
}
