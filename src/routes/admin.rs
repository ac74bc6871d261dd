use axum::{
    extract::{Query, State},
    Json,
};
use redb::{ReadableDatabase, ReadableTableMetadata};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::{db::tables, error::Result, AppError, AppState};

/// Query parameters for admin stats endpoint
#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    /// Admin secret key for authentication
    pub key: String,
}

/// Database statistics response
#[derive(Debug, Serialize)]
pub struct AdminStatsResponse {
    pub learner_count: u64,
    pub quiz_progress_count: u64,
    pub guess_progress_count: u64,
    pub matching_progress_count: u64,
    pub leaderboard_count: u64,
    pub database_size_bytes: u64,
    pub database_size_human: String,
}

/// Format bytes into human-readable string
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Admin stats endpoint
///
/// Row counts per table and the database file size.
/// Disabled unless ADMIN_SECRET_KEY is configured.
///
/// GET /admin/stats?key=<admin_secret_key>
pub async fn admin_stats(
    State(state): State<AppState>,
    Query(params): Query<AdminQuery>,
) -> Result<Json<AdminStatsResponse>> {
    let admin_key = state
        .config
        .admin_secret_key
        .as_ref()
        .ok_or(AppError::Unauthenticated)?;

    if params.key != *admin_key {
        tracing::warn!("Invalid admin key attempt");
        return Err(AppError::Unauthenticated);
    }

    let database_size_bytes = fs::metadata(&state.config.database_path)
        .map(|m| m.len())
        .unwrap_or(0);

    let db = state.db.clone();
    let counts = tokio::task::spawn_blocking(move || -> Result<[u64; 5]> {
        let read_txn = db.begin_read()?;
        let counts = [
            read_txn.open_table(tables::LEARNERS)?.len()?,
            read_txn.open_table(tables::QUIZ_PROGRESS)?.len()?,
            read_txn.open_table(tables::GUESS_PROGRESS)?.len()?,
            read_txn.open_table(tables::MATCHING_PROGRESS)?.len()?,
            read_txn.open_table(tables::LEADERBOARD)?.len()?,
        ];
        Ok(counts)
    })
    .await??;

    tracing::info!(
        "Admin stats requested: {} learners, {} database",
        counts[0],
        format_bytes(database_size_bytes)
    );

    Ok(Json(AdminStatsResponse {
        learner_count: counts[0],
        quiz_progress_count: counts[1],
        guess_progress_count: counts[2],
        matching_progress_count: counts[3],
        leaderboard_count: counts[4],
        database_size_bytes,
        database_size_human: format_bytes(database_size_bytes),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
    }
}
