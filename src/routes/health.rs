use axum::{extract::State, Json};
use redb::ReadableDatabase;
use serde_json::{json, Value};

use crate::db::tables;
use crate::AppState;

/// Liveness check for the progress service
///
/// `database` is "connected" when the progress store accepts a read
/// transaction and its leaderboard table opens.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db = state.db.clone();
    let db_status = tokio::task::spawn_blocking(move || {
        let opened = db
            .begin_read()
            .map_err(redb::Error::from)
            .and_then(|txn| txn.open_table(tables::LEADERBOARD).map_err(redb::Error::from));
        match opened {
            Ok(_) => "connected",
            Err(e) => {
                tracing::error!("Progress store unreachable: {}", e);
                "disconnected"
            }
        }
    })
    .await
    .unwrap_or("error");

    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "status": if db_status == "connected" { "healthy" } else { "unhealthy" },
        "database": db_status,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
