pub mod admin;
pub mod dashboard;
pub mod health;
pub mod identity;
pub mod leaderboard;
pub mod learners;
pub mod progress;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use admin::admin_stats;
pub use dashboard::{learner_dashboard, teacher_dashboard, unlock, unlocks};
pub use health::health_check;
pub use identity::{identity_from_headers, require_instructor};
pub use leaderboard::leaderboard;
pub use learners::register_learner;
pub use progress::submit_progress;

/// All routes, without transport layers (CORS, tracing)
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/learners", post(register_learner))
        .route("/api/progress", post(submit_progress))
        .route("/api/dashboard", get(learner_dashboard))
        .route("/api/teacher/dashboard", get(teacher_dashboard))
        .route("/api/leaderboard", get(leaderboard))
        .route("/api/unlocks", get(unlocks))
        .route("/api/unlocks/{feature}", get(unlock))
        .route("/admin/stats", get(admin_stats))
        .with_state(state)
}
