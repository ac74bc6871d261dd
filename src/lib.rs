//! Lesson Progress Server Library
//!
//! Tracks learner progress across the quiz, image-guessing and matching games
//! and keeps a leaderboard derived from passed stages.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod progress;
pub mod routes;
pub mod security;

pub use config::Config;
pub use db::{open_database, Db};
pub use error::{AppError, Result};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState with the given database and configuration
    pub fn new(db: Db, config: Config) -> Self {
        Self { db, config }
    }
}
