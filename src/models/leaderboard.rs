use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Materialized leaderboard row stored in redb, keyed by email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRecord {
    pub username: String,
    /// Sum of every passed stage score across all games
    pub total_score: u64,
    /// When the total or name last changed (Unix timestamp, milliseconds)
    pub last_updated: i64,
}

/// Leaderboard row for API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub username: String,
    pub email: String,
    pub total_score: u64,
    pub last_updated: String,
}

/// Ranking order: highest total first, then whoever reached it first, then email
pub fn rank_order(a: (&str, &LeaderboardRecord), b: (&str, &LeaderboardRecord)) -> Ordering {
    b.1.total_score
        .cmp(&a.1.total_score)
        .then_with(|| a.1.last_updated.cmp(&b.1.last_updated))
        .then_with(|| a.0.cmp(b.0))
}
