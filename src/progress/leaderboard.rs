use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, WriteTransaction};
use serde::Serialize;
use std::collections::HashSet;

use crate::db::{decode, encode, tables};
use crate::error::Result;
use crate::models::{rank_order, GameType, LeaderboardEntry, LeaderboardRecord, LearnerRecord};
use crate::progress::{now_millis, passed_score};

/// What a recompute pass touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecomputeSummary {
    pub learners: usize,
    pub rows_written: usize,
    pub rows_removed: usize,
}

/// Rebuild the leaderboard from the progress tables in its own transaction
#[allow(clippy::result_large_err)]
pub fn run(db: &Database) -> Result<RecomputeSummary> {
    run_at(db, now_millis())
}

#[allow(clippy::result_large_err)]
pub(crate) fn run_at(db: &Database, now: i64) -> Result<RecomputeSummary> {
    let write_txn = db.begin_write()?;
    let summary = recompute_in(&write_txn, now)?;
    if summary.rows_written == 0 && summary.rows_removed == 0 {
        write_txn.abort()?;
    } else {
        write_txn.commit()?;
    }
    Ok(summary)
}

/// Recompute every learner's total inside an open write transaction
///
/// A row is rewritten, and its timestamp moved to `now`, only when the total
/// or display name differs from what is stored. Running this twice without
/// progress writes in between leaves the table byte-for-byte unchanged.
#[allow(clippy::result_large_err)]
pub(crate) fn recompute_in(write_txn: &WriteTransaction, now: i64) -> Result<RecomputeSummary> {
    let learners = write_txn.open_table(tables::LEARNERS)?;
    let games = GameType::ALL
        .iter()
        .map(|game| write_txn.open_table(game.table()))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let mut board = write_txn.open_table(tables::LEADERBOARD)?;

    let mut summary = RecomputeSummary::default();
    let mut seen = HashSet::new();

    for entry in learners.iter()? {
        let (email, bytes) = entry?;
        let email = email.value();
        let learner: LearnerRecord = decode(bytes.value())?;
        summary.learners += 1;
        seen.insert(email.to_string());

        let mut total_score = 0u64;
        for table in &games {
            total_score += passed_score(table, email)?;
        }

        // An undecodable row is stale cache and gets overwritten
        let existing: Option<LeaderboardRecord> = board.get(email)?.and_then(|bytes| {
            decode(bytes.value())
                .map_err(|e| {
                    tracing::warn!("Discarding unreadable leaderboard row {}: {}", email, e)
                })
                .ok()
        });

        let unchanged = existing.as_ref().is_some_and(|row| {
            row.total_score == total_score && row.username == learner.username
        });
        if unchanged {
            continue;
        }

        let row = LeaderboardRecord {
            username: learner.username,
            total_score,
            last_updated: now,
        };
        board.insert(email, encode(&row)?.as_slice())?;
        summary.rows_written += 1;
    }

    // Rows whose learner is gone cannot be reproduced from progress
    let mut orphans = Vec::new();
    for entry in board.iter()? {
        let (email, _) = entry?;
        if !seen.contains(email.value()) {
            orphans.push(email.value().to_string());
        }
    }
    for email in &orphans {
        board.remove(email.as_str())?;
    }
    summary.rows_removed = orphans.len();

    tracing::debug!(
        "Leaderboard recomputed: {} learners, {} rows written, {} removed",
        summary.learners,
        summary.rows_written,
        summary.rows_removed
    );

    Ok(summary)
}

/// Recompute, then return the top `limit` learners
#[allow(clippy::result_large_err)]
pub fn leaderboard_top(db: &Database, limit: usize) -> Result<Vec<LeaderboardEntry>> {
    run(db)?;

    let mut rows = read_rows(db)?;
    rows.sort_by(|a, b| rank_order((a.0.as_str(), &a.1), (b.0.as_str(), &b.1)));

    Ok(rows
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, (email, row))| LeaderboardEntry {
            rank: index + 1,
            username: row.username,
            email,
            total_score: row.total_score,
            last_updated: millis_to_rfc3339(row.last_updated),
        })
        .collect())
}

/// Every stored leaderboard row in email order, without recomputing
#[allow(clippy::result_large_err)]
pub fn read_rows(db: &Database) -> Result<Vec<(String, LeaderboardRecord)>> {
    let read_txn = db.begin_read()?;
    let board = read_txn.open_table(tables::LEADERBOARD)?;

    let mut rows = Vec::new();
    for entry in board.iter()? {
        let (email, bytes) = entry?;
        rows.push((email.value().to_string(), decode(bytes.value())?));
    }
    Ok(rows)
}

fn millis_to_rfc3339(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .unwrap_or_else(Utc::now)
        .to_rfc3339()
}
