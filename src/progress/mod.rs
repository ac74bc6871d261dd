//! Progress merge and leaderboard recompute engine
//!
//! Every function here is synchronous and takes the learner email explicitly;
//! HTTP handlers run them on the blocking pool.

pub mod dashboard;
pub mod leaderboard;
pub mod updater;

pub use dashboard::{is_unlocked, learner_dashboard, teacher_dashboard, unlocks};
pub use leaderboard::{leaderboard_top, run as recompute_leaderboard, RecomputeSummary};
pub use updater::{register_learner, submit, SubmissionResult};

use redb::ReadableTable;

use crate::db::decode;
use crate::error::Result;
use crate::models::ProgressRecord;

/// Current time in the resolution stored on records
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// All records one learner has in a progress table, ordered by stage
pub(crate) fn learner_records<T>(table: &T, email: &str) -> Result<Vec<(u32, ProgressRecord)>>
where
    T: ReadableTable<(&'static str, u32), &'static [u8]>,
{
    let mut records = Vec::new();
    for entry in table.range((email, 0u32)..=(email, u32::MAX))? {
        let (key, bytes) = entry?;
        let (_, stage) = key.value();
        records.push((stage, decode(bytes.value())?));
    }
    Ok(records)
}

/// Sum of the scores of every passed stage for one learner in one table
pub(crate) fn passed_score<T>(table: &T, email: &str) -> Result<u64>
where
    T: ReadableTable<(&'static str, u32), &'static [u8]>,
{
    Ok(learner_records(table, email)?
        .iter()
        .filter(|(_, record)| record.passed)
        .map(|(_, record)| u64::from(record.score))
        .sum())
}
