use redb::{Database, ReadableTable};
use serde::Serialize;

use crate::db::{decode, encode, tables};
use crate::error::{AppError, Result};
use crate::models::{
    merge_attempt, Identity, LearnerRecord, MergeOutcome, ProgressRecord, ProgressSubmission,
};
use crate::progress::{leaderboard, now_millis};

/// Result of a single game-stage submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    /// Whether this attempt passed, regardless of what was stored
    pub passed: bool,
    pub outcome: MergeOutcome,
}

/// Add a learner to the registry
///
/// Instructors never enter the registry, so they stay out of the instructor
/// view and the leaderboard.
#[allow(clippy::result_large_err)]
pub fn register_learner(db: &Database, identity: &Identity) -> Result<LearnerRecord> {
    if identity.is_instructor() {
        tracing::warn!("Instructor tried to register as learner: {}", identity.email);
        return Err(AppError::Forbidden);
    }

    let write_txn = db.begin_write()?;
    let record = {
        let mut learners = write_txn.open_table(tables::LEARNERS)?;

        if learners.get(identity.email.as_str())?.is_some() {
            tracing::info!("Learner already registered: {}", identity.email);
            return Err(AppError::LearnerAlreadyExists);
        }

        let record = LearnerRecord {
            username: identity.username.clone(),
            created_at: chrono::Utc::now().timestamp(),
        };
        learners.insert(identity.email.as_str(), encode(&record)?.as_slice())?;
        record
    };
    write_txn.commit()?;

    tracing::info!("New learner registered: {}", identity.email);
    Ok(record)
}

/// Apply one submission for a learner
///
/// The progress upsert and the leaderboard recompute it triggers share one
/// write transaction: either both land or neither does.
#[allow(clippy::result_large_err)]
pub fn submit(
    db: &Database,
    email: &str,
    submission: &ProgressSubmission,
) -> Result<SubmissionResult> {
    submit_at(db, email, submission, now_millis())
}

#[allow(clippy::result_large_err)]
pub(crate) fn submit_at(
    db: &Database,
    email: &str,
    submission: &ProgressSubmission,
    now: i64,
) -> Result<SubmissionResult> {
    let passed = submission.is_passed();
    let key = (email, submission.stage);

    // redb allows a single writer, so this read-modify-write cannot interleave
    // with a duplicate submission for the same stage
    let write_txn = db.begin_write()?;
    let outcome = {
        let learners = write_txn.open_table(tables::LEARNERS)?;
        if learners.get(email)?.is_none() {
            tracing::warn!("Submission for unregistered learner: {}", email);
            return Err(AppError::LearnerNotFound);
        }
        drop(learners);

        let mut progress = write_txn.open_table(submission.game.table())?;
        let existing: Option<ProgressRecord> = progress
            .get(key)?
            .map(|bytes| decode(bytes.value()))
            .transpose()?;

        let (outcome, merged) = merge_attempt(existing.as_ref(), submission.to_record(now));
        if let Some(record) = merged {
            progress.insert(key, encode(&record)?.as_slice())?;
        }
        outcome
    };

    if !outcome.is_write() {
        write_txn.abort()?;
        tracing::debug!(
            "No change for {} {} stage {}: score {}",
            email,
            submission.game,
            submission.stage,
            submission.score
        );
        return Ok(SubmissionResult { passed, outcome });
    }

    let summary = leaderboard::recompute_in(&write_txn, now)?;
    write_txn.commit()?;

    tracing::info!(
        "Progress {:?} for {} {} stage {}: score {}, passed {} ({} leaderboard rows updated)",
        outcome,
        email,
        submission.game,
        submission.stage,
        submission.score,
        passed,
        summary.rows_written
    );

    Ok(SubmissionResult { passed, outcome })
}
