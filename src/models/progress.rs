use serde::{Deserialize, Serialize};

use crate::constants::{
    ERR_INVALID_STAGE, ERR_MISSING_TOTAL_QUESTIONS, ERR_NEGATIVE_SCORE, ERR_NEGATIVE_TIME,
    ERR_SCORE_EXCEEDS_TOTAL, STAGES_PER_GAME,
};
use crate::error::{AppError, Result};
use crate::models::GameType;

/// Best attempt stored for one (learner, game, stage)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub score: u32,
    pub passed: bool,
    /// Seconds spent on the attempt that produced this record
    pub time_taken: u32,
    /// When the record was last written (Unix timestamp, milliseconds)
    pub updated_at: i64,
}

/// A validated game-stage completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSubmission {
    pub game: GameType,
    pub stage: u32,
    pub score: u32,
    pub total_questions: u32,
    pub time_taken: u32,
}

impl ProgressSubmission {
    /// Validate raw submission fields
    ///
    /// The game type is checked first so an unknown game is reported as such
    /// even when the other fields are also wrong.
    pub fn new(
        game_type: &str,
        stage: i64,
        score: i64,
        total_questions: Option<i64>,
        time_taken: Option<i64>,
    ) -> Result<Self> {
        let game: GameType = game_type.parse()?;

        let stage = u32::try_from(stage)
            .ok()
            .filter(|s| (1..=STAGES_PER_GAME).contains(s))
            .ok_or_else(|| AppError::MalformedPayload(ERR_INVALID_STAGE.to_string()))?;

        let score = u32::try_from(score)
            .map_err(|_| AppError::MalformedPayload(ERR_NEGATIVE_SCORE.to_string()))?;

        let time_taken = u32::try_from(time_taken.unwrap_or(0))
            .map_err(|_| AppError::MalformedPayload(ERR_NEGATIVE_TIME.to_string()))?;

        let total_questions = match total_questions {
            Some(total) => u32::try_from(total).map_err(|_| {
                AppError::MalformedPayload(ERR_MISSING_TOTAL_QUESTIONS.to_string())
            })?,
            None => 0,
        };

        if game.rules().requires_total_questions() {
            if total_questions == 0 {
                return Err(AppError::MalformedPayload(
                    ERR_MISSING_TOTAL_QUESTIONS.to_string(),
                ));
            }
            if score > total_questions {
                return Err(AppError::MalformedPayload(
                    ERR_SCORE_EXCEEDS_TOTAL.to_string(),
                ));
            }
        }

        Ok(Self {
            game,
            stage,
            score,
            total_questions,
            time_taken,
        })
    }

    pub fn is_passed(&self) -> bool {
        self.game.rules().is_passed(self.score, self.total_questions)
    }

    /// The record this attempt would store on its own
    pub fn to_record(&self, now: i64) -> ProgressRecord {
        ProgressRecord {
            score: self.score,
            passed: self.is_passed(),
            time_taken: self.time_taken,
            updated_at: now,
        }
    }
}

/// What a submission did to the stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeOutcome {
    /// First attempt for this stage
    Inserted,
    /// Higher score, or first pass, replaced the stored attempt
    Improved,
    /// Stored attempt was at least as good
    Unchanged,
}

impl MergeOutcome {
    pub fn is_write(&self) -> bool {
        !matches!(self, MergeOutcome::Unchanged)
    }
}

/// Merge an attempt into the stored record for the same stage
///
/// Returns the record to write, if any. A stored pass is never turned back
/// into a fail, even when a higher score misses the pass mark.
pub fn merge_attempt(
    existing: Option<&ProgressRecord>,
    attempt: ProgressRecord,
) -> (MergeOutcome, Option<ProgressRecord>) {
    match existing {
        None => (MergeOutcome::Inserted, Some(attempt)),
        Some(current) => {
            let improves = attempt.score > current.score || (attempt.passed && !current.passed);
            if !improves {
                return (MergeOutcome::Unchanged, None);
            }
            let merged = ProgressRecord {
                passed: attempt.passed || current.passed,
                ..attempt
            };
            (MergeOutcome::Improved, Some(merged))
        }
    }
}
