use redb::TableDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::db::tables;
use crate::error::AppError;

/// Progress table shape shared by every game: (email, stage) -> ProgressRecord
pub type ProgressTable = TableDefinition<'static, (&'static str, u32), &'static [u8]>;

/// The three mini-games a learner can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Quiz,
    Guess,
    Matching,
}

impl GameType {
    pub const ALL: [GameType; 3] = [GameType::Quiz, GameType::Guess, GameType::Matching];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Quiz => "quiz",
            GameType::Guess => "guess",
            GameType::Matching => "matching",
        }
    }

    /// Rules for this game
    ///
    /// Adding a game means adding a variant here and a `GameRules` implementation;
    /// the exhaustive match keeps the two in step.
    pub fn rules(self) -> &'static dyn GameRules {
        match self {
            GameType::Quiz => &QuizRules,
            GameType::Guess => &GuessRules,
            GameType::Matching => &MatchingRules,
        }
    }

    pub fn table(self) -> ProgressTable {
        self.rules().table()
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiz" => Ok(GameType::Quiz),
            "guess" | "tebak" => Ok(GameType::Guess),
            "matching" => Ok(GameType::Matching),
            _ => Err(AppError::InvalidGameType(s.to_string())),
        }
    }
}

/// Per-game storage location and pass policy
pub trait GameRules: Send + Sync {
    fn table(&self) -> ProgressTable;

    /// Whether an attempt with this score passes the stage
    fn is_passed(&self, score: u32, total_questions: u32) -> bool;

    /// Whether submissions must carry the number of questions asked
    fn requires_total_questions(&self) -> bool {
        false
    }
}

/// Quiz: at least half of the questions answered correctly
pub struct QuizRules;

impl GameRules for QuizRules {
    fn table(&self) -> ProgressTable {
        tables::QUIZ_PROGRESS
    }

    fn is_passed(&self, score: u32, total_questions: u32) -> bool {
        // score >= total / 2 without truncating odd totals
        2 * u64::from(score) >= u64::from(total_questions)
    }

    fn requires_total_questions(&self) -> bool {
        true
    }
}

/// Image guessing: any correct guess passes
pub struct GuessRules;

impl GameRules for GuessRules {
    fn table(&self) -> ProgressTable {
        tables::GUESS_PROGRESS
    }

    fn is_passed(&self, score: u32, _total_questions: u32) -> bool {
        score > 0
    }
}

/// Matching: any correct pair passes
pub struct MatchingRules;

impl GameRules for MatchingRules {
    fn table(&self) -> ProgressTable {
        tables::MATCHING_PROGRESS
    }

    fn is_passed(&self, score: u32, _total_questions: u32) -> bool {
        score > 0
    }
}
