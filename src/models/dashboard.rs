use serde::Serialize;

use crate::constants::STAGES_PER_GAME;
use crate::models::{GameType, ProgressRecord};

/// Passed-stage summary for one game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    /// Highest passed stage, 0 when nothing is passed
    pub max_stage: u32,
    pub score_sum: u64,
    pub time_sum: u64,
    /// Stage the game opens at next
    pub next_stage: u32,
}

impl GameSummary {
    /// Fold stored records into a summary; failed stages are ignored
    pub fn from_records<'a>(records: impl IntoIterator<Item = (u32, &'a ProgressRecord)>) -> Self {
        let mut summary = GameSummary::default();
        for (stage, record) in records {
            if !record.passed {
                continue;
            }
            summary.max_stage = summary.max_stage.max(stage);
            summary.score_sum += u64::from(record.score);
            summary.time_sum += u64::from(record.time_taken);
        }
        summary.next_stage = (summary.max_stage + 1).min(STAGES_PER_GAME);
        summary
    }
}

/// Learner view over the three games
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LearnerDashboard {
    pub quiz: GameSummary,
    pub guess: GameSummary,
    pub matching: GameSummary,
    pub total_score: u64,
    pub total_time_sum: u64,
}

impl LearnerDashboard {
    pub fn set_game(&mut self, game: GameType, summary: GameSummary) {
        match game {
            GameType::Quiz => self.quiz = summary,
            GameType::Guess => self.guess = summary,
            GameType::Matching => self.matching = summary,
        }
        self.total_score = self.quiz.score_sum + self.guess.score_sum + self.matching.score_sum;
        self.total_time_sum = self.quiz.time_sum + self.guess.time_sum + self.matching.time_sum;
    }
}

/// One row of the instructor view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearnerStatistics {
    pub username: String,
    pub email: String,
    #[serde(flatten)]
    pub dashboard: LearnerDashboard,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: u32, passed: bool, time_taken: u32) -> ProgressRecord {
        ProgressRecord {
            score,
            passed,
            time_taken,
            updated_at: 0,
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = GameSummary::from_records(std::iter::empty());
        assert_eq!(summary.max_stage, 0);
        assert_eq!(summary.score_sum, 0);
        assert_eq!(summary.next_stage, 1);
    }

    #[test]
    fn test_summary_ignores_failed_stages() {
        let records = [
            (1, record(8, true, 40)),
            (2, record(6, true, 35)),
            (3, record(2, false, 50)),
        ];
        let summary = GameSummary::from_records(records.iter().map(|(s, r)| (*s, r)));
        assert_eq!(summary.max_stage, 2);
        assert_eq!(summary.score_sum, 14);
        assert_eq!(summary.time_sum, 75);
        assert_eq!(summary.next_stage, 3);
    }

    #[test]
    fn test_next_stage_caps_at_last_stage() {
        let last = record(1, true, 5);
        let summary = GameSummary::from_records([(STAGES_PER_GAME, &last)]);
        assert_eq!(summary.next_stage, STAGES_PER_GAME);
    }

    #[test]
    fn test_dashboard_totals() {
        let mut dashboard = LearnerDashboard::default();
        let passed = record(9, true, 20);
        let other = record(3, true, 10);
        dashboard.set_game(GameType::Quiz, GameSummary::from_records([(1, &passed)]));
        dashboard.set_game(GameType::Matching, GameSummary::from_records([(1, &other)]));

        assert_eq!(dashboard.total_score, 12);
        assert_eq!(dashboard.total_time_sum, 30);
        assert_eq!(dashboard.guess.max_stage, 0);
        assert_eq!(dashboard.quiz.max_stage, 1);
    }
}
