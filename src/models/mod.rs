pub mod dashboard;
pub mod feature;
pub mod game;
pub mod leaderboard;
pub mod learner;
pub mod progress;

pub use dashboard::{GameSummary, LearnerDashboard, LearnerStatistics};
pub use feature::{Feature, Unlocks};
pub use game::{GameRules, GameType, ProgressTable};
pub use leaderboard::{rank_order, LeaderboardEntry, LeaderboardRecord};
pub use learner::{Identity, LearnerRecord, Role};
pub use progress::{merge_attempt, MergeOutcome, ProgressRecord, ProgressSubmission};
