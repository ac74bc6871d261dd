use redb::TableDefinition;

/// Learners table: email -> LearnerRecord (serialized)
pub const LEARNERS: TableDefinition<&str, &[u8]> = TableDefinition::new("learners");

/// Quiz progress: (email, stage) -> ProgressRecord (serialized)
pub const QUIZ_PROGRESS: TableDefinition<(&str, u32), &[u8]> =
    TableDefinition::new("quiz_progress");

/// Image-guessing progress: (email, stage) -> ProgressRecord (serialized)
pub const GUESS_PROGRESS: TableDefinition<(&str, u32), &[u8]> =
    TableDefinition::new("guess_progress");

/// Matching progress: (email, stage) -> ProgressRecord (serialized)
pub const MATCHING_PROGRESS: TableDefinition<(&str, u32), &[u8]> =
    TableDefinition::new("matching_progress");

/// Materialized leaderboard: email -> LeaderboardRecord (serialized)
/// Rebuilt from the progress tables on every recompute
pub const LEADERBOARD: TableDefinition<&str, &[u8]> = TableDefinition::new("leaderboard");
