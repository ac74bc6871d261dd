/// Number of stages shipped for every game
pub const STAGES_PER_GAME: u32 = 10;

/// Passing this quiz stage opens the image-guessing game
pub const GUESS_UNLOCK_QUIZ_STAGE: u32 = 5;

/// Passing this guessing stage opens the matching game
pub const MATCHING_UNLOCK_GUESS_STAGE: u32 = 9;

/// Leaderboard rows returned when the caller does not ask for a limit
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Upper bound for a requested leaderboard limit
pub const MAX_LEADERBOARD_SIZE: usize = 100;

/// Maximum age of an identity assertion in seconds (5 minutes)
/// Prevents replaying captured identity headers
pub const MAX_IDENTITY_AGE_SECS: i64 = 300;

/// Column widths carried over from the learner table
pub const MAX_EMAIL_LEN: usize = 150;
pub const MAX_USERNAME_LEN: usize = 100;

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_INVALID_EMAIL: &str = "Invalid email address";

pub const ERR_INVALID_USERNAME: &str = "Display name must be 1-100 characters";

pub const ERR_INVALID_STAGE: &str = "Stage must be between 1 and 10";

pub const ERR_NEGATIVE_SCORE: &str = "Score must not be negative";

pub const ERR_NEGATIVE_TIME: &str = "Time taken must not be negative";

pub const ERR_MISSING_TOTAL_QUESTIONS: &str = "Quiz submissions require total_questions >= 1";

pub const ERR_SCORE_EXCEEDS_TOTAL: &str = "Score exceeds total_questions";

pub const ERR_ACCESS_DENIED: &str = "Access denied";
