use serde::Serialize;
use std::str::FromStr;

use crate::constants::{GUESS_UNLOCK_QUIZ_STAGE, MATCHING_UNLOCK_GUESS_STAGE};
use crate::error::AppError;
use crate::models::GameType;

/// Game sections gated behind earlier progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Guess,
    Matching,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::Guess, Feature::Matching];

    /// Stage that must be passed to open this feature
    pub fn requirement(&self) -> (GameType, u32) {
        match self {
            Feature::Guess => (GameType::Quiz, GUESS_UNLOCK_QUIZ_STAGE),
            Feature::Matching => (GameType::Guess, MATCHING_UNLOCK_GUESS_STAGE),
        }
    }
}

impl FromStr for Feature {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guess" | "tebak" => Ok(Feature::Guess),
            "matching" => Ok(Feature::Matching),
            other => Err(AppError::MalformedPayload(format!(
                "Unknown feature: {}",
                other
            ))),
        }
    }
}

/// Unlock state of every gated feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Unlocks {
    pub guess: bool,
    pub matching: bool,
}

impl Unlocks {
    pub fn set(&mut self, feature: Feature, unlocked: bool) {
        match feature {
            Feature::Guess => self.guess = unlocked,
            Feature::Matching => self.matching = unlocked,
        }
    }
}
