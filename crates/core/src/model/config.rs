use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::CategoryId;

/// Smallest question count a session may request.
pub const AMOUNT_MIN: u32 = 3;
/// Largest question count a session may request.
pub const AMOUNT_MAX: u32 = 10;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("invalid category: {0}")]
    InvalidCategory(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Question difficulty understood by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Wire value for the provider's `difficulty` query parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_owned())),
        }
    }
}

//
// ─── CATEGORY CHOICE ───────────────────────────────────────────────────────────
//

/// Which category questions are drawn from.
///
/// `Any` is the "unselected" sentinel: the provider picks from every category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CategoryChoice {
    #[default]
    Any,
    Id(CategoryId),
}

impl CategoryChoice {
    pub const UNSELECTED: &'static str = "unselected";

    #[must_use]
    pub fn id(self) -> Option<CategoryId> {
        match self {
            CategoryChoice::Any => None,
            CategoryChoice::Id(id) => Some(id),
        }
    }
}

impl fmt::Display for CategoryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryChoice::Any => f.write_str(Self::UNSELECTED),
            CategoryChoice::Id(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for CategoryChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::UNSELECTED) {
            return Ok(Self::Any);
        }
        trimmed
            .parse::<CategoryId>()
            .map(Self::Id)
            .map_err(|_| ConfigError::InvalidCategory(s.to_owned()))
    }
}

//
// ─── SESSION CONFIG ────────────────────────────────────────────────────────────
//

/// User-chosen quiz parameters plus the running score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    score: u32,
    amount: u32,
    category: CategoryChoice,
    level: Difficulty,
}

impl Default for SessionConfig {
    /// `score=0, amount=3, category=unselected, level=easy`.
    fn default() -> Self {
        Self {
            score: 0,
            amount: AMOUNT_MIN,
            category: CategoryChoice::Any,
            level: Difficulty::Easy,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn amount(&self) -> u32 {
        self.amount
    }

    #[must_use]
    pub fn category(&self) -> CategoryChoice {
        self.category
    }

    #[must_use]
    pub fn level(&self) -> Difficulty {
        self.level
    }

    /// Set the question count, clamped to `[AMOUNT_MIN, AMOUNT_MAX]`.
    ///
    /// Returns the value actually stored.
    pub fn set_amount(&mut self, amount: u32) -> u32 {
        self.amount = amount.clamp(AMOUNT_MIN, AMOUNT_MAX);
        self.amount
    }

    pub fn set_category(&mut self, category: CategoryChoice) {
        self.category = category;
    }

    pub fn set_level(&mut self, level: Difficulty) {
        self.level = level;
    }

    /// Count one more correct answer.
    pub fn record_correct(&mut self) {
        self.score = self.score.saturating_add(1);
    }
}
