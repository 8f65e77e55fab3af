use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shuffle::shuffled;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("correct answer cannot be empty")]
    EmptyCorrectAnswer,

    #[error("correct answer {0:?} is also listed as incorrect")]
    CorrectAnswerRepeated(String),
}

//
// ─── RAW QUESTION ──────────────────────────────────────────────────────────────
//

/// A question exactly as the provider returns it.
///
/// Extra provider fields such as `type` and `difficulty` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub category: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

//
// ─── PRESENTED QUESTION ────────────────────────────────────────────────────────
//

/// A fetched question with its answers in display order.
///
/// `answers` is a permutation of the incorrect answers plus the correct one,
/// and the correct answer appears in it exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedQuestion {
    raw: RawQuestion,
    answers: Vec<String>,
}

impl PresentedQuestion {
    /// Combine and shuffle the answers of a raw question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the question or correct answer is blank, or
    /// the correct answer is also listed among the incorrect ones.
    pub fn from_raw<R>(raw: RawQuestion, rng: &mut R) -> Result<Self, QuestionError>
    where
        R: Rng + ?Sized,
    {
        if raw.question.trim().is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }
        if raw.correct_answer.is_empty() {
            return Err(QuestionError::EmptyCorrectAnswer);
        }
        if raw.incorrect_answers.contains(&raw.correct_answer) {
            return Err(QuestionError::CorrectAnswerRepeated(raw.correct_answer));
        }

        let mut answers = raw.incorrect_answers.clone();
        answers.push(raw.correct_answer.clone());
        let answers = shuffled(answers, rng);

        Ok(Self { raw, answers })
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.raw.category
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.raw.question
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.raw.correct_answer
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> &[String] {
        &self.raw.incorrect_answers
    }

    /// Answers in the order they should be shown.
    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    #[must_use]
    pub fn has_answer(&self, answer: &str) -> bool {
        self.answers.iter().any(|a| a == answer)
    }

    /// Exact string comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.raw.correct_answer == answer
    }
}
