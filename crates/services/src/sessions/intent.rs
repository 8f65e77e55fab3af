use std::fmt;

use trivia_core::model::{CategoryChoice, CategoryId, Difficulty};

/// Synchronous user intents a renderer can dispatch.
///
/// Starting a quiz needs a provider round-trip and goes through
/// `QuizSessionController::start` instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    SetCategory(CategoryChoice),
    SetAmount(u32),
    SetDifficulty(Difficulty),
    SelectAnswer(String),
    Confirm,
    Restart,
}

/// Why an intent was not applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    NotConfiguring,
    NotAnswering,
    NoPendingAnswer,
    UnknownAnswer,
    UnknownCategory(CategoryId),
    EmptyQuestionSet,
    QuestionCount { expected: u32, actual: usize },
    FetchInFlight,
    StaleFetch,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotConfiguring => f.write_str("quiz already started"),
            Rejection::NotAnswering => f.write_str("no question is being answered"),
            Rejection::NoPendingAnswer => f.write_str("select an answer first"),
            Rejection::UnknownAnswer => f.write_str("answer is not one of the options"),
            Rejection::UnknownCategory(id) => write!(f, "unknown category: {id}"),
            Rejection::EmptyQuestionSet => f.write_str("question set is empty"),
            Rejection::QuestionCount { expected, actual } => {
                write!(f, "expected {expected} questions, got {actual}")
            }
            Rejection::FetchInFlight => f.write_str("questions are already loading"),
            Rejection::StaleFetch => f.write_str("question fetch was superseded"),
        }
    }
}

/// Outcome of dispatching an intent. Rejected intents leave state untouched.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Rejected(Rejection),
}

impl Transition {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }

    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Transition::Applied => None,
            Transition::Rejected(reason) => Some(reason),
        }
    }
}

impl From<Rejection> for Transition {
    fn from(reason: Rejection) -> Self {
        Transition::Rejected(reason)
    }
}
