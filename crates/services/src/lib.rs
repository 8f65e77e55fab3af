#![forbid(unsafe_code)]

pub mod error;
pub mod provider;
pub mod sessions;

pub use error::{ProviderError, ProviderErrorKind};
pub use provider::{
    InMemoryProvider, OpenTdbClient, ProviderConfig, QuestionRequest, TriviaProvider,
};

pub use sessions::{
    PendingFetch, QuizIntent, QuizSession, QuizSessionController, Rejection, SessionPhase,
    SessionSnapshot, Transition,
};
