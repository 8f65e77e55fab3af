//! Shared error types for the services crate.

use thiserror::Error;

use trivia_core::model::QuestionError;

/// The two ways a provider call can fail, as seen by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Network, transport, or service-side failure.
    Unavailable,
    /// The provider answered, but the payload had the wrong shape.
    MalformedResponse,
}

/// Errors emitted by `TriviaProvider` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("trivia provider unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),
    #[error("trivia provider returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("trivia provider connection error: {0}")]
    Connection(String),
    #[error("trivia provider rejected the request (response code {code})")]
    Rejected { code: u32 },
    #[error("malformed provider response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("malformed provider question: {0}")]
    InvalidQuestion(#[from] QuestionError),
    #[error("expected {expected} questions, provider returned {actual}")]
    CountMismatch { expected: u32, actual: usize },
    #[error("invalid provider base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl ProviderError {
    #[must_use]
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            ProviderError::Unavailable(err) if err.is_decode() => {
                ProviderErrorKind::MalformedResponse
            }
            ProviderError::Unavailable(_)
            | ProviderError::HttpStatus(_)
            | ProviderError::Connection(_)
            | ProviderError::Rejected { .. }
            | ProviderError::InvalidBaseUrl(_) => ProviderErrorKind::Unavailable,
            ProviderError::Malformed(_)
            | ProviderError::InvalidQuestion(_)
            | ProviderError::CountMismatch { .. } => ProviderErrorKind::MalformedResponse,
        }
    }
}
