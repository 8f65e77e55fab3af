mod memory;
mod opentdb;

use async_trait::async_trait;

use trivia_core::model::{Category, CategoryChoice, Difficulty, RawQuestion, SessionConfig};

use crate::error::ProviderError;

pub use memory::InMemoryProvider;
pub use opentdb::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, OpenTdbClient, ProviderConfig};

/// Parameters for one question-set fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionRequest {
    pub amount: u32,
    pub category: CategoryChoice,
    pub difficulty: Difficulty,
}

impl QuestionRequest {
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            amount: config.amount(),
            category: config.category(),
            difficulty: config.level(),
        }
    }
}

/// Source of trivia categories and questions.
#[async_trait]
pub trait TriviaProvider: Send + Sync {
    /// List every category the provider offers.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport failures or malformed payloads.
    async fn fetch_categories(&self) -> Result<Vec<Category>, ProviderError>;

    /// Fetch a question set matching `request`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport failures, provider rejections,
    /// or malformed payloads.
    async fn fetch_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<RawQuestion>, ProviderError>;
}
