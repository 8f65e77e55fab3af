use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use trivia_core::model::{Category, RawQuestion};

use super::{QuestionRequest, TriviaProvider};
use crate::error::ProviderError;

#[derive(Default)]
struct MemoryState {
    categories: Vec<Category>,
    questions: Vec<RawQuestion>,
    categories_down: bool,
    questions_down: bool,
    requests: Vec<QuestionRequest>,
}

/// Simple in-memory provider for testing and offline prototyping.
///
/// Serves up to `request.amount` questions from its pool, in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryProvider {
    #[must_use]
    pub fn new(categories: Vec<Category>, questions: Vec<RawQuestion>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                categories,
                questions,
                ..MemoryState::default()
            })),
        }
    }

    /// Make category fetches fail (or succeed again).
    pub fn set_categories_down(&self, down: bool) {
        if let Ok(mut guard) = self.state.lock() {
            guard.categories_down = down;
        }
    }

    /// Make question fetches fail (or succeed again).
    pub fn set_questions_down(&self, down: bool) {
        if let Ok(mut guard) = self.state.lock() {
            guard.questions_down = down;
        }
    }

    pub fn set_categories(&self, categories: Vec<Category>) {
        if let Ok(mut guard) = self.state.lock() {
            guard.categories = categories;
        }
    }

    pub fn set_questions(&self, questions: Vec<RawQuestion>) {
        if let Ok(mut guard) = self.state.lock() {
            guard.questions = questions;
        }
    }

    /// Every question request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<QuestionRequest> {
        self.state
            .lock()
            .map(|guard| guard.requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TriviaProvider for InMemoryProvider {
    async fn fetch_categories(&self) -> Result<Vec<Category>, ProviderError> {
        let guard = self
            .state
            .lock()
            .map_err(|e| ProviderError::Connection(e.to_string()))?;
        if guard.categories_down {
            return Err(ProviderError::Connection("categories unavailable".into()));
        }
        Ok(guard.categories.clone())
    }

    async fn fetch_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<RawQuestion>, ProviderError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| ProviderError::Connection(e.to_string()))?;
        guard.requests.push(*request);
        if guard.questions_down {
            return Err(ProviderError::Connection("questions unavailable".into()));
        }
        let take = usize::try_from(request.amount).unwrap_or(usize::MAX);
        Ok(guard.questions.iter().take(take).cloned().collect())
    }
}
