use trivia_core::model::{Category, PresentedQuestion, QuizSummary, SessionConfig};

use super::service::SessionPhase;

/// Read-only copy of controller state handed to a renderer.
///
/// This is intentionally **not** a UI view-model: no pre-formatted strings
/// and no markup. Renderers decide how to show each field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub config: SessionConfig,
    pub categories: Vec<Category>,
    pub current_question_index: usize,
    pub current_question: Option<PresentedQuestion>,
    pub pending_answer: Option<String>,
    pub is_finished: bool,
    pub summary: Option<QuizSummary>,
    pub fetch_in_flight: bool,
    pub last_error: Option<String>,
}

impl SessionSnapshot {
    /// True while a selected answer is waiting for confirmation.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        self.current_question.is_some() && self.pending_answer.is_some()
    }

    /// Name of the chosen category, if one is selected and listed.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        let id = self.config.category().id()?;
        self.categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.name.as_str())
    }
}
