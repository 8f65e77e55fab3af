use std::fmt;

use trivia_core::model::{
    CategoryChoice, Difficulty, PresentedQuestion, QuizSummary, SessionConfig,
};

use super::intent::{Rejection, Transition};

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Which screen the session is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// No question set loaded yet.
    Configuring,
    /// `current_index < amount`.
    Answering,
    /// `current_index == amount`.
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session state machine.
///
/// Each intent is a method that either applies fully or returns
/// `Transition::Rejected` without touching state. The phase is recomputed
/// once at the end of every applied transition.
pub struct QuizSession {
    config: SessionConfig,
    questions: Vec<PresentedQuestion>,
    current: usize,
    pending_answer: Option<String>,
    phase: SessionPhase,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            questions: Vec::new(),
            current: 0,
            pending_answer: None,
            phase: SessionPhase::Configuring,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[PresentedQuestion] {
        &self.questions
    }

    /// 0-based index of the question being answered.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn pending_answer(&self) -> Option<&str> {
        self.pending_answer.as_deref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&PresentedQuestion> {
        match self.phase {
            SessionPhase::Answering => self.questions.get(self.current),
            SessionPhase::Configuring | SessionPhase::Finished => None,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    /// Final tally, available once every question has been confirmed.
    #[must_use]
    pub fn summary(&self) -> Option<QuizSummary> {
        self.is_finished()
            .then(|| QuizSummary::new(self.config.score(), self.config.amount()))
    }

    pub fn set_category(&mut self, category: CategoryChoice) -> Transition {
        if self.phase != SessionPhase::Configuring {
            return Rejection::NotConfiguring.into();
        }
        self.config.set_category(category);
        Transition::Applied
    }

    /// Out-of-range values are clamped to `[AMOUNT_MIN, AMOUNT_MAX]`.
    pub fn set_amount(&mut self, amount: u32) -> Transition {
        if self.phase != SessionPhase::Configuring {
            return Rejection::NotConfiguring.into();
        }
        self.config.set_amount(amount);
        Transition::Applied
    }

    pub fn set_difficulty(&mut self, level: Difficulty) -> Transition {
        if self.phase != SessionPhase::Configuring {
            return Rejection::NotConfiguring.into();
        }
        self.config.set_level(level);
        Transition::Applied
    }

    /// Install a fetched question set and move to `Answering`.
    ///
    /// The set must hold exactly `amount` questions.
    pub fn load_questions(&mut self, questions: Vec<PresentedQuestion>) -> Transition {
        if self.phase != SessionPhase::Configuring {
            return Rejection::NotConfiguring.into();
        }
        if questions.is_empty() {
            return Rejection::EmptyQuestionSet.into();
        }
        let expected = self.config.amount();
        if usize::try_from(expected).ok() != Some(questions.len()) {
            return Rejection::QuestionCount {
                expected,
                actual: questions.len(),
            }
            .into();
        }

        self.questions = questions;
        self.current = 0;
        self.pending_answer = None;
        self.refresh_phase();
        Transition::Applied
    }

    /// Choose (or re-choose) an answer for the current question.
    pub fn select_answer(&mut self, answer: &str) -> Transition {
        let Some(question) = self.current_question() else {
            return Rejection::NotAnswering.into();
        };
        if !question.has_answer(answer) {
            return Rejection::UnknownAnswer.into();
        }
        self.pending_answer = Some(answer.to_owned());
        Transition::Applied
    }

    /// Lock in the pending answer: score it, clear it, and advance.
    pub fn confirm(&mut self) -> Transition {
        let Some(question) = self.current_question() else {
            return Rejection::NotAnswering.into();
        };
        let Some(pending) = self.pending_answer.as_deref() else {
            return Rejection::NoPendingAnswer.into();
        };

        if question.is_correct(pending) {
            self.config.record_correct();
        }
        self.pending_answer = None;
        self.current += 1;
        self.refresh_phase();
        Transition::Applied
    }

    /// Back to defaults with no questions loaded.
    pub fn restart(&mut self) -> Transition {
        *self = Self::new();
        Transition::Applied
    }

    fn refresh_phase(&mut self) {
        let amount = usize::try_from(self.config.amount()).unwrap_or(usize::MAX);
        self.phase = if self.questions.is_empty() {
            SessionPhase::Configuring
        } else if self.current >= amount {
            SessionPhase::Finished
        } else {
            SessionPhase::Answering
        };
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("config", &self.config)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("pending_answer", &self.pending_answer)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
