use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{SeedableRng, rng};
use tracing::{debug, warn};

use trivia_core::model::{
    Category, CategoryChoice, Difficulty, PresentedQuestion, RawQuestion,
};

use super::intent::{QuizIntent, Rejection, Transition};
use super::service::{QuizSession, SessionPhase};
use super::view::SessionSnapshot;
use crate::error::ProviderError;
use crate::provider::{QuestionRequest, TriviaProvider};

/// Ticket for a question fetch started with `begin_start`.
///
/// Only the ticket of the most recent `begin_start` is honored by
/// `finish_start`; anything older is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    generation: u64,
    request: QuestionRequest,
}

impl PendingFetch {
    #[must_use]
    pub fn request(&self) -> &QuestionRequest {
        &self.request
    }
}

/// Which provider call produced `last_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Categories,
    Questions,
}

impl FetchKind {
    fn as_str(self) -> &'static str {
        match self {
            FetchKind::Categories => "category",
            FetchKind::Questions => "question",
        }
    }
}

/// Owns a quiz session and mediates between the provider and a renderer.
///
/// Runs on a single task: every intent is applied synchronously and the
/// provider calls are the only suspension points. While a question fetch is
/// in flight, a second start and any configuration change are rejected.
pub struct QuizSessionController {
    provider: Arc<dyn TriviaProvider>,
    session: QuizSession,
    categories: Vec<Category>,
    rng: StdRng,
    in_flight: Option<u64>,
    next_generation: u64,
    last_error: Option<(FetchKind, String)>,
}

impl QuizSessionController {
    #[must_use]
    pub fn new(provider: Arc<dyn TriviaProvider>) -> Self {
        Self {
            provider,
            session: QuizSession::new(),
            categories: Vec::new(),
            rng: StdRng::from_rng(&mut rng()),
            in_flight: None,
            next_generation: 0,
            last_error: None,
        }
    }

    /// Use a caller-supplied random source for answer shuffling.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Fetch the category list, replacing whatever was loaded before.
    ///
    /// A selected category that is missing from the new list falls back to
    /// `CategoryChoice::Any`. On failure the current list is kept and the
    /// error is recorded for the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the `ProviderError` from the fetch.
    pub async fn load_categories(&mut self) -> Result<usize, ProviderError> {
        match self.provider.fetch_categories().await {
            Ok(categories) => {
                debug!(count = categories.len(), "loaded trivia categories");
                self.categories = categories;
                self.drop_unlisted_category();
                if matches!(self.last_error, Some((FetchKind::Categories, _))) {
                    self.last_error = None;
                }
                Ok(self.categories.len())
            }
            Err(err) => Err(self.record_failure(FetchKind::Categories, err)),
        }
    }

    /// Fetch a question set for the current config and start answering.
    ///
    /// # Errors
    ///
    /// Returns the `ProviderError` from the fetch or from validating its
    /// payload. Prior state is left untouched in that case.
    pub async fn start(&mut self) -> Result<Transition, ProviderError> {
        let ticket = match self.begin_start() {
            Ok(ticket) => ticket,
            Err(reason) => return Ok(reason.into()),
        };
        let result = self.provider.fetch_questions(ticket.request()).await;
        self.finish_start(ticket, result)
    }

    /// First half of `start`: mark a question fetch as in flight.
    ///
    /// # Errors
    ///
    /// Returns `Rejection::FetchInFlight` if a fetch is already outstanding,
    /// or `Rejection::NotConfiguring` once questions are loaded.
    pub fn begin_start(&mut self) -> Result<PendingFetch, Rejection> {
        if self.in_flight.is_some() {
            debug!("ignoring start while a question fetch is in flight");
            return Err(Rejection::FetchInFlight);
        }
        if self.session.phase() != SessionPhase::Configuring {
            return Err(Rejection::NotConfiguring);
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        self.in_flight = Some(generation);

        let request = QuestionRequest::from_config(self.session.config());
        debug!(generation, ?request, "question fetch started");
        Ok(PendingFetch {
            generation,
            request,
        })
    }

    /// Second half of `start`: apply the provider's answer for `ticket`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, `ProviderError::CountMismatch` if the set
    /// size differs from the request, or `ProviderError::InvalidQuestion`
    /// if a question cannot be presented.
    pub fn finish_start(
        &mut self,
        ticket: PendingFetch,
        result: Result<Vec<RawQuestion>, ProviderError>,
    ) -> Result<Transition, ProviderError> {
        if self.in_flight != Some(ticket.generation) {
            warn!(generation = ticket.generation, "discarding stale question fetch");
            return Ok(Rejection::StaleFetch.into());
        }
        self.in_flight = None;

        let raw = match result {
            Ok(raw) => raw,
            Err(err) => return Err(self.record_failure(FetchKind::Questions, err)),
        };

        let expected = ticket.request.amount;
        if usize::try_from(expected).ok() != Some(raw.len()) {
            let err = ProviderError::CountMismatch {
                expected,
                actual: raw.len(),
            };
            return Err(self.record_failure(FetchKind::Questions, err));
        }

        let presented = raw
            .into_iter()
            .map(|question| PresentedQuestion::from_raw(question, &mut self.rng))
            .collect::<Result<Vec<_>, _>>();
        let presented = match presented {
            Ok(presented) => presented,
            Err(err) => return Err(self.record_failure(FetchKind::Questions, err.into())),
        };

        let transition = self.session.load_questions(presented);
        if transition.is_applied() {
            debug!(count = expected, "question set loaded");
            self.last_error = None;
        }
        Ok(transition)
    }

    pub fn set_category(&mut self, category: CategoryChoice) -> Transition {
        if self.in_flight.is_some() {
            return Rejection::FetchInFlight.into();
        }
        if let CategoryChoice::Id(id) = category {
            if !self.categories.iter().any(|listed| listed.id == id) {
                return Rejection::UnknownCategory(id).into();
            }
        }
        self.session.set_category(category)
    }

    /// Values outside `[AMOUNT_MIN, AMOUNT_MAX]` are clamped.
    pub fn set_amount(&mut self, amount: u32) -> Transition {
        if self.in_flight.is_some() {
            return Rejection::FetchInFlight.into();
        }
        self.session.set_amount(amount)
    }

    pub fn set_difficulty(&mut self, level: Difficulty) -> Transition {
        if self.in_flight.is_some() {
            return Rejection::FetchInFlight.into();
        }
        self.session.set_difficulty(level)
    }

    pub fn select_answer(&mut self, answer: &str) -> Transition {
        self.session.select_answer(answer)
    }

    pub fn confirm(&mut self) -> Transition {
        let transition = self.session.confirm();
        if transition.is_applied() {
            debug!(
                index = self.session.current_index(),
                score = self.session.config().score(),
                "answer confirmed"
            );
        }
        transition
    }

    /// Reset to a fresh session. An outstanding question fetch is abandoned.
    pub fn restart(&mut self) -> Transition {
        self.in_flight = None;
        self.last_error = None;
        self.session.restart()
    }

    /// Route a synchronous intent to its handler.
    pub fn dispatch(&mut self, intent: QuizIntent) -> Transition {
        let transition = match intent {
            QuizIntent::SetCategory(category) => self.set_category(category),
            QuizIntent::SetAmount(amount) => self.set_amount(amount),
            QuizIntent::SetDifficulty(level) => self.set_difficulty(level),
            QuizIntent::SelectAnswer(answer) => self.select_answer(&answer),
            QuizIntent::Confirm => self.confirm(),
            QuizIntent::Restart => self.restart(),
        };
        if let Some(reason) = transition.rejection() {
            debug!(%reason, "intent rejected");
        }
        transition
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.session.phase(),
            config: self.session.config().clone(),
            categories: self.categories.clone(),
            current_question_index: self.session.current_index(),
            current_question: self.session.current_question().cloned(),
            pending_answer: self.session.pending_answer().map(str::to_owned),
            is_finished: self.session.is_finished(),
            summary: self.session.summary(),
            fetch_in_flight: self.in_flight.is_some(),
            last_error: self.last_error.as_ref().map(|(_, message)| message.clone()),
        }
    }

    fn drop_unlisted_category(&mut self) {
        let Some(id) = self.session.config().category().id() else {
            return;
        };
        if self.categories.iter().any(|listed| listed.id == id) {
            return;
        }
        // Outside Configuring the choice has already been sent; restart resets it.
        if self.session.set_category(CategoryChoice::Any).is_applied() {
            debug!(%id, "selected category no longer listed, using any category");
        }
    }

    fn record_failure(&mut self, kind: FetchKind, err: ProviderError) -> ProviderError {
        warn!(kind = ?err.kind(), error = %err, "{} fetch failed", kind.as_str());
        self.last_error = Some((kind, err.to_string()));
        err
    }
}

impl fmt::Debug for QuizSessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSessionController")
            .field("session", &self.session)
            .field("categories_len", &self.categories.len())
            .field("in_flight", &self.in_flight)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryProvider;
    use trivia_core::model::CategoryId;

    fn question(n: u32) -> RawQuestion {
        RawQuestion {
            category: "Science: Computers".into(),
            question: format!("Question {n}?"),
            correct_answer: format!("right {n}"),
            incorrect_answers: vec![format!("wrong {n}a"), format!("wrong {n}b")],
        }
    }

    fn controller(pool: u32) -> (QuizSessionController, InMemoryProvider) {
        let provider = InMemoryProvider::new(
            vec![
                Category::new(CategoryId::new(9), "General Knowledge"),
                Category::new(CategoryId::new(18), "Science: Computers"),
            ],
            (1..=pool).map(question).collect(),
        );
        let controller = QuizSessionController::new(Arc::new(provider.clone())).with_seed(99);
        (controller, provider)
    }

    #[tokio::test]
    async fn categories_load_on_request() {
        let (mut controller, _provider) = controller(3);

        assert_eq!(controller.load_categories().await.unwrap(), 2);
        assert_eq!(controller.categories()[1].name, "Science: Computers");
    }

    #[tokio::test]
    async fn category_failure_leaves_list_empty_and_is_recorded() {
        let (mut controller, provider) = controller(3);
        provider.set_categories_down(true);

        assert!(controller.load_categories().await.is_err());
        assert!(controller.categories().is_empty());
        assert!(controller.snapshot().last_error.is_some());
        assert!(
            controller
                .set_category(CategoryChoice::Any)
                .is_applied()
        );
    }

    #[tokio::test]
    async fn reload_drops_selected_category_that_disappeared() {
        let (mut controller, provider) = controller(3);
        controller.load_categories().await.unwrap();
        assert!(
            controller
                .set_category(CategoryChoice::Id(CategoryId::new(9)))
                .is_applied()
        );

        provider.set_categories(vec![Category::new(CategoryId::new(18), "Science: Computers")]);
        assert_eq!(controller.load_categories().await.unwrap(), 1);

        assert_eq!(controller.session().config().category(), CategoryChoice::Any);
        let ticket = controller.begin_start().unwrap();
        assert_eq!(ticket.request().category, CategoryChoice::Any);
    }

    #[tokio::test]
    async fn reload_keeps_selected_category_still_listed() {
        let (mut controller, provider) = controller(3);
        controller.load_categories().await.unwrap();
        assert!(
            controller
                .set_category(CategoryChoice::Id(CategoryId::new(18)))
                .is_applied()
        );

        provider.set_categories(vec![Category::new(CategoryId::new(18), "Science: Computers")]);
        controller.load_categories().await.unwrap();

        assert_eq!(
            controller.session().config().category(),
            CategoryChoice::Id(CategoryId::new(18))
        );
    }

    #[tokio::test]
    async fn category_reload_keeps_question_fetch_error() {
        let (mut controller, _provider) = controller(0);
        assert!(controller.start().await.is_err());
        let error = controller.snapshot().last_error;
        assert!(error.is_some());

        controller.load_categories().await.unwrap();

        assert_eq!(controller.snapshot().last_error, error);
    }

    #[tokio::test]
    async fn category_success_clears_category_error() {
        let (mut controller, provider) = controller(3);
        provider.set_categories_down(true);
        assert!(controller.load_categories().await.is_err());

        provider.set_categories_down(false);
        controller.load_categories().await.unwrap();

        assert!(controller.snapshot().last_error.is_none());
    }

    #[tokio::test]
    async fn unlisted_category_is_rejected() {
        let (mut controller, _provider) = controller(3);
        controller.load_categories().await.unwrap();

        assert_eq!(
            controller.set_category(CategoryChoice::Id(CategoryId::new(99))),
            Transition::Rejected(Rejection::UnknownCategory(CategoryId::new(99)))
        );
        assert!(
            controller
                .set_category(CategoryChoice::Id(CategoryId::new(18)))
                .is_applied()
        );
        assert_eq!(
            controller.snapshot().category_name(),
            Some("Science: Computers")
        );
    }

    #[tokio::test]
    async fn start_sends_config_to_provider() {
        let (mut controller, provider) = controller(10);
        controller.load_categories().await.unwrap();
        assert!(controller.set_amount(4).is_applied());
        assert!(controller.set_difficulty(Difficulty::Hard).is_applied());
        assert!(
            controller
                .set_category(CategoryChoice::Id(CategoryId::new(9)))
                .is_applied()
        );

        assert!(controller.start().await.unwrap().is_applied());

        assert_eq!(
            provider.requests(),
            vec![QuestionRequest {
                amount: 4,
                category: CategoryChoice::Id(CategoryId::new(9)),
                difficulty: Difficulty::Hard,
            }]
        );
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Answering);
        assert_eq!(snapshot.current_question_index, 0);
        assert_eq!(snapshot.current_question.unwrap().answers().len(), 3);
    }

    #[test]
    fn second_start_while_in_flight_is_ignored() {
        let (mut controller, _provider) = controller(3);

        let ticket = controller.begin_start().unwrap();
        assert_eq!(controller.begin_start(), Err(Rejection::FetchInFlight));
        assert_eq!(
            controller.set_amount(7),
            Transition::Rejected(Rejection::FetchInFlight)
        );
        assert!(controller.snapshot().fetch_in_flight);

        let questions = (1..=3).map(question).collect();
        assert!(controller.finish_start(ticket, Ok(questions)).unwrap().is_applied());
        assert!(!controller.is_fetching());
    }

    #[test]
    fn fetch_abandoned_by_restart_is_discarded() {
        let (mut controller, _provider) = controller(3);
        let ticket = controller.begin_start().unwrap();

        assert!(controller.restart().is_applied());
        let questions = (1..=3).map(question).collect();

        assert_eq!(
            controller.finish_start(ticket, Ok(questions)).unwrap(),
            Transition::Rejected(Rejection::StaleFetch)
        );
        assert_eq!(controller.session().phase(), SessionPhase::Configuring);
    }

    #[test]
    fn same_seed_presents_same_answer_order() {
        let (mut first, _p1) = controller(3);
        let (mut second, _p2) = controller(3);

        for c in [&mut first, &mut second] {
            let ticket = c.begin_start().unwrap();
            let questions = (1..=3).map(question).collect();
            assert!(c.finish_start(ticket, Ok(questions)).unwrap().is_applied());
        }

        assert_eq!(first.session().questions(), second.session().questions());
    }
}
