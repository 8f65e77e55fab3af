use std::sync::Arc;

use services::{
    InMemoryProvider, ProviderError, ProviderErrorKind, QuizIntent, QuizSessionController,
    Rejection, SessionPhase, Transition,
};
use trivia_core::model::{Category, CategoryChoice, CategoryId, Difficulty, RawQuestion};

fn question(n: u32) -> RawQuestion {
    RawQuestion {
        category: "Entertainment: Video Games".into(),
        question: format!("Question {n}?"),
        correct_answer: format!("right {n}"),
        incorrect_answers: vec![
            format!("wrong {n}a"),
            format!("wrong {n}b"),
            format!("wrong {n}c"),
        ],
    }
}

fn setup(pool: u32) -> (QuizSessionController, InMemoryProvider) {
    let provider = InMemoryProvider::new(
        vec![
            Category::new(CategoryId::new(9), "General Knowledge"),
            Category::new(CategoryId::new(15), "Entertainment: Video Games"),
        ],
        (1..=pool).map(question).collect(),
    );
    let controller = QuizSessionController::new(Arc::new(provider.clone())).with_seed(2024);
    (controller, provider)
}

fn answer_current(controller: &mut QuizSessionController, correct: bool) {
    let snapshot = controller.snapshot();
    let current = snapshot.current_question.expect("a question to answer");
    let choice = current
        .answers()
        .iter()
        .find(|answer| current.is_correct(answer) == correct)
        .cloned()
        .expect("matching answer");

    assert!(controller.dispatch(QuizIntent::SelectAnswer(choice)).is_applied());
    assert!(controller.dispatch(QuizIntent::Confirm).is_applied());
}

#[tokio::test]
async fn full_session_scores_and_restarts() {
    let (mut controller, _provider) = setup(10);
    controller.load_categories().await.unwrap();

    assert!(
        controller
            .dispatch(QuizIntent::SetCategory(CategoryChoice::Id(CategoryId::new(15))))
            .is_applied()
    );
    assert!(
        controller
            .dispatch(QuizIntent::SetDifficulty(Difficulty::Medium))
            .is_applied()
    );
    assert!(controller.dispatch(QuizIntent::SetAmount(3)).is_applied());
    assert!(controller.start().await.unwrap().is_applied());

    answer_current(&mut controller, true);
    answer_current(&mut controller, true);
    answer_current(&mut controller, false);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Finished);
    assert!(snapshot.is_finished);
    assert!(snapshot.current_question.is_none());
    let summary = snapshot.summary.unwrap();
    assert_eq!(summary.score(), 2);
    assert_eq!(summary.correct_count(), 2);
    assert_eq!(summary.incorrect_count(), 1);

    assert!(controller.dispatch(QuizIntent::Restart).is_applied());
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Configuring);
    assert_eq!(snapshot.config.score(), 0);
    assert_eq!(snapshot.config.amount(), 3);
    assert_eq!(snapshot.config.category(), CategoryChoice::Any);
    assert_eq!(snapshot.config.level(), Difficulty::Easy);
    assert_eq!(snapshot.current_question_index, 0);
    assert!(snapshot.pending_answer.is_none());
    assert!(controller.session().questions().is_empty());
    // categories survive a restart
    assert_eq!(snapshot.categories.len(), 2);
}

#[tokio::test]
async fn presented_answers_are_permutations_with_one_correct() {
    let (mut controller, _provider) = setup(10);
    assert!(controller.dispatch(QuizIntent::SetAmount(10)).is_applied());

    for _ in 0..20 {
        assert!(controller.start().await.unwrap().is_applied());
        for question in controller.session().questions() {
            let mut expected = question.incorrect_answers().to_vec();
            expected.push(question.correct_answer().to_owned());
            expected.sort();

            let mut answers = question.answers().to_vec();
            answers.sort();
            assert_eq!(answers, expected);
            assert_eq!(
                question
                    .answers()
                    .iter()
                    .filter(|a| a.as_str() == question.correct_answer())
                    .count(),
                1
            );
        }
        assert!(controller.dispatch(QuizIntent::Restart).is_applied());
        assert!(controller.dispatch(QuizIntent::SetAmount(10)).is_applied());
    }
}

#[tokio::test]
async fn failed_question_fetch_leaves_state_unchanged() {
    let (mut controller, provider) = setup(10);
    assert!(controller.dispatch(QuizIntent::SetAmount(5)).is_applied());
    provider.set_questions_down(true);

    let err = controller.start().await.unwrap_err();

    assert_eq!(err.kind(), ProviderErrorKind::Unavailable);
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Configuring);
    assert_eq!(snapshot.config.amount(), 5);
    assert!(!snapshot.fetch_in_flight);
    assert!(snapshot.last_error.is_some());

    provider.set_questions_down(false);
    assert!(controller.start().await.unwrap().is_applied());
    assert!(controller.snapshot().last_error.is_none());
}

#[tokio::test]
async fn short_question_set_is_malformed() {
    let (mut controller, _provider) = setup(2);

    let err = controller.start().await.unwrap_err();

    assert!(matches!(
        err,
        ProviderError::CountMismatch {
            expected: 3,
            actual: 2
        }
    ));
    assert_eq!(err.kind(), ProviderErrorKind::MalformedResponse);
    assert_eq!(controller.session().phase(), SessionPhase::Configuring);
}

#[tokio::test]
async fn question_with_duplicated_correct_answer_is_malformed() {
    let (mut controller, provider) = setup(0);
    let mut broken = question(3);
    broken.incorrect_answers.push("right 3".into());
    provider.set_questions(vec![question(1), question(2), broken]);

    let err = controller.start().await.unwrap_err();

    assert!(matches!(err, ProviderError::InvalidQuestion(_)));
    assert!(controller.session().questions().is_empty());
}

#[tokio::test]
async fn start_is_rejected_once_answering() {
    let (mut controller, provider) = setup(10);
    assert!(controller.start().await.unwrap().is_applied());

    assert_eq!(
        controller.start().await.unwrap(),
        Transition::Rejected(Rejection::NotConfiguring)
    );
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test]
async fn confirm_without_selection_is_a_no_op() {
    let (mut controller, _provider) = setup(10);
    assert!(controller.start().await.unwrap().is_applied());
    let before = controller.snapshot();

    assert_eq!(
        controller.dispatch(QuizIntent::Confirm),
        Transition::Rejected(Rejection::NoPendingAnswer)
    );
    assert_eq!(controller.snapshot(), before);
}

#[tokio::test]
async fn out_of_range_amounts_are_clamped() {
    let (mut controller, provider) = setup(10);

    assert!(controller.dispatch(QuizIntent::SetAmount(0)).is_applied());
    assert_eq!(controller.snapshot().config.amount(), 3);
    assert!(controller.dispatch(QuizIntent::SetAmount(50)).is_applied());
    assert_eq!(controller.snapshot().config.amount(), 10);

    assert!(controller.start().await.unwrap().is_applied());
    assert_eq!(provider.requests()[0].amount, 10);
}
