use std::fmt::Write as _;

use services::{SessionPhase, SessionSnapshot};
use trivia_core::model::{AMOUNT_MAX, AMOUNT_MIN, Difficulty};

/// Plain-text rendering of one screen.
#[must_use]
pub fn render(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    match snapshot.phase {
        SessionPhase::Configuring => render_configuring(&mut out, snapshot),
        SessionPhase::Answering => render_answering(&mut out, snapshot),
        SessionPhase::Finished => render_finished(&mut out, snapshot),
    }
    if let Some(err) = snapshot.last_error.as_deref() {
        let _ = writeln!(out, "! {err}");
    }
    out
}

#[must_use]
pub fn help(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Configuring => {
            "commands: category <id|unselected>, amount <n>, difficulty <level>, start, quit"
        }
        SessionPhase::Answering => {
            "commands: <number> to pick an answer, enter/next to confirm, restart, quit"
        }
        SessionPhase::Finished => "commands: restart, quit",
    }
}

fn render_configuring(out: &mut String, snapshot: &SessionSnapshot) {
    let config = &snapshot.config;
    let _ = writeln!(out, "── New quiz ──");
    if snapshot.categories.is_empty() {
        let _ = writeln!(out, "Categories: (none loaded, questions come from any category)");
    } else {
        let _ = writeln!(out, "Categories:");
        for category in &snapshot.categories {
            let _ = writeln!(out, "  {:>3}  {}", category.id.value(), category.name);
        }
    }
    let category = snapshot
        .category_name()
        .map_or_else(|| config.category().to_string(), str::to_owned);
    let levels = Difficulty::ALL.map(Difficulty::as_str).join("/");
    let _ = writeln!(out, "Category: {category}");
    let _ = writeln!(
        out,
        "Number of questions: {} ({AMOUNT_MIN}-{AMOUNT_MAX})",
        config.amount()
    );
    let _ = writeln!(out, "Difficulty: {} ({levels})", config.level());
    if snapshot.fetch_in_flight {
        let _ = writeln!(out, "Loading questions...");
    }
}

fn render_answering(out: &mut String, snapshot: &SessionSnapshot) {
    let Some(question) = snapshot.current_question.as_ref() else {
        return;
    };
    let _ = writeln!(
        out,
        "Question {} of {}    Score: {}",
        snapshot.current_question_index + 1,
        snapshot.config.amount(),
        snapshot.config.score()
    );
    let _ = writeln!(out, "Category: {}", question.category());
    let _ = writeln!(out, "{}", question.question());
    for (i, answer) in question.answers().iter().enumerate() {
        let marker = if snapshot.pending_answer.as_deref() == Some(answer.as_str()) {
            '>'
        } else {
            ' '
        };
        let _ = writeln!(out, "{marker} {}. {answer}", i + 1);
    }
    if snapshot.can_confirm() {
        let _ = writeln!(out, "Press enter for the next question.");
    }
}

fn render_finished(out: &mut String, snapshot: &SessionSnapshot) {
    let Some(summary) = snapshot.summary else {
        return;
    };
    let _ = writeln!(out, "Score: {}", summary.score());
    let _ = writeln!(out, "Correct answers: {}", summary.correct_count());
    let _ = writeln!(out, "Incorrect answers: {}", summary.incorrect_count());
}
