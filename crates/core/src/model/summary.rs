/// Final tally of a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    score: u32,
    total: u32,
}

impl QuizSummary {
    /// `score` is capped at `total`.
    #[must_use]
    pub fn new(score: u32, total: u32) -> Self {
        Self {
            score: score.min(total),
            total,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.total - self.score
    }
}
