mod category;
mod config;
mod ids;
mod question;
mod summary;

pub use ids::{CategoryId, ParseIdError};

pub use category::Category;
pub use config::{AMOUNT_MAX, AMOUNT_MIN, CategoryChoice, ConfigError, Difficulty, SessionConfig};
pub use question::{PresentedQuestion, QuestionError, RawQuestion};
pub use summary::QuizSummary;
