mod controller;
mod intent;
mod service;
mod view;

// Public API of the session subsystem.
pub use controller::{PendingFetch, QuizSessionController};
pub use intent::{QuizIntent, Rejection, Transition};
pub use service::{QuizSession, SessionPhase};
pub use view::SessionSnapshot;
