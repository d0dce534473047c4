//! Scoring engine: authoritative quiz state, answer submission, replay.
//!
//! # Invariants
//! - Every question is answered at most once per session.
//! - Scores never decrease; the sum of scores equals the sum of
//!   `points × paths` over the accepted answers.
//! - Rejected submissions do not mutate state.
//! - `Complete` is terminal until `reset`.

pub mod quiz;
pub mod score;
pub mod snapshot;

pub use quiz::{AnswerLog, AnswerOutcome, QuizEngine, QuizError, QuizEvent, QuizPhase};
pub use score::ScoreState;
pub use snapshot::QuizSnapshot;

pub fn crate_info() -> &'static str {
    "compass-engine v0.1.0"
}
