//! Question bank: the ordered, immutable set of questions the quiz asks.
//!
//! # Invariants
//! - Question ids are unique; bank order is stable.
//! - Every option names at least one career path.
//! - A bank never changes after validation; its fingerprint identifies it.

mod bank;
mod question;

pub use bank::{BankError, BankRules, QuestionBank};
pub use question::{AnswerOption, Question, letter_index, option_letter};

pub fn crate_info() -> &'static str {
    "compass-bank v0.1.0"
}
