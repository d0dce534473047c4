use compass_common::{Category, PathId, QuestionId};
use serde::{Deserialize, Serialize};

/// One selectable answer.
///
/// Selecting it adds `points` to every path in `paths`, so an option tagging
/// two paths contributes twice its points to the grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    /// Stable key, unique within the owning question.
    pub value: String,
    pub paths: Vec<PathId>,
    pub points: u32,
}

impl AnswerOption {
    pub fn new(text: &str, value: &str, paths: &[&str], points: u32) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
            paths: paths.iter().map(|p| PathId::from(*p)).collect(),
            points,
        }
    }

    /// Points this option adds across all of its paths.
    pub fn weight(&self) -> u64 {
        u64::from(self.points) * self.paths.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub category: Category,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn option_at(&self, index: usize) -> Option<&AnswerOption> {
        self.options.get(index)
    }

    /// Whether `option` is one of this question's options (compared by value).
    pub fn offers(&self, option: &AnswerOption) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Letter shown next to the option at `index` ("A", "B", ...).
pub fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .filter(u8::is_ascii_uppercase)
        .map_or('?', char::from)
}

/// Inverse of [`option_letter`], case-insensitive.
pub fn letter_index(letter: char) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    upper
        .is_ascii_uppercase()
        .then(|| usize::from(upper as u8 - b'A'))
}
