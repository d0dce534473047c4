use compass_bank::QuestionBank;
use compass_common::{PathId, SessionId};
use serde::{Deserialize, Serialize};

use crate::quiz::QuizPhase;
use crate::score::ScoreState;

/// Read-only view of the engine after one transition.
///
/// This is everything the presentation layer may observe: it never holds the
/// engine itself, only the latest `Arc<QuizSnapshot>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSnapshot {
    pub session: SessionId,
    pub phase: QuizPhase,
    /// 1-based index of the question being asked (bank size once complete).
    pub question_index: usize,
    pub total_questions: usize,
    pub answered: usize,
    pub scores: ScoreState,
    /// Paths with a non-zero score, canonical order.
    pub active_paths: Vec<PathId>,
    pub dominant: Option<PathId>,
}

impl QuizSnapshot {
    pub(crate) fn initial(session: SessionId, bank: &QuestionBank) -> Self {
        Self {
            session,
            phase: QuizPhase::InProgress,
            question_index: 1,
            total_questions: bank.len(),
            answered: 0,
            scores: ScoreState::new(),
            active_paths: Vec::new(),
            dominant: None,
        }
    }

    /// Fraction of questions answered, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.answered as f32 / self.total_questions as f32
    }

    pub fn is_active(&self, path: &PathId) -> bool {
        self.active_paths.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_snapshot_has_no_progress() {
        let bank = QuestionBank::builtin();
        let snap = QuizSnapshot::initial(SessionId::new(), &bank);
        assert_eq!(snap.progress(), 0.0);
        assert_eq!(snap.total_questions, 5);
        assert_eq!(snap.question_index, 1);
        assert!(!snap.is_active(&PathId::from("tech")));
    }

    #[test]
    fn progress_is_answered_over_total() {
        let bank = QuestionBank::builtin();
        let mut snap = QuizSnapshot::initial(SessionId::new(), &bank);
        snap.answered = 2;
        assert!((snap.progress() - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let bank = QuestionBank::builtin();
        let snap = QuizSnapshot::initial(SessionId::new(), &bank);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"phase\":\"InProgress\""));
        let back: QuizSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
