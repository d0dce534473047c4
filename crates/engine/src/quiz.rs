use compass_bank::{AnswerOption, Question, QuestionBank};
use compass_common::{PathId, QuestionId, SessionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::score::ScoreState;
use crate::snapshot::QuizSnapshot;

/// Rejections from [`QuizEngine`] operations. None of them mutate state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("question {0} was already answered")]
    AlreadyAnswered(QuestionId),
    #[error("question {0} is not in the bank")]
    UnknownQuestion(QuestionId),
    #[error("option {value:?} does not belong to question {question}")]
    UnknownOption { question: QuestionId, value: String },
    #[error("quiz already complete")]
    QuizAlreadyComplete,
    #[error("answer log was recorded against bank {expected}, not {actual}")]
    FingerprintMismatch { expected: String, actual: String },
}

/// Lifecycle of one quiz run. `Complete` is terminal until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizPhase {
    InProgress,
    Complete,
}

/// A record produced by every accepted transition.
///
/// Answers carry the awarded points and paths so a log is readable without
/// the bank; replay re-resolves them against the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizEvent {
    Answered {
        question: QuestionId,
        option: String,
        points: u32,
        paths: Vec<PathId>,
    },
    Completed,
}

/// Event log tagged with the fingerprint of the bank it was recorded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerLog {
    pub fingerprint: String,
    pub session: SessionId,
    pub events: Vec<QuizEvent>,
}

/// Result of an accepted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question: QuestionId,
    pub scores: ScoreState,
    pub dominant: Option<PathId>,
    pub completed: bool,
}

/// Scoring engine: turns one answer per question into per-path scores.
///
/// All mutations go through `submit_*` and `reset`. Each accepted
/// transition publishes a fresh immutable [`QuizSnapshot`]; the presentation
/// layer reads snapshots and never touches the engine's state.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    bank: Arc<QuestionBank>,
    session: SessionId,
    scores: ScoreState,
    answered: BTreeSet<QuestionId>,
    phase: QuizPhase,
    event_log: Vec<QuizEvent>,
    snapshot: Arc<QuizSnapshot>,
}

impl QuizEngine {
    /// Start a quiz over `bank` in `InProgress` with empty scores.
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        let session = SessionId::new();
        let snapshot = Arc::new(QuizSnapshot::initial(session, &bank));
        tracing::info!(%session, questions = bank.len(), "quiz started");
        Self {
            bank,
            session,
            scores: ScoreState::new(),
            answered: BTreeSet::new(),
            phase: QuizPhase::InProgress,
            event_log: Vec::new(),
            snapshot,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Complete
    }

    pub fn scores(&self) -> &ScoreState {
        &self.scores
    }

    pub fn answered_count(&self) -> usize {
        self.answered.len()
    }

    pub fn is_answered(&self, question: QuestionId) -> bool {
        self.answered.contains(&question)
    }

    /// Highest-scoring path, ties in canonical path order.
    pub fn dominant_path(&self) -> Option<PathId> {
        self.scores.dominant(self.bank.catalog())
    }

    /// Paths with a non-zero score, in canonical order.
    pub fn active_paths(&self) -> Vec<PathId> {
        self.scores.active(self.bank.catalog())
    }

    /// First unanswered question in bank order.
    pub fn current_question(&self) -> Option<&Question> {
        self.bank
            .questions()
            .iter()
            .find(|q| !self.is_answered(q.id))
    }

    /// 1-based position of the current question; the bank size once complete.
    pub fn question_index(&self) -> usize {
        self.snapshot.question_index
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<QuizSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[QuizEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<QuizEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Copy of the event log tagged with this bank's fingerprint.
    pub fn answer_log(&self) -> AnswerLog {
        AnswerLog {
            fingerprint: self.bank.fingerprint().to_owned(),
            session: self.session,
            events: self.event_log.clone(),
        }
    }

    /// Record `option` as the answer to `question`.
    ///
    /// Adds the option's points to every path it names. Rejections leave the
    /// engine untouched.
    pub fn submit_answer(
        &mut self,
        question: QuestionId,
        option: &AnswerOption,
    ) -> Result<AnswerOutcome, QuizError> {
        let offered = self.open_question(question)?.offers(option);
        if !offered {
            return Err(self.reject(QuizError::UnknownOption {
                question,
                value: option.value.clone(),
            }));
        }
        Ok(self.apply(question, option.clone()))
    }

    /// Answer `question` with the option whose value key is `value`.
    pub fn submit_value(
        &mut self,
        question: QuestionId,
        value: &str,
    ) -> Result<AnswerOutcome, QuizError> {
        let option = self.open_question(question)?.option(value).cloned();
        match option {
            Some(option) => Ok(self.apply(question, option)),
            None => Err(self.reject(QuizError::UnknownOption {
                question,
                value: value.to_owned(),
            })),
        }
    }

    /// Answer `question` with the option at `index` (0 = "A").
    pub fn submit_choice(
        &mut self,
        question: QuestionId,
        index: usize,
    ) -> Result<AnswerOutcome, QuizError> {
        let option = self.open_question(question)?.option_at(index).cloned();
        match option {
            Some(option) => Ok(self.apply(question, option)),
            None => Err(self.reject(QuizError::UnknownOption {
                question,
                value: format!("#{index}"),
            })),
        }
    }

    /// Discard all progress and start a new session.
    pub fn reset(&mut self) {
        let previous = self.session;
        self.session = SessionId::new();
        self.scores = ScoreState::new();
        self.answered.clear();
        self.phase = QuizPhase::InProgress;
        self.event_log.clear();
        self.snapshot = Arc::new(QuizSnapshot::initial(self.session, &self.bank));
        tracing::info!(%previous, session = %self.session, "quiz reset");
    }

    /// Rebuild an engine by re-submitting the answers in `events`.
    ///
    /// Fails with the error of the first answer the bank rejects.
    pub fn replay(bank: Arc<QuestionBank>, events: &[QuizEvent]) -> Result<Self, QuizError> {
        let mut engine = Self::new(bank);
        for event in events {
            if let QuizEvent::Answered {
                question, option, ..
            } = event
            {
                engine.submit_value(*question, option)?;
            }
        }
        Ok(engine)
    }

    /// Replay `log`, refusing logs recorded against a different bank.
    pub fn replay_log(bank: Arc<QuestionBank>, log: &AnswerLog) -> Result<Self, QuizError> {
        if log.fingerprint != bank.fingerprint() {
            return Err(QuizError::FingerprintMismatch {
                expected: log.fingerprint.clone(),
                actual: bank.fingerprint().to_owned(),
            });
        }
        Self::replay(bank, &log.events)
    }

    /// Checks shared by every submit path, in precedence order.
    fn open_question(&self, question: QuestionId) -> Result<&Question, QuizError> {
        if self.is_complete() {
            return Err(self.reject(QuizError::QuizAlreadyComplete));
        }
        let Some(q) = self.bank.question(question) else {
            return Err(self.reject(QuizError::UnknownQuestion(question)));
        };
        if self.is_answered(question) {
            return Err(self.reject(QuizError::AlreadyAnswered(question)));
        }
        Ok(q)
    }

    fn reject(&self, err: QuizError) -> QuizError {
        tracing::warn!(session = %self.session, %err, "answer rejected");
        err
    }

    fn apply(&mut self, question: QuestionId, option: AnswerOption) -> AnswerOutcome {
        for path in &option.paths {
            self.scores.award(path, option.points);
        }
        self.answered.insert(question);
        tracing::debug!(
            session = %self.session,
            %question,
            option = %option.value,
            points = option.points,
            paths = option.paths.len(),
            "answer accepted"
        );
        self.event_log.push(QuizEvent::Answered {
            question,
            option: option.value,
            points: option.points,
            paths: option.paths,
        });

        if self.answered.len() == self.bank.len() {
            self.phase = QuizPhase::Complete;
            self.event_log.push(QuizEvent::Completed);
            tracing::info!(
                session = %self.session,
                total = self.scores.total(),
                "quiz complete"
            );
        }

        let dominant = self.dominant_path();
        self.snapshot = Arc::new(QuizSnapshot {
            session: self.session,
            phase: self.phase,
            question_index: self.next_index(),
            total_questions: self.bank.len(),
            answered: self.answered.len(),
            scores: self.scores.clone(),
            active_paths: self.active_paths(),
            dominant: dominant.clone(),
        });

        AnswerOutcome {
            question,
            scores: self.scores.clone(),
            dominant,
            completed: self.is_complete(),
        }
    }

    fn next_index(&self) -> usize {
        self.current_question()
            .and_then(|q| self.bank.index_of(q.id))
            .map_or(self.bank.len(), |i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_bank::BankRules;
    use compass_common::{Category, PathCatalog};

    fn id(s: &str) -> PathId {
        PathId::from(s)
    }

    fn builtin() -> QuizEngine {
        QuizEngine::new(Arc::new(QuestionBank::builtin()))
    }

    /// Two questions: 10 points to {tech, science}, then 8 points to {tech}.
    fn two_question_bank() -> Arc<QuestionBank> {
        let q = |n: u32, options: Vec<AnswerOption>| Question {
            id: QuestionId(n),
            prompt: format!("question {n}"),
            category: Category::Skills,
            options,
        };
        let questions = vec![
            q(
                1,
                vec![
                    AnswerOption::new("Code", "code", &["tech", "science"], 10),
                    AnswerOption::new("Care", "care", &["healthcare"], 10),
                    AnswerOption::new("Paint", "paint", &["arts"], 10),
                ],
            ),
            q(
                2,
                vec![
                    AnswerOption::new("Build", "build", &["tech"], 8),
                    AnswerOption::new("Lead", "lead", &["business"], 8),
                    AnswerOption::new("Design", "design", &["arts"], 8),
                ],
            ),
        ];
        Arc::new(QuestionBank::new(PathCatalog::builtin(), questions, BankRules::default()).unwrap())
    }

    #[test]
    fn engine_starts_in_progress_and_empty() {
        let e = builtin();
        assert_eq!(e.phase(), QuizPhase::InProgress);
        assert!(!e.is_complete());
        assert!(e.scores().is_empty());
        assert_eq!(e.dominant_path(), None);
        assert_eq!(e.question_index(), 1);
        assert_eq!(e.current_question().unwrap().id, QuestionId(1));
    }

    #[test]
    fn worked_example_scores_and_dominant() {
        let mut e = QuizEngine::new(two_question_bank());
        let first = e.submit_value(QuestionId(1), "code").unwrap();
        assert_eq!(first.scores.get(&id("tech")), 10);
        assert_eq!(first.scores.get(&id("science")), 10);
        assert_eq!(first.dominant, Some(id("tech")));
        assert!(!first.completed);

        let second = e.submit_value(QuestionId(2), "build").unwrap();
        assert_eq!(second.scores.get(&id("tech")), 18);
        assert_eq!(second.scores.get(&id("science")), 10);
        assert_eq!(second.scores.len(), 2);
        assert_eq!(second.dominant, Some(id("tech")));
        assert!(second.completed);
        assert!(e.is_complete());
    }

    #[test]
    fn submit_answer_accepts_bank_option() {
        let mut e = builtin();
        let option = e.bank().questions()[0].options[2].clone();
        let outcome = e.submit_answer(QuestionId(1), &option).unwrap();
        assert_eq!(outcome.scores.get(&id("arts")), 10);
        assert_eq!(e.active_paths(), vec![id("arts")]);
    }

    #[test]
    fn second_answer_is_rejected_without_mutation() {
        let mut e = builtin();
        assert!(!e.is_answered(QuestionId(1)));
        e.submit_choice(QuestionId(1), 0).unwrap();
        assert!(e.is_answered(QuestionId(1)));
        assert!(!e.is_answered(QuestionId(2)));
        let before = e.scores().clone();
        let events_before = e.events().len();

        let err = e.submit_choice(QuestionId(1), 1).unwrap_err();
        assert_eq!(err, QuizError::AlreadyAnswered(QuestionId(1)));
        assert_eq!(e.scores(), &before);
        assert_eq!(e.events().len(), events_before);
        assert_eq!(e.answered_count(), 1);
    }

    #[test]
    fn foreign_option_is_unknown() {
        let mut e = builtin();
        let foreign = AnswerOption::new("Juggling", "juggle", &["arts"], 10);
        let err = e.submit_answer(QuestionId(1), &foreign).unwrap_err();
        assert!(matches!(err, QuizError::UnknownOption { ref value, .. } if value == "juggle"));

        // Same value key but different points is still foreign.
        let mut tampered = e.bank().questions()[0].options[0].clone();
        tampered.points = 100;
        assert!(matches!(
            e.submit_answer(QuestionId(1), &tampered),
            Err(QuizError::UnknownOption { .. })
        ));
        // An option from another question does not count either.
        let other = e.bank().questions()[1].options[0].clone();
        assert!(e.submit_answer(QuestionId(1), &other).is_err());
        assert!(e.scores().is_empty());
    }

    #[test]
    fn unknown_question_and_index() {
        let mut e = builtin();
        assert_eq!(
            e.submit_choice(QuestionId(42), 0).unwrap_err(),
            QuizError::UnknownQuestion(QuestionId(42))
        );
        assert!(matches!(
            e.submit_choice(QuestionId(1), 9),
            Err(QuizError::UnknownOption { .. })
        ));
        assert!(matches!(
            e.submit_value(QuestionId(1), "nope"),
            Err(QuizError::UnknownOption { .. })
        ));
    }

    #[test]
    fn complete_is_terminal() {
        let mut e = QuizEngine::new(two_question_bank());
        e.submit_choice(QuestionId(1), 0).unwrap();
        e.submit_choice(QuestionId(2), 0).unwrap();
        assert!(e.is_complete());
        let before = e.scores().clone();
        // Completion wins over every other rejection.
        assert_eq!(
            e.submit_choice(QuestionId(1), 0).unwrap_err(),
            QuizError::QuizAlreadyComplete
        );
        assert_eq!(
            e.submit_choice(QuestionId(9), 0).unwrap_err(),
            QuizError::QuizAlreadyComplete
        );
        assert_eq!(e.scores(), &before);
    }

    #[test]
    fn completion_flips_on_last_answer_only() {
        let mut e = builtin();
        let n = e.bank().len() as u32;
        for i in 1..=n {
            assert!(!e.is_complete());
            e.submit_choice(QuestionId(i), 0).unwrap();
        }
        assert!(e.is_complete());
        assert_eq!(e.events().last(), Some(&QuizEvent::Completed));
    }

    #[test]
    fn question_index_follows_first_unanswered() {
        let mut e = builtin();
        e.submit_choice(QuestionId(2), 0).unwrap();
        assert_eq!(e.question_index(), 1);
        e.submit_choice(QuestionId(1), 0).unwrap();
        assert_eq!(e.question_index(), 3);
        for i in 3..=5 {
            e.submit_choice(QuestionId(i), 0).unwrap();
        }
        assert_eq!(e.question_index(), 5);
    }

    #[test]
    fn snapshots_are_immutable_per_transition() {
        let mut e = builtin();
        let before = e.snapshot();
        e.submit_value(QuestionId(1), "health").unwrap();
        let after = e.snapshot();

        assert_eq!(before.answered, 0);
        assert!(before.scores.is_empty());
        assert_eq!(after.answered, 1);
        assert_eq!(after.dominant, Some(id("healthcare")));
        assert_eq!(after.active_paths, vec![id("healthcare")]);
        assert_eq!(after.question_index, 2);
        assert_eq!(after.session, e.session());
    }

    #[test]
    fn reset_starts_fresh_session() {
        let mut e = builtin();
        let first = e.session();
        e.submit_choice(QuestionId(1), 0).unwrap();
        e.reset();
        assert_ne!(e.session(), first);
        assert!(e.scores().is_empty());
        assert_eq!(e.answered_count(), 0);
        assert!(e.events().is_empty());
        assert_eq!(e.snapshot().answered, 0);
        // The question can be answered again after a reset.
        assert!(e.submit_choice(QuestionId(1), 1).is_ok());
    }

    #[test]
    fn replay_reconstructs_scores() {
        let mut e = builtin();
        e.submit_value(QuestionId(3), "medical").unwrap();
        e.submit_value(QuestionId(1), "technical").unwrap();
        e.submit_value(QuestionId(5), "innovation").unwrap();

        let replayed = QuizEngine::replay(Arc::new(QuestionBank::builtin()), e.events()).unwrap();
        assert_eq!(replayed.scores(), e.scores());
        assert_eq!(replayed.answered_count(), 3);
        assert_eq!(replayed.dominant_path(), e.dominant_path());
    }

    #[test]
    fn replay_log_checks_fingerprint() {
        let mut e = builtin();
        e.submit_choice(QuestionId(1), 0).unwrap();
        let log = e.answer_log();

        let same = QuizEngine::replay_log(Arc::new(QuestionBank::builtin()), &log).unwrap();
        assert_eq!(same.scores(), e.scores());

        let err = QuizEngine::replay_log(two_question_bank(), &log).unwrap_err();
        assert!(matches!(err, QuizError::FingerprintMismatch { .. }));
    }

    #[test]
    fn replay_surfaces_first_bad_event() {
        let events = vec![
            QuizEvent::Answered {
                question: QuestionId(1),
                option: "technical".into(),
                points: 10,
                paths: vec![id("tech"), id("science")],
            },
            QuizEvent::Answered {
                question: QuestionId(1),
                option: "health".into(),
                points: 10,
                paths: vec![id("healthcare")],
            },
        ];
        let err = QuizEngine::replay(Arc::new(QuestionBank::builtin()), &events).unwrap_err();
        assert_eq!(err, QuizError::AlreadyAnswered(QuestionId(1)));
    }

    #[test]
    fn drain_events_clears_log() {
        let mut e = builtin();
        e.submit_choice(QuestionId(1), 0).unwrap();
        let drained = e.drain_events();
        assert_eq!(drained.len(), 1);
        assert!(e.events().is_empty());
    }
}
