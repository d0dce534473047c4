use std::sync::Arc;

use compass_bank::QuestionBank;
use compass_common::QuestionId;
use compass_engine::{QuizEngine, QuizError, ScoreState};

fn bank() -> Arc<QuestionBank> {
    Arc::new(QuestionBank::builtin())
}

/// Every ordering of `items` (Heap's algorithm).
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    fn heap<T: Clone>(k: usize, items: &mut [T], out: &mut Vec<Vec<T>>) {
        if k <= 1 {
            out.push(items.to_vec());
            return;
        }
        heap(k - 1, items, out);
        for i in 0..k - 1 {
            let j = if k % 2 == 0 { i } else { 0 };
            items.swap(j, k - 1);
            heap(k - 1, items, out);
        }
    }
    let mut items = items.to_vec();
    let mut out = Vec::new();
    heap(items.len(), &mut items, &mut out);
    out
}

/// One fixed choice per question: (question, option index).
const CHOICES: [(u32, usize); 5] = [(1, 0), (2, 1), (3, 1), (4, 2), (5, 0)];

fn run(order: &[(u32, usize)]) -> ScoreState {
    let mut engine = QuizEngine::new(bank());
    for (q, choice) in order {
        engine.submit_choice(QuestionId(*q), *choice).unwrap();
    }
    assert!(engine.is_complete());
    engine.scores().clone()
}

#[test]
fn answer_order_does_not_change_final_scores() {
    let reference = run(&CHOICES);
    let orders = permutations(&CHOICES);
    assert_eq!(orders.len(), 120);
    for order in orders {
        assert_eq!(run(&order), reference, "order {order:?}");
    }
}

#[test]
fn score_sum_matches_weighted_points() {
    let bank = bank();
    let mut engine = QuizEngine::new(Arc::clone(&bank));
    let mut expected = 0u64;
    for (q, choice) in CHOICES {
        let option = &bank.question(QuestionId(q)).unwrap().options[choice];
        expected += u64::from(option.points) * option.paths.len() as u64;
        engine.submit_choice(QuestionId(q), choice).unwrap();
        assert_eq!(engine.scores().total(), expected);
    }
}

#[test]
fn incomplete_until_last_answer_for_every_choice_pattern() {
    for choice in 0..4 {
        let mut engine = QuizEngine::new(bank());
        for q in 1..=5u32 {
            assert!(!engine.is_complete(), "complete before question {q}");
            engine.submit_choice(QuestionId(q), choice).unwrap();
        }
        assert!(engine.is_complete());
    }
}

#[test]
fn double_submission_is_idempotent_for_every_question() {
    let mut engine = QuizEngine::new(bank());
    for q in 1..=4u32 {
        engine.submit_choice(QuestionId(q), 3).unwrap();
        let after_first = engine.scores().clone();
        for choice in 0..4 {
            let err = engine.submit_choice(QuestionId(q), choice).unwrap_err();
            assert_eq!(err, QuizError::AlreadyAnswered(QuestionId(q)));
            assert_eq!(engine.scores(), &after_first);
        }
    }
    assert!(!engine.is_complete());
}

#[test]
fn scores_never_decrease() {
    let mut engine = QuizEngine::new(bank());
    let mut previous = engine.scores().clone();
    for (q, choice) in CHOICES {
        engine.submit_choice(QuestionId(q), choice).unwrap();
        for (path, score) in previous.iter() {
            assert!(engine.scores().get(path) >= score);
        }
        previous = engine.scores().clone();
    }
}

#[test]
fn all_technical_answers_make_tech_dominant() {
    let mut engine = QuizEngine::new(bank());
    for q in 1..=5u32 {
        let outcome = engine.submit_choice(QuestionId(q), 0).unwrap();
        assert_eq!(outcome.dominant.as_ref().map(|p| p.as_str()), Some("tech"));
    }
    let scores = engine.scores();
    assert_eq!(scores.get(&"tech".into()), 47);
    assert_eq!(scores.get(&"science".into()), 20);
}
