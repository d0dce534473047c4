use compass_common::PathCatalog;
use compass_engine::{QuizEngine, ScoreState};
use serde::{Deserialize, Serialize};

use crate::result::{RankedEntry, RankedResult};

/// How scores are converted to whole percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rounding {
    /// Each entry rounded on its own (half up). The sum may drift from 100
    /// by up to one point per entry.
    #[default]
    Independent,
    /// Floor every share, then hand the leftover points to the largest
    /// remainders. Sums to exactly 100 whenever the total is non-zero.
    LargestRemainder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankConfig {
    pub rounding: Rounding,
}

/// Errors from ranking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankError {
    #[error("quiz is not complete: {answered} of {total} questions answered")]
    PreconditionFailed { answered: usize, total: usize },
}

/// Produces the final [`RankedResult`] of a completed quiz.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    pub config: RankConfig,
}

impl Ranker {
    pub fn new(config: RankConfig) -> Self {
        Self { config }
    }

    /// Rank the engine's scores. The engine must be complete.
    pub fn rank(&self, engine: &QuizEngine) -> Result<RankedResult, RankError> {
        let _span = tracing::info_span!("rank", session = %engine.session()).entered();
        if !engine.is_complete() {
            let err = RankError::PreconditionFailed {
                answered: engine.answered_count(),
                total: engine.bank().len(),
            };
            tracing::warn!(%err, "ranking refused");
            return Err(err);
        }
        let result = rank_scores(
            engine.scores(),
            engine.bank().catalog(),
            self.config.rounding,
            engine.answered_count(),
        );
        tracing::info!(
            best = ?result.best().map(|e| e.path.as_str()),
            total = result.total_score,
            "quiz ranked"
        );
        Ok(result)
    }
}

/// Rank `scores` without the completion check.
///
/// Entries are sorted by score descending with ties in canonical path order.
pub fn rank_scores(
    scores: &ScoreState,
    catalog: &PathCatalog,
    rounding: Rounding,
    answered_questions: usize,
) -> RankedResult {
    let ordered = scores.ordered(catalog);
    let total_score = scores.total();
    let raw: Vec<u64> = ordered.iter().map(|(_, s)| *s).collect();
    let percentages = match rounding {
        Rounding::Independent => independent(&raw, total_score),
        Rounding::LargestRemainder => largest_remainder(&raw, total_score),
    };
    let entries = ordered
        .into_iter()
        .zip(percentages)
        .map(|((path, score), percentage)| {
            tracing::debug!(%path, score, percentage, "ranked path");
            RankedEntry {
                path,
                score,
                percentage,
            }
        })
        .collect();
    RankedResult {
        entries,
        total_score,
        answered_questions,
        rounding,
    }
}

/// `round(100 * s / total)` per entry, in integers.
fn independent(scores: &[u64], total: u64) -> Vec<u32> {
    if total == 0 {
        return vec![0; scores.len()];
    }
    let total = u128::from(total);
    scores
        .iter()
        .map(|&s| {
            let p = (200 * u128::from(s) + total) / (2 * total);
            to_percent(p)
        })
        .collect()
}

/// Hamilton apportionment of 100 points. `scores` must already be in rank
/// order; remainder ties go to the higher-ranked entry.
fn largest_remainder(scores: &[u64], total: u64) -> Vec<u32> {
    if total == 0 {
        return vec![0; scores.len()];
    }
    let total = u128::from(total);
    let mut shares: Vec<u32> = Vec::with_capacity(scores.len());
    let mut remainders: Vec<(usize, u128)> = Vec::with_capacity(scores.len());
    for (i, &s) in scores.iter().enumerate() {
        let scaled = 100 * u128::from(s);
        shares.push(to_percent(scaled / total));
        remainders.push((i, scaled % total));
    }
    let assigned: u32 = shares.iter().sum();
    let leftover = 100u32.saturating_sub(assigned) as usize;
    remainders.sort_by(|(ia, ra), (ib, rb)| rb.cmp(ra).then(ia.cmp(ib)));
    for (i, _) in remainders.into_iter().take(leftover) {
        shares[i] += 1;
    }
    shares
}

fn to_percent(p: u128) -> u32 {
    u32::try_from(p).unwrap_or(100).min(100)
}
