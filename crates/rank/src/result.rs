use compass_common::PathId;
use serde::{Deserialize, Serialize};

use crate::ranker::Rounding;

/// One row of the results breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub path: PathId,
    pub score: u64,
    /// Share of the total score, 0..=100.
    pub percentage: u32,
}

/// Final, immutable ranking of a completed quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedResult {
    pub entries: Vec<RankedEntry>,
    /// Sum of all path scores. Larger than the points available per
    /// question whenever an option tags several paths.
    pub total_score: u64,
    pub answered_questions: usize,
    pub rounding: Rounding,
}

impl RankedResult {
    /// The best match, if any path scored.
    pub fn best(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn entry(&self, path: &PathId) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| &e.path == path)
    }

    /// Sum of displayed percentages. Exactly 100 under largest-remainder
    /// rounding; off by at most one per entry under independent rounding.
    pub fn percentage_sum(&self) -> u32 {
        self.entries.iter().map(|e| e.percentage).sum()
    }
}

/// Badge text for the entry at `index`: "Best Match", "2nd Choice", ...
pub fn ordinal_label(index: usize) -> String {
    if index == 0 {
        return "Best Match".to_string();
    }
    let n = index + 1;
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix} Choice")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, score: u64, percentage: u32) -> RankedEntry {
        RankedEntry {
            path: PathId::from(path),
            score,
            percentage,
        }
    }

    #[test]
    fn ordinal_labels() {
        assert_eq!(ordinal_label(0), "Best Match");
        assert_eq!(ordinal_label(1), "2nd Choice");
        assert_eq!(ordinal_label(2), "3rd Choice");
        assert_eq!(ordinal_label(3), "4th Choice");
        assert_eq!(ordinal_label(10), "11th Choice");
        assert_eq!(ordinal_label(20), "21st Choice");
    }

    #[test]
    fn best_and_lookup() {
        let result = RankedResult {
            entries: vec![entry("tech", 18, 64), entry("science", 10, 36)],
            total_score: 28,
            answered_questions: 2,
            rounding: Rounding::Independent,
        };
        assert_eq!(result.best().unwrap().path.as_str(), "tech");
        assert_eq!(result.entry(&PathId::from("science")).unwrap().score, 10);
        assert!(result.entry(&PathId::from("arts")).is_none());
        assert_eq!(result.percentage_sum(), 100);
    }

    #[test]
    fn empty_result_has_no_best() {
        let result = RankedResult {
            entries: Vec::new(),
            total_score: 0,
            answered_questions: 0,
            rounding: Rounding::LargestRemainder,
        };
        assert!(result.best().is_none());
        assert_eq!(result.percentage_sum(), 0);
    }
}
