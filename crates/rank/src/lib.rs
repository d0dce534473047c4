//! Results ranker: turns a completed quiz into an ordered percentage
//! breakdown of career paths.
//!
//! # Invariants
//! - Ranking only runs on a complete quiz; otherwise nothing is returned.
//! - Entries are strictly ordered: score descending, ties in canonical path order.
//! - Paths never awarded points do not appear.
//! - A zero total yields 0% for every entry.

mod ranker;
mod result;

pub use ranker::{RankConfig, RankError, Ranker, Rounding, rank_scores};
pub use result::{RankedEntry, RankedResult, ordinal_label};

pub fn crate_info() -> &'static str {
    "compass-rank v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("rank"));
    }
}
