use compass_common::{PathCatalog, PathId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accumulated points per career path.
///
/// Absent keys read as zero. Scores only ever grow. BTreeMap keeps
/// iteration deterministic; canonical (catalog) order is applied by the
/// derived views, not by the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreState {
    scores: BTreeMap<PathId, u64>,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score of `path`, zero when it was never awarded.
    pub fn get(&self, path: &PathId) -> u64 {
        self.scores.get(path).copied().unwrap_or(0)
    }

    /// Add `points` to `path`, creating the entry if needed.
    pub fn award(&mut self, path: &PathId, points: u32) {
        *self.scores.entry(path.clone()).or_insert(0) += u64::from(points);
    }

    /// Sum over every entry. Options tagging several paths count once per path.
    pub fn total(&self) -> u64 {
        self.scores.values().sum()
    }

    /// Number of paths with an entry (including zero-valued entries).
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathId, u64)> {
        self.scores.iter().map(|(p, s)| (p, *s))
    }

    /// Entries ordered by score descending, ties in canonical path order.
    pub fn ordered(&self, catalog: &PathCatalog) -> Vec<(PathId, u64)> {
        let mut entries: Vec<(PathId, u64)> =
            self.scores.iter().map(|(p, s)| (p.clone(), *s)).collect();
        entries.sort_by(|(pa, sa), (pb, sb)| {
            sb.cmp(sa).then_with(|| catalog.canonical_cmp(pa, pb))
        });
        entries
    }

    /// Highest-scoring path; ties go to the path earliest in canonical order.
    ///
    /// Zero-valued entries never dominate, so the dominant path is always
    /// one of [`active`](Self::active).
    pub fn dominant(&self, catalog: &PathCatalog) -> Option<PathId> {
        self.scores
            .iter()
            .filter(|(_, s)| **s > 0)
            .min_by(|(pa, sa), (pb, sb)| {
                sb.cmp(sa).then_with(|| catalog.canonical_cmp(pa, pb))
            })
            .map(|(p, _)| p.clone())
    }

    /// Paths with a non-zero score, in canonical order.
    pub fn active(&self, catalog: &PathCatalog) -> Vec<PathId> {
        let mut active: Vec<PathId> = self
            .scores
            .iter()
            .filter(|(_, s)| **s > 0)
            .map(|(p, _)| p.clone())
            .collect();
        active.sort_by(|a, b| catalog.canonical_cmp(a, b));
        active
    }
}

impl<'a> FromIterator<(&'a str, u64)> for ScoreState {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().map(|(p, s)| (PathId::from(p), s)).collect(),
        }
    }
}
