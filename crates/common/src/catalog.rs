use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::types::PathId;

/// Display metadata for one career path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathProfile {
    pub id: PathId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub careers: Vec<String>,
    /// Where the path's island sits in the scene.
    #[serde(default)]
    pub island: Vec3,
    /// Where the avatar heads once this path dominates (scaled by progress).
    #[serde(default)]
    pub anchor: Vec3,
}

/// Ordered set of known career paths.
///
/// The order of `profiles` is the canonical path order used to break score
/// ties. Ids that are not in the catalog sort after all catalog entries, then
/// by their string value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathCatalog {
    profiles: Vec<PathProfile>,
}

impl PathCatalog {
    pub fn new(profiles: Vec<PathProfile>) -> Self {
        Self { profiles }
    }

    /// The five paths of the built-in quiz, in canonical order.
    pub fn builtin() -> Self {
        Self::new(vec![
            profile(
                "tech",
                "Technology & Engineering",
                "Build the future with code, AI, and innovative solutions.",
                "💻",
                &[
                    "Software Developer",
                    "AI Engineer",
                    "Data Scientist",
                    "Cybersecurity Analyst",
                ],
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
            ),
            profile(
                "healthcare",
                "Healthcare & Medicine",
                "Heal, care, and improve lives through medical science.",
                "🏥",
                &["Doctor", "Nurse", "Medical Researcher", "Therapist"],
                Vec3::new(2.0, 0.0, 3.0),
                Vec3::new(0.5, 0.0, 0.8),
            ),
            profile(
                "arts",
                "Arts & Design",
                "Create, inspire, and express through visual and performing arts.",
                "🎨",
                &[
                    "Graphic Designer",
                    "Artist",
                    "Animator",
                    "Creative Director",
                ],
                Vec3::new(-2.0, 0.0, 3.0),
                Vec3::new(-0.5, 0.0, 0.8),
            ),
            profile(
                "business",
                "Business & Finance",
                "Lead, strategize, and drive economic growth.",
                "💼",
                &[
                    "Business Analyst",
                    "Marketing Manager",
                    "Entrepreneur",
                    "Financial Advisor",
                ],
                Vec3::new(-4.0, 0.0, 0.0),
                Vec3::new(-1.0, 0.0, 0.0),
            ),
            profile(
                "science",
                "Science & Research",
                "Discover, experiment, and advance human knowledge.",
                "🔬",
                &[
                    "Research Scientist",
                    "Environmental Scientist",
                    "Physicist",
                    "Biologist",
                ],
                Vec3::new(0.0, 0.0, 4.0),
                Vec3::new(0.0, 0.0, 1.0),
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathProfile> {
        self.profiles.iter()
    }

    pub fn get(&self, id: &PathId) -> Option<&PathProfile> {
        self.profiles.iter().find(|p| &p.id == id)
    }

    /// Position of `id` in canonical order, `None` for ids outside the catalog.
    pub fn position(&self, id: &PathId) -> Option<usize> {
        self.profiles.iter().position(|p| &p.id == id)
    }

    /// Canonical ordering of two path ids.
    pub fn canonical_cmp(&self, a: &PathId, b: &PathId) -> Ordering {
        let rank = |id: &PathId| self.position(id).unwrap_or(usize::MAX);
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    }

    /// Title for display, falling back to the raw id.
    pub fn title_of<'a>(&'a self, id: &'a PathId) -> &'a str {
        self.get(id).map_or(id.as_str(), |p| p.title.as_str())
    }
}

impl Default for PathCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn profile(
    id: &str,
    title: &str,
    description: &str,
    icon: &str,
    careers: &[&str],
    island: Vec3,
    anchor: Vec3,
) -> PathProfile {
    PathProfile {
        id: PathId::from(id),
        title: title.into(),
        description: description.into(),
        icon: icon.into(),
        careers: careers.iter().map(|c| (*c).to_owned()).collect(),
        island,
        anchor,
    }
}
