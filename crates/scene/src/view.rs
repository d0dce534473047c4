use compass_common::{PathCatalog, PathId};
use compass_engine::{QuizPhase, QuizSnapshot};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::interaction::Collectible;

/// Visual variant of the scene. Layout and scoring are identical across
/// themes; only naming and glyphs change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneTheme {
    #[default]
    Islands,
    Maze,
    PixelArt,
    Roads,
}

impl SceneTheme {
    /// What a path destination is called in this theme.
    pub fn landmark(self) -> &'static str {
        match self {
            Self::Islands => "island",
            Self::Maze => "chamber",
            Self::PixelArt => "tile",
            Self::Roads => "town",
        }
    }

    pub fn avatar_glyph(self) -> char {
        match self {
            Self::Islands => '@',
            Self::Maze => '&',
            Self::PixelArt => '#',
            Self::Roads => '>',
        }
    }
}

/// Camera placement for the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 8.0, 8.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IslandView {
    pub path: PathId,
    pub title: String,
    pub icon: String,
    pub position: Vec3,
    pub score: u64,
    pub active: bool,
    pub dominant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectibleView {
    pub kind: Collectible,
    pub position: Vec3,
}

/// Everything a renderer needs for one frame of the quiz scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneView {
    pub theme: SceneTheme,
    pub camera: CameraView,
    /// One per catalog path, in canonical order.
    pub islands: Vec<IslandView>,
    /// Where the avatar is heading: the dominant path's anchor scaled by progress.
    pub avatar_target: Vec3,
    pub collectibles: Vec<CollectibleView>,
    pub question_index: usize,
    pub total_questions: usize,
    pub progress_percent: u32,
    pub dominant: Option<PathId>,
    pub complete: bool,
}

impl SceneView {
    /// Derive the scene from a quiz snapshot.
    ///
    /// Scored paths outside the catalog get no island; they still count
    /// toward the dominant path.
    pub fn from_snapshot(snapshot: &QuizSnapshot, catalog: &PathCatalog, theme: SceneTheme) -> Self {
        let islands = catalog
            .iter()
            .map(|profile| IslandView {
                path: profile.id.clone(),
                title: profile.title.clone(),
                icon: profile.icon.clone(),
                position: profile.island,
                score: snapshot.scores.get(&profile.id),
                active: snapshot.is_active(&profile.id),
                dominant: snapshot.dominant.as_ref() == Some(&profile.id),
            })
            .collect();

        let progress = snapshot.progress();
        let avatar_target = snapshot
            .dominant
            .as_ref()
            .and_then(|d| catalog.get(d))
            .map_or(Vec3::ZERO, |p| p.anchor * progress);

        tracing::trace!(
            question = snapshot.question_index,
            ?avatar_target,
            ?theme,
            "scene derived"
        );

        Self {
            theme,
            camera: CameraView::default(),
            islands,
            avatar_target,
            collectibles: default_collectibles(),
            question_index: snapshot.question_index,
            total_questions: snapshot.total_questions,
            progress_percent: (progress * 100.0).round() as u32,
            dominant: snapshot.dominant.clone(),
            complete: snapshot.phase == QuizPhase::Complete,
        }
    }

    pub fn island(&self, path: &PathId) -> Option<&IslandView> {
        self.islands.iter().find(|i| &i.path == path)
    }
}

fn default_collectibles() -> Vec<CollectibleView> {
    vec![
        CollectibleView {
            kind: Collectible::Coin,
            position: Vec3::new(3.0, 1.0, 2.0),
        },
        CollectibleView {
            kind: Collectible::PowerUp,
            position: Vec3::new(-3.0, 1.5, -2.0),
        },
        CollectibleView {
            kind: Collectible::Coin,
            position: Vec3::new(1.0, 2.0, -3.0),
        },
    ]
}
