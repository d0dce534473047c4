use std::fmt::Write;

use crate::interaction::Collectible;
use crate::view::SceneView;

/// Renderer-agnostic interface. All scene renderers implement this trait.
///
/// A renderer reads a [`SceneView`] and produces output. It never sees the
/// quiz engine, so it cannot change scores.
pub trait SceneRenderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the scene.
    fn render(&self, view: &SceneView) -> Self::Output;
}

/// Plain-text renderer for terminals, logs and tests.
#[derive(Debug, Default)]
pub struct TextSceneRenderer;

impl TextSceneRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl SceneRenderer for TextSceneRenderer {
    type Output = String;

    fn render(&self, view: &SceneView) -> String {
        let mut out = String::new();
        let landmark = view.theme.landmark();
        let _ = writeln!(
            out,
            "=== Question {}/{} ({}% complete) ===",
            view.question_index, view.total_questions, view.progress_percent
        );
        for island in &view.islands {
            let marker = if island.dominant {
                '*'
            } else if island.active {
                '+'
            } else {
                ' '
            };
            let _ = writeln!(
                out,
                " {marker} {} {:<26} {landmark} at ({:.1}, {:.1}, {:.1})  score {}",
                island.icon,
                island.title,
                island.position.x,
                island.position.y,
                island.position.z,
                island.score
            );
        }
        let a = view.avatar_target;
        let _ = writeln!(
            out,
            " {} avatar heading to ({:.2}, {:.2}, {:.2})",
            view.theme.avatar_glyph(),
            a.x,
            a.y,
            a.z
        );
        for item in &view.collectibles {
            let (glyph, name) = match item.kind {
                Collectible::Coin => ('$', "coin"),
                Collectible::PowerUp => ('!', "power-up"),
            };
            let p = item.position;
            let _ = writeln!(out, " {glyph} {name} at ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z);
        }
        if view.complete {
            out.push_str(" journey complete\n");
        }
        out
    }
}
