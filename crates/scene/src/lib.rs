//! Scene adapter: the read-only view the 3D presentation layer draws.
//!
//! # Invariants
//! - Scene state derives from a quiz snapshot and the path catalog only.
//! - Renderers and interactions cannot mutate quiz state.
//!
//! One view parameterized by [`SceneTheme`] stands in for every visual
//! variant (islands, maze, pixel art, roads). A text renderer implements the
//! trait for the CLI and tests; a GPU backend would implement the same trait.

mod interaction;
mod renderer;
mod view;

pub use interaction::{Collectible, Interaction, InteractionLog};
pub use renderer::{SceneRenderer, TextSceneRenderer};
pub use view::{CameraView, CollectibleView, IslandView, SceneTheme, SceneView};

pub fn crate_info() -> &'static str {
    "compass-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
