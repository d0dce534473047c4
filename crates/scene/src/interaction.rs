use compass_common::{PathCatalog, PathId};
use serde::{Deserialize, Serialize};

/// Props the player can pick up in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collectible {
    Coin,
    PowerUp,
}

/// Something the player did in the scene.
///
/// Interactions feed toasts and counters only; the quiz engine never sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// A path's island (or room, tile, town) was clicked.
    PathClicked(PathId),
    Collected(Collectible),
}

/// Tally of scene interactions for one session.
#[derive(Debug, Clone, Default)]
pub struct InteractionLog {
    coins: u32,
    power_ups: u32,
    clicked: Vec<PathId>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `interaction` and return the toast text for it.
    pub fn record(&mut self, interaction: Interaction, catalog: &PathCatalog) -> String {
        tracing::debug!(?interaction, "scene interaction");
        match interaction {
            Interaction::PathClicked(path) => {
                let toast = format!("Exploring {}", catalog.title_of(&path));
                self.clicked.push(path);
                toast
            }
            Interaction::Collected(Collectible::Coin) => {
                self.coins += 1;
                format!("Coin collected! ({} total)", self.coins)
            }
            Interaction::Collected(Collectible::PowerUp) => {
                self.power_ups += 1;
                "Speed boost activated!".to_string()
            }
        }
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn power_ups(&self) -> u32 {
        self.power_ups
    }

    /// Paths clicked so far, oldest first.
    pub fn clicked(&self) -> &[PathId] {
        &self.clicked
    }
}
