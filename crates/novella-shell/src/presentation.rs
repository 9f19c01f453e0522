//! Maps engine state to what is on screen.
//!
//! Rendering is a pure function of the engine snapshot and the current scene
//! record; the frame carries no logic of its own.

use novella_dialogue::domain::engine::{DialoguePhase, EngineState};
use novella_script::{ChoiceTarget, ImageRef, SceneRecord};
use serde::Serialize;

/// Top edge of the first hotspot, in percent of the background height.
const HOTSPOT_TOP: f32 = 41.5;
/// Vertical distance between consecutive hotspots.
const HOTSPOT_STRIDE: f32 = 13.7;
const HOTSPOT_LEFT: f32 = 38.3;
const HOTSPOT_WIDTH: f32 = 48.5;
const HOTSPOT_HEIGHT: f32 = 11.5;

/// A rectangle in percent of the background image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    /// Distance from the top edge.
    pub top: f32,
    /// Distance from the left edge.
    pub left: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Region {
    /// Whether the point (`x`, `y`), in percent, lies inside the region.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left
            && x < self.left + self.width
            && y >= self.top
            && y < self.top + self.height
    }
}

/// A clickable choice overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    /// Choice label.
    pub label: String,
    /// What selecting the hotspot dispatches.
    pub target: ChoiceTarget,
    /// Where the hotspot sits over the background.
    pub region: Region,
}

/// Everything the play screen shows for one engine state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Background for the current scene.
    pub background: ImageRef,
    /// Text box contents; absent for scenes without text.
    pub text: Option<String>,
    /// Choice overlays; empty unless the engine is at a choice.
    pub hotspots: Vec<Hotspot>,
    /// Engine phase, for the host's benefit.
    pub phase: DialoguePhase,
}

impl Frame {
    /// The hotspot under the point (`x`, `y`), if any.
    #[must_use]
    pub fn hotspot_at(&self, x: f32, y: f32) -> Option<&Hotspot> {
        self.hotspots.iter().find(|spot| spot.region.contains(x, y))
    }
}

/// Renders the play screen.
#[must_use]
pub fn render(scene: &SceneRecord, state: &EngineState) -> Frame {
    let text = scene.has_text().then(|| state.revealed_text.clone());
    let hotspots = if state.phase == DialoguePhase::AtChoice {
        scene
            .choices
            .iter()
            .zip(0_u16..)
            .map(|(choice, position)| Hotspot {
                label: choice.label.clone(),
                target: choice.target,
                region: hotspot_region(position),
            })
            .collect()
    } else {
        Vec::new()
    };

    Frame {
        background: scene.background.clone(),
        text,
        hotspots,
        phase: state.phase,
    }
}

fn hotspot_region(position: u16) -> Region {
    Region {
        top: HOTSPOT_TOP + HOTSPOT_STRIDE * f32::from(position),
        left: HOTSPOT_LEFT,
        width: HOTSPOT_WIDTH,
        height: HOTSPOT_HEIGHT,
    }
}
