//! Screen-space hotspot marker bound to a fixed world position
//!
//! The marker is a two-state machine (`Visible` / `Faded`). Fades are only
//! emitted on a state change, so a marker that stays occluded for many
//! frames fades out exactly once.

use glam::{Vec2, Vec3};

use crate::fade::Fade;
use crate::material::MaterialKind;

/// Visual state of the marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerState {
    #[default]
    Visible,
    Faded,
}

/// What a single frame update asks the overlay to do
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameUpdate {
    /// Fade to start this frame, if the state changed
    pub fade: Option<Fade>,
    /// New screen position, if the marker should move this frame
    pub position: Option<Vec2>,
    /// Whether the occlusion test was evaluated
    pub occlusion_tested: bool,
}

/// Hotspot marker state
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotMarker {
    anchor: Vec3,
    state: MarkerState,
    screen_position: Option<Vec2>,
}

impl HotspotMarker {
    pub fn new(anchor: Vec3) -> Self {
        Self {
            anchor,
            state: MarkerState::Visible,
            screen_position: None,
        }
    }

    /// World-space anchor, fixed at creation
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn state(&self) -> MarkerState {
        self.state
    }

    /// Last screen position the marker was placed at
    pub fn screen_position(&self) -> Option<Vec2> {
        self.screen_position
    }

    /// Run one frame of the marker.
    ///
    /// `projected` is the anchor projected to screen space this frame, or
    /// `None` if the camera could not project it. `occluded` is only called
    /// while the metallic material is active.
    pub fn update(
        &mut self,
        material: MaterialKind,
        projected: Option<Vec2>,
        occluded: impl FnOnce() -> bool,
    ) -> FrameUpdate {
        let mut update = FrameUpdate::default();

        let visible = match material {
            MaterialKind::Metallic => {
                update.occlusion_tested = true;
                !occluded()
            }
            // Geometry is see-through in wireframe, so the marker always shows
            MaterialKind::Wireframe => true,
        };

        update.fade = self.transition(visible);

        if visible {
            if let Some(position) = projected {
                self.screen_position = Some(position);
                update.position = Some(position);
            }
        }

        update
    }

    fn transition(&mut self, visible: bool) -> Option<Fade> {
        match (self.state, visible) {
            (MarkerState::Visible, false) => {
                self.state = MarkerState::Faded;
                Some(Fade::Out)
            }
            (MarkerState::Faded, true) => {
                self.state = MarkerState::Visible;
                Some(Fade::In)
            }
            _ => None,
        }
    }
}
