//! Translation of raw device observations into frame input.

use sky_raid_core::{Difficulty, SessionAction, Steering};
use sky_raid_rendering::{resolve_pointer_action, FrameInput, PointerInput, Scene, ScreenPresentation};

/// Raw keyboard and pointer state captured for a single frame.
///
/// Fields ending in `pressed` are edge triggered; the rest are levels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputObservations {
    /// WASD or arrow keys held.
    pub steering: Steering,
    /// `Space` held.
    pub fire_held: bool,
    /// `Space` pressed this frame.
    pub space_pressed: bool,
    /// `P` pressed this frame.
    pub pause_pressed: bool,
    /// `M` pressed this frame.
    pub menu_pressed: bool,
    /// `Escape` pressed this frame.
    pub escape_pressed: bool,
    /// Tier chosen with `1`, `2` or `3` this frame.
    pub difficulty_pressed: Option<Difficulty>,
    /// Pointer mapped into playfield units.
    pub pointer: Option<PointerInput>,
}

/// Resolves observations into the input contract for the visible screen.
///
/// Keyboard shortcuts take precedence over widget clicks.
#[must_use]
pub fn resolve_frame_input(observations: &InputObservations, scene: &Scene) -> FrameInput {
    let shortcut = match scene.screen {
        ScreenPresentation::Menu => observations
            .difficulty_pressed
            .map(SessionAction::SelectDifficulty),
        ScreenPresentation::Playing | ScreenPresentation::Paused => observations
            .menu_pressed
            .then_some(SessionAction::ReturnToMenu),
        ScreenPresentation::Ended { .. } => {
            if observations.space_pressed {
                Some(SessionAction::Retry)
            } else if observations.escape_pressed {
                Some(SessionAction::GiveUp)
            } else if observations.menu_pressed {
                Some(SessionAction::ReturnToMenu)
            } else {
                None
            }
        }
    };
    let action = shortcut.or_else(|| {
        observations
            .pointer
            .and_then(|pointer| resolve_pointer_action(&scene.widgets, pointer))
    });

    FrameInput {
        steering: observations.steering,
        fire: observations.fire_held,
        pause_toggle: observations.pause_pressed,
        action,
        pointer: observations.pointer,
    }
}
