//! Clickable widgets and their placement on each screen.

use sky_raid_core::{point_in_rect, Difficulty, Rect, SessionAction};

use crate::{PlayfieldPresentation, PointerInput, ScreenPresentation};

const BUTTON_WIDTH: f64 = 160.0;
const BUTTON_HEIGHT: f64 = 50.0;
const BUTTON_SPACING: f64 = 60.0;
const MENU_FIRST_ROW: f64 = 400.0;

/// Rectangular button bound to a session action.
#[derive(Clone, Debug, PartialEq)]
pub struct Widget {
    /// Action requested when the widget is clicked.
    pub action: SessionAction,
    /// Caption drawn inside the widget.
    pub label: &'static str,
    /// Bounds in playfield units.
    pub bounds: Rect,
}

impl Widget {
    /// Reports whether the point lies inside the widget, edges included.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        point_in_rect(
            f64::from(x),
            f64::from(y),
            self.bounds.x,
            self.bounds.y,
            self.bounds.width,
            self.bounds.height,
        )
    }
}

/// Resolves the action of the widget under a clicking pointer.
///
/// Returns `None` when the pointer did not click or missed every widget.
#[must_use]
pub fn resolve_pointer_action(widgets: &[Widget], pointer: PointerInput) -> Option<SessionAction> {
    if !pointer.clicked {
        return None;
    }
    widgets
        .iter()
        .find(|widget| widget.contains(pointer.position.x, pointer.position.y))
        .map(|widget| widget.action)
}

/// Lays out the widgets of a screen on the provided playfield.
#[must_use]
pub fn layout_widgets(screen: ScreenPresentation, playfield: &PlayfieldPresentation) -> Vec<Widget> {
    let scale = f64::from(playfield.scale);
    let center_x = f64::from(playfield.width) / 2.0;
    let center_y = f64::from(playfield.height) / 2.0;
    let column = |top: f64, action: SessionAction, label: &'static str| Widget {
        action,
        label,
        bounds: Rect::new(
            center_x - BUTTON_WIDTH / 2.0 * scale,
            top,
            BUTTON_WIDTH * scale,
            BUTTON_HEIGHT * scale,
        ),
    };

    match screen {
        ScreenPresentation::Menu => Difficulty::ALL
            .into_iter()
            .enumerate()
            .map(|(row, difficulty)| {
                column(
                    (MENU_FIRST_ROW + BUTTON_SPACING * row as f64) * scale,
                    SessionAction::SelectDifficulty(difficulty),
                    difficulty.label(),
                )
            })
            .collect(),
        ScreenPresentation::Playing => vec![Widget {
            action: SessionAction::Pause,
            label: "Pause",
            bounds: Rect::new(
                f64::from(playfield.width) - 90.0 * scale,
                10.0 * scale,
                80.0 * scale,
                32.0 * scale,
            ),
        }],
        ScreenPresentation::Paused => vec![
            column(center_y + 80.0 * scale, SessionAction::Resume, "Resume"),
            column(
                center_y + (80.0 + BUTTON_SPACING) * scale,
                SessionAction::ReturnToMenu,
                "Menu",
            ),
        ],
        ScreenPresentation::Ended { .. } => vec![
            column(center_y + 120.0 * scale, SessionAction::Retry, "Retry"),
            column(
                center_y + (120.0 + BUTTON_SPACING) * scale,
                SessionAction::ReturnToMenu,
                "Menu",
            ),
            column(
                center_y + (120.0 + 2.0 * BUTTON_SPACING) * scale,
                SessionAction::GiveUp,
                "Quit",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use sky_raid_core::Scale;

    fn playfield(scale: f64) -> PlayfieldPresentation {
        let scale = Scale::new(scale).expect("valid scale");
        PlayfieldPresentation::new(
            (480.0 * scale.get()) as f32,
            (640.0 * scale.get()) as f32,
            scale,
        )
        .expect("valid playfield")
    }

    fn click(x: f32, y: f32) -> PointerInput {
        PointerInput {
            position: Vec2::new(x, y),
            clicked: true,
        }
    }

    #[test]
    fn menu_lists_difficulty_tiers_from_reference_anchor() {
        let widgets = layout_widgets(ScreenPresentation::Menu, &playfield(1.0));

        assert_eq!(widgets.len(), 3);
        assert_eq!(widgets[0].bounds, Rect::new(160.0, 400.0, 160.0, 50.0));
        assert_eq!(
            widgets[2].action,
            SessionAction::SelectDifficulty(Difficulty::Hell)
        );
    }

    #[test]
    fn pointer_on_widget_edge_resolves_action() {
        let widgets = layout_widgets(ScreenPresentation::Menu, &playfield(1.0));

        assert_eq!(
            resolve_pointer_action(&widgets, click(160.0, 400.0)),
            Some(SessionAction::SelectDifficulty(Difficulty::Easy))
        );
        assert_eq!(
            resolve_pointer_action(&widgets, click(320.0, 450.0)),
            Some(SessionAction::SelectDifficulty(Difficulty::Easy))
        );
        assert_eq!(resolve_pointer_action(&widgets, click(159.5, 400.0)), None);
    }

    #[test]
    fn hover_without_click_resolves_nothing() {
        let widgets = layout_widgets(ScreenPresentation::Menu, &playfield(1.0));
        let hover = PointerInput {
            position: Vec2::new(200.0, 470.0),
            clicked: false,
        };

        assert_eq!(resolve_pointer_action(&widgets, hover), None);
    }

    #[test]
    fn layout_follows_playfield_scale() {
        let widgets = layout_widgets(ScreenPresentation::Menu, &playfield(2.0));

        assert_eq!(widgets[1].bounds, Rect::new(320.0, 920.0, 320.0, 100.0));
    }

    #[test]
    fn ended_screen_offers_retry_menu_and_quit() {
        let widgets = layout_widgets(
            ScreenPresentation::Ended { final_score: 0 },
            &playfield(1.0),
        );
        let actions: Vec<SessionAction> = widgets.iter().map(|widget| widget.action).collect();

        assert_eq!(
            actions,
            vec![
                SessionAction::Retry,
                SessionAction::ReturnToMenu,
                SessionAction::GiveUp
            ]
        );
        assert!(widgets
            .iter()
            .all(|widget| widget.bounds.bottom() <= 640.0));
    }
}
