#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Sky Raid adapters.

mod widgets;

pub use widgets::{layout_widgets, resolve_pointer_action, Widget};

use anyhow::Result as AnyResult;
use glam::Vec2;
use sky_raid_core::{EntityKind, Scale, SessionAction, Steering};
use std::time::Duration;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Same color with a different opacity.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Reference palette of the game.
pub mod palette {
    use super::Color;

    /// Clear color behind everything.
    pub const BACKGROUND: Color = Color::from_rgb_u8(30, 30, 35);
    /// Lines of the procedural scrolling grid.
    pub const GRID: Color = Color::from_rgb_u8(50, 50, 60);
    /// Procedural player ship.
    pub const PLAYER: Color = Color::from_rgb_u8(50, 150, 250);
    /// Procedural enemy ship.
    pub const ENEMY: Color = Color::from_rgb_u8(230, 80, 80);
    /// Procedural player projectile.
    pub const PLAYER_PROJECTILE: Color = Color::from_rgb_u8(255, 200, 50);
    /// Procedural enemy projectile.
    pub const ENEMY_PROJECTILE: Color = Color::from_rgb_u8(255, 100, 100);
    /// HUD and overlay text.
    pub const TEXT: Color = Color::from_rgb_u8(240, 240, 240);
    /// Idle button fill.
    pub const BUTTON: Color = Color::from_rgb_u8(70, 70, 80);
    /// Hovered button fill.
    pub const BUTTON_HOVER: Color = Color::from_rgb_u8(90, 90, 100);
    /// Game-over headline.
    pub const GAME_OVER: Color = Color::from_rgb_u8(255, 50, 50);
}

/// Pointer state expressed in playfield units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// Pointer location relative to the playfield's upper-left corner.
    pub position: Vec2,
    /// Whether the primary button was pressed on this frame.
    pub clicked: bool,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Directional input held during the frame.
    pub steering: Steering,
    /// Whether the fire control is held.
    pub fire: bool,
    /// Whether the pause toggle was pressed on this frame.
    pub pause_toggle: bool,
    /// Discrete session action resolved from shortcuts or widgets.
    pub action: Option<SessionAction>,
    /// Pointer state, when the cursor is available.
    pub pointer: Option<PointerInput>,
}

/// Drawable entity positioned in playfield units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEntity {
    /// Variant used to choose a sprite or procedural shape.
    pub kind: EntityKind,
    /// Upper-left corner of the drawable bounds.
    pub position: Vec2,
    /// Width and height of the drawable bounds.
    pub size: Vec2,
}

impl SceneEntity {
    /// Creates a new scene entity descriptor.
    #[must_use]
    pub const fn new(kind: EntityKind, position: Vec2, size: Vec2) -> Self {
        Self {
            kind,
            position,
            size,
        }
    }
}

/// Screen shown on top of (or instead of) the playfield.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScreenPresentation {
    /// Title screen offering the difficulty tiers.
    #[default]
    Menu,
    /// Running round with the HUD.
    Playing,
    /// Frozen round beneath the pause overlay.
    Paused,
    /// Game-over overlay.
    Ended {
        /// Score of the lost round.
        final_score: u64,
    },
}

/// Describes the playfield rendered by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayfieldPresentation {
    /// Horizontal extent in playfield units.
    pub width: f32,
    /// Vertical extent in playfield units.
    pub height: f32,
    /// Factor converting reference layout units into playfield units.
    pub scale: f32,
}

impl PlayfieldPresentation {
    /// Creates a new playfield descriptor.
    ///
    /// Returns an error when either extent is not positive.
    pub fn new(width: f32, height: f32, scale: Scale) -> Result<Self, RenderingError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidPlayfield { width, height });
        }

        Ok(Self {
            width,
            height,
            scale: scale.get() as f32,
        })
    }
}

/// Vertical offsets of the scrolling backdrop.
///
/// Image backdrops scroll two units per frame and wrap at the playfield
/// height; the procedural grid scrolls one unit per frame and wraps at its
/// line spacing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackgroundScroll {
    /// Offset applied to the backdrop image.
    pub image_offset: f32,
    /// Offset applied to the horizontal grid lines.
    pub grid_offset: f32,
}

impl BackgroundScroll {
    /// Reference spacing between procedural grid lines.
    pub const GRID_SPACING: f32 = 40.0;

    const IMAGE_STEP: f32 = 2.0;
    const GRID_STEP: f32 = 1.0;

    /// Advances both offsets by one frame.
    pub fn advance(&mut self, playfield: &PlayfieldPresentation) {
        let spacing = Self::GRID_SPACING * playfield.scale;
        self.image_offset =
            (self.image_offset + Self::IMAGE_STEP * playfield.scale) % playfield.height;
        self.grid_offset = (self.grid_offset + Self::GRID_STEP * playfield.scale) % spacing;
    }
}

/// Identifier of every sprite the adapters may draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Player ship.
    Player,
    /// Enemy ship.
    Enemy,
    /// Player projectile.
    PlayerProjectile,
    /// Enemy projectile.
    EnemyProjectile,
    /// Scrolling backdrop.
    Background,
}

impl SpriteKey {
    /// Every sprite key in manifest order.
    pub const ALL: [SpriteKey; 5] = [
        Self::Player,
        Self::Enemy,
        Self::PlayerProjectile,
        Self::EnemyProjectile,
        Self::Background,
    ];

    /// Sprite used to draw entities of the provided kind.
    #[must_use]
    pub const fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Player => Self::Player,
            EntityKind::PlayerProjectile => Self::PlayerProjectile,
            EntityKind::Enemy => Self::Enemy,
            EntityKind::EnemyProjectile => Self::EnemyProjectile,
        }
    }
}

/// Scene description combining the playfield, its inhabitants and the UI.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Playfield that hosts the round.
    pub playfield: PlayfieldPresentation,
    /// Screen currently shown.
    pub screen: ScreenPresentation,
    /// Entities in draw order.
    pub entities: Vec<SceneEntity>,
    /// Score displayed by the HUD.
    pub score: u64,
    /// Label of the active difficulty tier.
    pub difficulty_label: &'static str,
    /// Offsets of the scrolling backdrop.
    pub background: BackgroundScroll,
    /// Clickable widgets of the current screen.
    pub widgets: Vec<Widget>,
}

impl Scene {
    /// Creates an empty menu scene for the provided playfield.
    #[must_use]
    pub fn new(playfield: PlayfieldPresentation) -> Self {
        let screen = ScreenPresentation::Menu;
        Self {
            playfield,
            screen,
            entities: Vec::new(),
            score: 0,
            difficulty_label: "",
            background: BackgroundScroll::default(),
            widgets: layout_widgets(screen, &playfield),
        }
    }

    /// Switches the visible screen and rebuilds its widgets.
    pub fn set_screen(&mut self, screen: ScreenPresentation) {
        if self.screen != screen || self.widgets.is_empty() {
            self.widgets = layout_widgets(screen, &self.playfield);
        }
        self.screen = screen;
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Instruction returned by the frame callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameDirective {
    /// Keep running the loop.
    #[default]
    Continue,
    /// Close the window and return from [`RenderingBackend::run`].
    Exit,
}

/// Rendering backend capable of presenting Sky Raid scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, mutates the scene before it is
    /// rendered and decides whether the loop continues.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameDirective + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// Playfield extents must be positive to fit the window.
    #[error("playfield extents must be positive (received {width}x{height})")]
    InvalidPlayfield {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}
