#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad implementation of the Sky Raid rendering contract.
//!
//! The backend opens a window sized to the playfield, samples keyboard and
//! mouse state each frame, hands the resulting [`sky_raid_rendering::FrameInput`]
//! to the frame callback and draws the scene it populated. Sprites come from a
//! [`SpriteAtlas`] loaded once at startup; any sprite the atlas lacks is drawn
//! as a procedural shape.
//!
//! Macroquad is built without its `audio` feature so the crate does not pull
//! in the ALSA system libraries.

mod fps;
mod input;
mod sprites;
mod ui;

pub use input::{resolve_frame_input, InputObservations};
pub use sprites::SpriteAtlas;

use anyhow::Result;
use glam::Vec2;
use log::info;
use macroquad::{
    color::WHITE,
    input::{is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    math::Vec2 as MacroquadVec2,
    shapes::{draw_circle, draw_line, draw_rectangle, draw_triangle},
};
use sky_raid_core::{base, Difficulty, EntityKind, Steering};
use sky_raid_rendering::{
    palette, BackgroundScroll, FrameDirective, FrameInput, PointerInput, Presentation,
    RenderingBackend, Scene, SceneEntity, ScreenPresentation, SpriteKey,
};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use crate::fps::{FrameReport, FrameSample, FrameStats};

/// Window, input and drawing backend built on macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    frame_cap: Option<Duration>,
    sprite_manifest: PathBuf,
    sprites_enabled: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            frame_cap: Some(Duration::from_millis(16)),
            sprite_manifest: SpriteAtlas::default_manifest_path(),
            sprites_enabled: true,
        }
    }
}

impl MacroquadBackend {
    /// Creates a backend with a 16 ms frame cap and sprite loading enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the swap interval requested from the platform; `None` keeps its default.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Toggles waiting for the display refresh before presenting.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        self.with_swap_interval(Some(i32::from(enabled)))
    }

    /// Logs frame rate and stage timings once per second when enabled.
    #[must_use]
    pub fn with_show_fps(mut self, enabled: bool) -> Self {
        self.show_fps = enabled;
        self
    }

    /// Configures the minimum wall-clock duration of a frame.
    ///
    /// `None` lets the loop run as fast as presentation allows.
    #[must_use]
    pub fn with_frame_cap(mut self, frame_cap: Option<Duration>) -> Self {
        self.frame_cap = frame_cap.filter(|cap| !cap.is_zero());
        self
    }

    /// Configures the sprite manifest consulted at startup.
    #[must_use]
    pub fn with_sprite_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.sprite_manifest = path.into();
        self
    }

    /// Disabling sprite loading draws every entity procedurally.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.sprites_enabled = enabled;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameDirective + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            frame_cap,
            sprite_manifest,
            sprites_enabled,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.playfield.width.round() as i32,
            window_height: scene.playfield.height.round() as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = if sprites_enabled {
                SpriteAtlas::load(&sprite_manifest)
            } else {
                info!("sprite loading disabled; drawing procedural shapes");
                SpriteAtlas::default()
            };

            let background = to_macroquad_color(clear_color);
            let mut frame_stats = FrameStats::default();

            loop {
                let frame_start = Instant::now();
                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let observations = observe_devices(&metrics_before);
                let frame_input = resolve_frame_input(&observations, &scene);
                let pointer = frame_input.pointer;

                let simulation_start = Instant::now();
                let directive = update_scene(frame_dt, frame_input, &mut scene);
                let simulation = simulation_start.elapsed();
                if directive == FrameDirective::Exit {
                    info!("frame callback requested exit");
                    break;
                }

                let render_start = Instant::now();
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_scene(&scene, &metrics, &sprite_atlas, pointer);
                let render = render_start.elapsed();

                let report = frame_stats.sample(FrameSample {
                    frame: frame_dt,
                    simulation,
                    render,
                });
                if let Some(FrameReport {
                    fps,
                    trailing_fps,
                    simulation,
                    render,
                }) = report.filter(|_| show_fps)
                {
                    info!(
                        "{fps:.1} fps ({trailing_fps:.1} over 10s), simulation {:.2}ms, drawing {:.2}ms",
                        simulation.as_secs_f64() * 1_000.0,
                        render.as_secs_f64() * 1_000.0,
                    );
                }

                if let Some(cap) = frame_cap {
                    let spent = frame_start.elapsed();
                    if spent < cap {
                        std::thread::sleep(cap - spent);
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Fits the playfield into the window while preserving its aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SceneMetrics {
    scale: f32,
    offset: Vec2,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let playfield = scene.playfield;
        let scale = if playfield.width <= 0.0 || playfield.height <= 0.0 {
            1.0
        } else {
            (screen_width / playfield.width).min(screen_height / playfield.height)
        };
        let offset = Vec2::new(
            ((screen_width - playfield.width * scale) * 0.5).max(0.0),
            ((screen_height - playfield.height * scale) * 0.5).max(0.0),
        );
        Self { scale, offset }
    }

    /// Converts a playfield position into screen pixels.
    pub(crate) fn to_screen(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.scale
    }

    /// Converts a playfield length into screen pixels.
    pub(crate) fn length(&self, length: f32) -> f32 {
        length * self.scale
    }

    fn to_playfield(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        Some((screen - self.offset) / self.scale)
    }
}

fn observe_devices(metrics: &SceneMetrics) -> InputObservations {
    let held = |keys: [KeyCode; 2]| keys.into_iter().any(is_key_down);
    let steering = Steering {
        left: held([KeyCode::A, KeyCode::Left]),
        right: held([KeyCode::D, KeyCode::Right]),
        up: held([KeyCode::W, KeyCode::Up]),
        down: held([KeyCode::S, KeyCode::Down]),
    };
    let difficulty_pressed = [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3]
        .into_iter()
        .position(is_key_pressed)
        .map(Difficulty::from_menu_index);
    let (cursor_x, cursor_y) = mouse_position();
    let pointer = metrics
        .to_playfield(Vec2::new(cursor_x, cursor_y))
        .map(|position| PointerInput {
            position,
            clicked: is_mouse_button_pressed(MouseButton::Left),
        });

    InputObservations {
        steering,
        fire_held: is_key_down(KeyCode::Space),
        space_pressed: is_key_pressed(KeyCode::Space),
        pause_pressed: is_key_pressed(KeyCode::P),
        menu_pressed: is_key_pressed(KeyCode::M),
        escape_pressed: is_key_pressed(KeyCode::Escape),
        difficulty_pressed,
        pointer,
    }
}

fn draw_scene(
    scene: &Scene,
    metrics: &SceneMetrics,
    sprite_atlas: &SpriteAtlas,
    pointer: Option<PointerInput>,
) {
    draw_background(scene, metrics, sprite_atlas);
    for entity in &scene.entities {
        draw_entity(entity, metrics, sprite_atlas);
    }

    let label_size = 24.0 * scene.playfield.scale;
    match scene.screen {
        ScreenPresentation::Menu => ui::draw_menu(scene, metrics),
        ScreenPresentation::Playing => ui::draw_hud(scene, metrics),
        ScreenPresentation::Paused => {
            ui::draw_hud(scene, metrics);
            ui::draw_pause_overlay(scene, metrics);
        }
        ScreenPresentation::Ended { final_score } => {
            ui::draw_game_over(scene, metrics, final_score);
        }
    }
    ui::draw_widgets(&scene.widgets, pointer, metrics, label_size);
}

fn draw_background(scene: &Scene, metrics: &SceneMetrics, sprite_atlas: &SpriteAtlas) {
    let playfield = scene.playfield;
    let size = Vec2::new(playfield.width, playfield.height);
    let offset = scene.background.image_offset;
    if sprite_atlas.contains(SpriteKey::Background) {
        for top in [offset, offset - playfield.height] {
            let _ = sprite_atlas.draw(
                SpriteKey::Background,
                metrics.to_screen(Vec2::new(0.0, top)),
                size * metrics.scale,
            );
        }
        return;
    }

    let color = to_macroquad_color(palette::GRID);
    let spacing = BackgroundScroll::GRID_SPACING * playfield.scale;
    if spacing <= f32::EPSILON {
        return;
    }

    let mut x = 0.0;
    while x < playfield.width {
        let top = metrics.to_screen(Vec2::new(x, 0.0));
        let bottom = metrics.to_screen(Vec2::new(x, playfield.height));
        draw_line(top.x, top.y, bottom.x, bottom.y, 1.0, color);
        x += spacing;
    }

    let mut y = scene.background.grid_offset - spacing;
    while y < playfield.height {
        let left = metrics.to_screen(Vec2::new(0.0, y));
        let right = metrics.to_screen(Vec2::new(playfield.width, y));
        draw_line(left.x, left.y, right.x, right.y, 1.0, color);
        y += spacing;
    }
}

fn draw_entity(entity: &SceneEntity, metrics: &SceneMetrics, sprite_atlas: &SpriteAtlas) {
    let origin = metrics.to_screen(entity.position);
    let size = entity.size * metrics.scale;
    if sprite_atlas.draw(SpriteKey::for_kind(entity.kind), origin, size) {
        return;
    }

    let point = |fx: f32, fy: f32| MacroquadVec2::new(origin.x + size.x * fx, origin.y + size.y * fy);
    match entity.kind {
        EntityKind::Player => {
            let color = to_macroquad_color(palette::PLAYER);
            let unit = entity.size.y / base::PLAYER_SIZE as f32;
            let notch = MacroquadVec2::new(
                origin.x + size.x * 0.5,
                origin.y + size.y - metrics.length(10.0 * unit),
            );
            draw_triangle(point(0.5, 0.0), point(0.0, 1.0), notch, color);
            draw_triangle(point(0.5, 0.0), notch, point(1.0, 1.0), color);
            draw_circle(
                origin.x + size.x * 0.5,
                origin.y + metrics.length(10.0 * unit),
                metrics.length(2.0 * unit),
                WHITE,
            );
        }
        EntityKind::Enemy => {
            draw_triangle(
                point(0.0, 0.0),
                point(1.0, 0.0),
                point(0.5, 1.0),
                to_macroquad_color(palette::ENEMY),
            );
        }
        EntityKind::PlayerProjectile => draw_rectangle(
            origin.x,
            origin.y,
            size.x,
            size.y,
            to_macroquad_color(palette::PLAYER_PROJECTILE),
        ),
        EntityKind::EnemyProjectile => draw_rectangle(
            origin.x,
            origin.y,
            size.x,
            size.y,
            to_macroquad_color(palette::ENEMY_PROJECTILE),
        ),
    }
}

pub(crate) fn to_macroquad_color(color: sky_raid_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_raid_core::Scale;
    use sky_raid_rendering::PlayfieldPresentation;

    fn scene(width: f32, height: f32) -> Scene {
        Scene::new(PlayfieldPresentation::new(width, height, Scale::UNIT).expect("valid playfield"))
    }

    #[test]
    fn scene_metrics_letterbox_wide_windows() {
        let metrics = SceneMetrics::from_scene(&scene(480.0, 640.0), 1280.0, 640.0);

        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.offset, Vec2::new(400.0, 0.0));
        assert_eq!(metrics.to_screen(Vec2::new(10.0, 20.0)), Vec2::new(410.0, 20.0));
    }

    #[test]
    fn scene_metrics_shrink_to_fit_short_windows() {
        let metrics = SceneMetrics::from_scene(&scene(480.0, 640.0), 480.0, 320.0);

        assert_eq!(metrics.scale, 0.5);
        assert_eq!(metrics.offset, Vec2::new(120.0, 0.0));
        assert_eq!(metrics.length(48.0), 24.0);
    }

    #[test]
    fn pointer_maps_back_into_playfield_units() {
        let metrics = SceneMetrics::from_scene(&scene(480.0, 640.0), 1280.0, 1280.0);
        let screen = metrics.to_screen(Vec2::new(200.0, 420.0));

        assert_eq!(metrics.to_playfield(screen), Some(Vec2::new(200.0, 420.0)));
    }

    #[test]
    fn frame_cap_of_zero_disables_pacing() {
        let backend = MacroquadBackend::new().with_frame_cap(Some(Duration::ZERO));
        assert_eq!(backend.frame_cap, None);

        let backend = backend.with_frame_cap(Some(Duration::from_millis(16)));
        assert_eq!(backend.frame_cap, Some(Duration::from_millis(16)));
    }
}
