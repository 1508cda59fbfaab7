//! Screen overlays, HUD and widget drawing for the Macroquad backend.
//!
//! Widgets are drawn as plain shapes so hover and click detection stay on the
//! shared `point_in_rect` hit test instead of Macroquad's UI state.

use glam::Vec2;
use macroquad::{
    color::{Color as MacroquadColor, BLACK, WHITE},
    shapes::{draw_rectangle, draw_rectangle_lines},
    text::{draw_text, measure_text},
};
use sky_raid_rendering::{palette, PointerInput, Scene, Widget};

use crate::{to_macroquad_color, SceneMetrics};

const OUTLINE_THICKNESS: f32 = 1.0;

pub(crate) fn draw_hud(scene: &Scene, metrics: &SceneMetrics) {
    let scale = scene.playfield.scale;
    draw_text_at(
        metrics,
        &format!("SCORE: {}", scene.score),
        Vec2::splat(15.0 * scale),
        20.0 * scale,
        to_macroquad_color(palette::TEXT),
    );
    if !scene.difficulty_label.is_empty() {
        draw_text_at(
            metrics,
            scene.difficulty_label,
            Vec2::new(15.0, 40.0) * scale,
            16.0 * scale,
            to_macroquad_color(palette::TEXT.with_alpha(0.6)),
        );
    }
}

pub(crate) fn draw_menu(scene: &Scene, metrics: &SceneMetrics) {
    let center_x = scene.playfield.width / 2.0;
    let scale = scene.playfield.scale;
    draw_text_centered(
        metrics,
        "SKY RAID",
        Vec2::new(center_x + 2.0 * scale, 122.0 * scale),
        32.0 * scale,
        MacroquadColor::from_rgba(20, 20, 20, 255),
    );
    draw_text_centered(
        metrics,
        "SKY RAID",
        Vec2::new(center_x, 120.0 * scale),
        32.0 * scale,
        to_macroquad_color(palette::TEXT),
    );
    draw_text_centered(
        metrics,
        "Choose a difficulty",
        Vec2::new(center_x, 360.0 * scale),
        20.0 * scale,
        to_macroquad_color(palette::TEXT),
    );
    draw_text_centered(
        metrics,
        "WASD / arrows move   Space fires   P pauses",
        Vec2::new(center_x, 610.0 * scale),
        16.0 * scale,
        MacroquadColor::from_rgba(150, 150, 150, 255),
    );
}

pub(crate) fn draw_pause_overlay(scene: &Scene, metrics: &SceneMetrics) {
    let center = playfield_center(scene);
    let scale = scene.playfield.scale;
    draw_framed_box(
        metrics,
        center,
        Vec2::new(120.0, 60.0) * scale,
        to_macroquad_color(palette::BACKGROUND),
    );
    draw_text_centered(
        metrics,
        "PAUSED",
        center - Vec2::new(0.0, 15.0 * scale),
        30.0 * scale,
        WHITE,
    );
    draw_text_centered(
        metrics,
        "Press [P] to resume",
        center + Vec2::new(0.0, 25.0 * scale),
        16.0 * scale,
        WHITE,
    );
}

pub(crate) fn draw_game_over(scene: &Scene, metrics: &SceneMetrics, final_score: u64) {
    let center = playfield_center(scene);
    let scale = scene.playfield.scale;
    draw_framed_box(metrics, center, Vec2::new(150.0, 100.0) * scale, BLACK);
    draw_text_centered(
        metrics,
        "GAME OVER",
        center - Vec2::new(0.0, 40.0 * scale),
        40.0 * scale,
        to_macroquad_color(palette::GAME_OVER),
    );
    draw_text_centered(
        metrics,
        &format!("Final Score: {final_score}"),
        center + Vec2::new(0.0, 20.0 * scale),
        24.0 * scale,
        WHITE,
    );
    draw_text_centered(
        metrics,
        "[Space] retry   [Esc] quit",
        center + Vec2::new(0.0, 60.0 * scale),
        16.0 * scale,
        WHITE,
    );
}

pub(crate) fn draw_widgets(
    widgets: &[Widget],
    pointer: Option<PointerInput>,
    metrics: &SceneMetrics,
    label_size: f32,
) {
    for widget in widgets {
        let hovered = pointer
            .map(|pointer| widget.contains(pointer.position.x, pointer.position.y))
            .unwrap_or(false);
        let fill = if hovered {
            palette::BUTTON_HOVER
        } else {
            palette::BUTTON
        };

        let origin = metrics.to_screen(Vec2::new(widget.bounds.x as f32, widget.bounds.y as f32));
        let size = Vec2::new(widget.bounds.width as f32, widget.bounds.height as f32);
        draw_rectangle(
            origin.x,
            origin.y,
            metrics.length(size.x),
            metrics.length(size.y),
            to_macroquad_color(fill),
        );
        let center = Vec2::new(
            (widget.bounds.x + widget.bounds.width / 2.0) as f32,
            (widget.bounds.y + widget.bounds.height / 2.0) as f32,
        );
        draw_text_centered(metrics, widget.label, center, label_size, WHITE);
    }
}

fn playfield_center(scene: &Scene) -> Vec2 {
    Vec2::new(scene.playfield.width / 2.0, scene.playfield.height / 2.0)
}

fn draw_framed_box(metrics: &SceneMetrics, center: Vec2, half_extent: Vec2, fill: MacroquadColor) {
    let origin = metrics.to_screen(center - half_extent);
    let width = metrics.length(half_extent.x * 2.0);
    let height = metrics.length(half_extent.y * 2.0);
    draw_rectangle(origin.x, origin.y, width, height, fill);
    draw_rectangle_lines(origin.x, origin.y, width, height, OUTLINE_THICKNESS, WHITE);
}

fn draw_text_at(
    metrics: &SceneMetrics,
    text: &str,
    top_left: Vec2,
    size: f32,
    color: MacroquadColor,
) {
    let font_size = metrics.length(size).max(1.0);
    let anchor = metrics.to_screen(top_left);
    let _ = draw_text(text, anchor.x, anchor.y + font_size * 0.75, font_size, color);
}

fn draw_text_centered(
    metrics: &SceneMetrics,
    text: &str,
    center: Vec2,
    size: f32,
    color: MacroquadColor,
) {
    let font_size = metrics.length(size).max(1.0);
    let dimensions = measure_text(text, None, font_size as u16, 1.0);
    let anchor = metrics.to_screen(center);
    let _ = draw_text(
        text,
        anchor.x - dimensions.width / 2.0,
        anchor.y + dimensions.height / 2.0,
        font_size,
        color,
    );
}
