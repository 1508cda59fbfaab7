#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Sky Raid experience.

mod simulation;

use std::{
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sky_raid_core::{Playfield, Scale, WINDOW_TITLE};
use sky_raid_rendering::{palette, PlayfieldPresentation, Presentation, RenderingBackend, Scene};
use sky_raid_rendering_macroquad::{MacroquadBackend, SpriteAtlas};

use crate::simulation::Simulation;

/// Command-line options for launching the Sky Raid experience.
#[derive(Debug, Parser)]
#[command(name = "sky-raid", about = "Arcade shooter: survive the descending raid")]
struct CliArgs {
    /// Factor applied to the playfield, entity sizes and speeds.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
    /// Base seed for round generation; omitted seeds are derived from the clock.
    #[arg(long)]
    seed: Option<u64>,
    /// Minimum duration of a frame in milliseconds; zero disables pacing.
    #[arg(long, value_name = "MS", default_value_t = 16)]
    frame_cap_ms: u64,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Log frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Sprite manifest consulted at startup.
    #[arg(long, value_name = "PATH")]
    assets: Option<PathBuf>,
    /// Draw procedural shapes instead of loading sprites.
    #[arg(long)]
    no_sprites: bool,
}

/// Entry point for the Sky Raid command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let scale = Scale::new(args.scale)
        .with_context(|| format!("invalid --scale value {}", args.scale))?;
    let base_seed = args.seed.unwrap_or_else(clock_seed);
    info!("starting sky raid at scale {} with base seed {base_seed}", scale.get());

    let playfield = Playfield::scaled(scale);
    let presentation_playfield =
        PlayfieldPresentation::new(playfield.width() as f32, playfield.height() as f32, scale)
            .context("failed to describe the playfield for rendering")?;
    let presentation = Presentation::new(
        WINDOW_TITLE,
        palette::BACKGROUND,
        Scene::new(presentation_playfield),
    );

    let frame_cap = (args.frame_cap_ms > 0).then(|| Duration::from_millis(args.frame_cap_ms));
    let mut backend = MacroquadBackend::new()
        .with_show_fps(args.show_fps)
        .with_frame_cap(frame_cap)
        .with_sprite_manifest(args.assets.unwrap_or_else(SpriteAtlas::default_manifest_path))
        .with_sprite_loading(!args.no_sprites);
    if args.vsync {
        backend = backend.with_vsync(true);
    }

    let mut simulation = Simulation::new(scale, base_seed);
    backend
        .run(presentation, move |_dt, input, scene| simulation.frame(input, scene))
        .context("rendering backend terminated with an error")
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
