#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Snake Arcade experience.

mod rules;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use snake_arcade_core::GAME_TITLE;
use snake_arcade_rendering::{
    layout::{self, CELL_SIZE},
    palette, Presentation, RenderingBackend, Scene, VirtualSurface,
};
use snake_arcade_rendering_macroquad::{MacroquadBackend, SilentAudio};
use snake_arcade_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::{rules::Variant, simulation::Simulation};

/// Command-line arguments accepted by the Snake Arcade binary.
#[derive(Debug, Parser)]
#[command(name = "snake-arcade", version, about = "Snake 2.0 arcade game")]
struct CliArgs {
    /// Rule preset to play.
    #[arg(long, value_enum, default_value_t = Variant::Deluxe)]
    variant: Variant,
    /// TOML file overriding fields of the chosen preset.
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,
    /// Seed for item and rock placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Directory containing `manifest.toml` and the sprite images.
    #[arg(long, value_name = "DIR", default_value = "assets")]
    assets: PathBuf,
    /// Draw primitive shapes instead of loading sprites.
    #[arg(long)]
    no_sprites: bool,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Print frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Log filter directive; overrides `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

/// Entry point for the Snake Arcade command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_level.as_deref())?;

    let rules = rules::load(args.variant, args.rules.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, variant = ?args.variant, "starting game");

    let surface =
        VirtualSurface::new(rules.grid, CELL_SIZE).context("failed to size the play surface")?;
    let fullscreen_toggle = rules.fullscreen_toggle;
    let instructions = layout::instructions(&rules);
    let world = World::new(rules, seed).context("failed to create world")?;
    let mut simulation = Simulation::new(world, SilentAudio::new());

    let presentation = Presentation::new(
        format!("{GAME_TITLE} - Snake Arcade"),
        palette::LETTERBOX,
        Scene::new(surface).with_instructions(instructions),
        fullscreen_toggle,
    );
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .with_sprite_loading(!args.no_sprites)
        .with_assets_dir(args.assets);

    backend
        .run(presentation, move |dt, input, scene| {
            let outcome = simulation.advance_frame(dt, &input);
            simulation.populate_scene(scene);
            outcome
        })
        .context("renderer stopped with an error")
}

fn init_logging(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}
