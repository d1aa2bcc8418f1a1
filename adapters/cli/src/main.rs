#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Duskfall.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use duskfall_cli::{load_config, load_level, Simulation};
use duskfall_core::{GameConfig, WELCOME_BANNER};
use duskfall_rendering::{Color, Presentation, RenderingBackend, Scene};
use duskfall_rendering_macroquad::MacroquadBackend;
use duskfall_world::Level;
use tracing_subscriber::EnvFilter;

/// Frame length used when no window drives the clock.
const HEADLESS_FRAME: Duration = Duration::from_micros(16_667);

#[derive(Debug, Parser)]
#[command(name = "duskfall", about = "First-person raycasting shooter")]
struct CliArgs {
    /// TOML configuration file; defaults apply to anything it omits.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Text map to play instead of the built-in level.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,
    /// Seed for agent attack rolls, overriding the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Run this many frames without a window and log a summary.
    #[arg(long, value_name = "FRAMES")]
    headless_frames: Option<u64>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    vsync: bool,
    /// Print frame timing once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Duskfall command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.agents.seed = seed;
    }
    let level = load_level(args.map.as_deref(), &config)?;

    tracing::info!(seed = config.agents.seed, "{WELCOME_BANNER}");

    match args.headless_frames {
        Some(frames) => {
            run_headless(level, config, frames);
            Ok(())
        }
        None => run_windowed(level, config, args.vsync, args.show_fps),
    }
}

fn run_headless(level: Level, config: GameConfig, frames: u64) {
    let mut simulation = Simulation::new(level, config);
    for _ in 0..frames {
        let _ = simulation.step(HEADLESS_FRAME);
    }

    let summary = simulation.summary();
    tracing::info!(
        frames = summary.frames,
        status = ?summary.status,
        score = summary.score,
        health = summary.health,
        agents_alive = summary.agents_alive,
        shots = summary.shots,
        "headless run finished"
    );
}

fn run_windowed(
    level: Level,
    config: GameConfig,
    vsync: bool,
    show_fps: bool,
) -> Result<()> {
    let viewport = config.viewport();
    let rotation_speed = config.player.rotation_speed;
    let mut simulation = Simulation::new(level, config);
    let intents = simulation.intents();

    let mut scene = Scene::new(viewport.width(), viewport.height())
        .context("viewport cannot host a scene")?;
    simulation.populate_scene(&mut scene);
    let presentation = Presentation::new("Duskfall", Color::from_rgb_u8(38, 38, 46), scene);

    MacroquadBackend::new()
        .with_vsync(vsync)
        .with_show_fps(show_fps)
        .run(presentation, move |dt, input, scene| {
            intents.publish(input.intent(rotation_speed * dt.as_secs_f32()));
            let _ = simulation.step(dt);
            simulation.populate_scene(scene);
        })
}
