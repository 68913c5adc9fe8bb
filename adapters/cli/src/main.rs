#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Herbivore experience.

mod audio_deck;
mod autopilot;
mod config;
mod observers;
mod simulation;

use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use herbivore_rendering::{Color, Presentation, RenderingBackend};
use herbivore_rendering_macroquad::MacroquadBackend;
use herbivore_world::query;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    audio_deck::{export_sounds, AudioDeck},
    autopilot::autopilot,
    config::GameConfig,
    simulation::{Simulation, FRAME},
};

const WINDOW_TITLE: &str = "Herbivore";
const DESERT: Color = Color::from_rgb_u8(0xc2, 0xa0, 0x6b);

/// Herbivore - find your pack in the desert
#[derive(Parser, Debug)]
#[command(name = "herbivore")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for every random draw (default: random)
    #[arg(long)]
    seed: Option<u64>,

    /// Step the simulation with a scripted player instead of opening a window
    #[arg(long)]
    headless_frames: Option<u32>,

    /// Write the synthesized sound effects as WAV files into this directory and exit
    #[arg(long)]
    export_sounds: Option<PathBuf>,

    /// Print frame timings once per second
    #[arg(long)]
    show_fps: bool,

    /// Render as fast as possible instead of syncing with the display
    #[arg(long)]
    no_vsync: bool,
}

/// Entry point for the Herbivore command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    if let Some(dir) = &args.export_sounds {
        let written = export_sounds(dir)?;
        info!(count = written.len(), dir = %dir.display(), "sounds exported");
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let seed = args.seed.unwrap_or_else(random_seed);
    info!(seed, "starting herbivore");

    let mut simulation = Simulation::new(&config, seed).context("invalid configuration")?;
    let deck = simulation
        .observers_mut()
        .subscribe(Box::new(AudioDeck::new()));

    match args.headless_frames {
        Some(frames) => {
            run_headless(&mut simulation, frames);
            if simulation.observers_mut().unsubscribe(deck) {
                debug!("audio deck detached");
            }
            Ok(())
        }
        None => {
            let scene = simulation
                .scene(config.camera.smooth_speed)
                .context("failed to build the initial scene")?;
            let presentation = Presentation::new(WINDOW_TITLE, DESERT, scene);
            MacroquadBackend::new()
                .with_vsync(!args.no_vsync)
                .with_show_fps(args.show_fps)
                .run(presentation, move |dt, input, scene| {
                    simulation.frame(dt, &input, scene);
                })
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    GameConfig::from_toml_str(&source)
        .with_context(|| format!("failed to load config file {}", path.display()))
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn run_headless(simulation: &mut Simulation, frames: u32) {
    let mut stepped = 0;
    while stepped < frames && !query::game_state(simulation.world()).is_terminal() {
        let input = autopilot(simulation);
        simulation.step(FRAME, &input);
        stepped += 1;
    }

    let world = simulation.world();
    info!(
        frames = stepped,
        state = ?query::game_state(world),
        score = query::score(world),
        pack_size = query::pack_size(world),
        "headless run finished"
    );
}
