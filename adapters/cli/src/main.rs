#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Brutal Maze headlessly.
//!
//! The hero follows a scripted walk, aims at the nearest awake enemy and
//! optionally holds either attack. Frames can be printed as text.

mod script;
mod settings;
mod text_surface;

use std::{io, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use brutal_maze_rendering::{RenderSurface, Scene};
use brutal_maze_simulation::{Config, FrameInput, FrameStatus, Simulation};
use brutal_maze_world::{query, World};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{script::Script, settings::Settings, text_surface::TextSurface};

/// Headless Brutal Maze runner.
#[derive(Parser, Debug)]
#[command(name = "brutal-maze")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file in TOML format
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    write_config: bool,

    /// Surface size in pixels, e.g. 640x480
    #[arg(long, value_parser = parse_size)]
    size: Option<(u32, u32)>,

    /// Frames per second to simulate
    #[arg(long)]
    fps: Option<f32>,

    /// Random seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum number of frames to run
    #[arg(short, long, default_value = "600")]
    frames: u64,

    /// Walk script: l, r, u, d or . per frame, repeated
    #[arg(long, default_value = ".")]
    script: String,

    /// Hold the long-range attack
    #[arg(long)]
    fire: bool,

    /// Hold the close-range attack
    #[arg(long)]
    slash: bool,

    /// Print every Nth frame as text
    #[arg(long)]
    render_every: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some((width, height)) = args.size {
        settings.graphics.width = width;
        settings.graphics.height = height;
    }
    if let Some(fps) = args.fps {
        settings.tuning.frame_rate = fps;
    }
    if args.write_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let script = Script::parse(&args.script).context("invalid --script")?;
    run(&args, &settings, &script)
}

fn run(args: &Args, settings: &Settings, script: &Script) -> Result<()> {
    let (width, height) = (settings.graphics.width, settings.graphics.height);
    let frame_rate = settings.tuning.frame_rate;
    let mut config = Config::new(settings.tuning.clone(), width, height);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut simulation = Simulation::new(config);
    let mut surface = TextSurface::new(width, height, io::stdout().lock());
    let mut angle = 0.0;

    for frame in 0..args.frames {
        let step = script.step(frame);
        angle = aim(simulation.world()).unwrap_or(angle);
        let report = simulation.advance(FrameInput {
            frame_rate,
            right: step.right,
            down: step.down,
            angle,
            firing: args.fire,
            slashing: args.slash,
        })?;
        debug!(frame, events = report.events.len(), "frame finished");

        if args.render_every.is_some_and(|every| every > 0 && frame % every == 0) {
            draw(simulation.world(), &mut surface)?;
        }
        if let FrameStatus::Ended { score } = report.status {
            info!(frame, score, "hero fell");
            break;
        }
    }

    if args.render_every.is_some() {
        draw(simulation.world(), &mut surface)?;
    }
    println!(
        "frames: {}  score: {}  over: {}",
        simulation.frames(),
        query::displayed_score(simulation.world()),
        simulation.is_over()
    );
    Ok(())
}

/// Heading from the hero toward the nearest awake enemy.
fn aim(world: &World) -> Option<f32> {
    let hero = query::viewport(world).hero();
    query::enemy_view(world)
        .iter()
        .filter(|enemy| enemy.awake)
        .min_by(|left, right| {
            left.position
                .distance_to(hero)
                .total_cmp(&right.position.distance_to(hero))
        })
        .map(|enemy| enemy.position.angle_from(hero))
}

fn draw<S: RenderSurface>(world: &World, surface: &mut S) -> Result<()> {
    let scene = Scene::new(
        query::viewport(world),
        query::maze(world),
        &query::hero(world),
        &query::enemy_view(world),
        &query::bullet_view(world),
    );
    surface.resize(scene.size.0, scene.size.1);
    scene.draw(surface).context("failed to draw frame")
}

fn init_tracing(verbose: u8) -> Result<()> {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to install log subscriber: {error}"))
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .ok()
            .filter(|pixels| *pixels > 0)
            .ok_or_else(|| format!("invalid dimension {part:?} in {value:?}"))
    };
    Ok((parse(width)?, parse(height)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brutal_maze_core::Tuning;

    #[test]
    fn sizes_parse_in_either_case() {
        assert_eq!(parse_size("640x480"), Ok((640, 480)));
        assert_eq!(parse_size("800X600"), Ok((800, 600)));
        assert!(parse_size("640").is_err());
        assert!(parse_size("0x480").is_err());
    }

    #[test]
    fn nobody_to_aim_at_in_a_fresh_world() {
        let world = World::new(Tuning::default(), 640, 480, 9);
        assert_eq!(aim(&world), None);
    }

    #[test]
    fn arguments_parse() {
        let args = Args::try_parse_from([
            "brutal-maze",
            "--size",
            "800x600",
            "--script",
            "llud",
            "--fire",
            "-vv",
        ])
        .expect("valid arguments");
        assert_eq!(args.size, Some((800, 600)));
        assert_eq!(args.frames, 600);
        assert!(args.fire && !args.slash);
        assert_eq!(args.verbose, 2);
    }
}
