#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays an Astarcraft map and records the animation.

mod placement;

use std::{fs, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use astarcraft_core::{Command, Event};
use astarcraft_rendering::Recording;
use astarcraft_system_animation::{AnimationController, ViewerConfig};
use astarcraft_world::{self as world, query, MapLayout, World};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use placement::Placement;

/// Plays an Astarcraft map and writes the keyframed animation as JSON.
#[derive(Parser, Debug)]
#[command(name = "astarcraft")]
#[command(about = "Records the animation of an Astarcraft map as JSON keyframes")]
struct CliArgs {
    /// ASCII map where `#` is void, `.` a platform and `U`/`R`/`D`/`L` an arrow.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Robot start as COLUMN,ROW,DIRECTION; replaces the demo robots.
    #[arg(long = "robot", value_name = "C,R,DIR")]
    robots: Vec<Placement>,

    /// Arrow placed before the first tick, as COLUMN,ROW,DIRECTION.
    #[arg(long = "arrow", value_name = "C,R,DIR")]
    arrows: Vec<Placement>,

    /// Maximum number of ticks to animate.
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    /// TOML file overriding viewer defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Destination of the recording; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Entry point for the Astarcraft command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let config = load_config(args.config.as_ref())?;
    let layout = load_layout(args.map.as_ref(), &args.robots)?;
    let mut world = World::new(layout);
    let mut recording = Recording::new();
    let mut controller = AnimationController::new(&config, &mut recording, &world)
        .context("failed to build the scene")?;

    if !args.arrows.is_empty() {
        place_arrows(&mut world, &args.arrows);
        recording.begin_frame();
        let revealed = controller
            .update_map(&mut recording, &world)
            .context("failed to animate placed arrows")?;
        info!(revealed = revealed.len(), "placed arrows revealed");
    }

    for _ in 0..args.ticks {
        if !query::has_live_robots(&world) {
            break;
        }

        let mut events = Vec::new();
        world::apply(&mut world, Command::Tick, &mut events);
        recording.begin_frame();
        let _ = controller
            .update(&mut recording, &world)
            .context("failed to animate tick")?;
    }
    recording.finish();

    info!(
        ticks = query::tick_index(&world),
        score = query::score(&world),
        frames = recording.frames().len(),
        entities = recording.entity_count(),
        "playback recorded"
    );

    write_recording(&recording, args.output.as_ref())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&PathBuf>) -> Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    ViewerConfig::from_toml_str(&contents)
        .with_context(|| format!("invalid config {}", path.display()))
}

fn load_layout(path: Option<&PathBuf>, robots: &[Placement]) -> Result<MapLayout> {
    let layout = match path {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read map {}", path.display()))?;
            MapLayout::parse(&source)
                .with_context(|| format!("invalid map {}", path.display()))?
        }
        None if robots.is_empty() => return MapLayout::demo().context("invalid demo map"),
        None => MapLayout::parse(world::layout::DEMO_LAYOUT).context("invalid demo map")?,
    };

    robots.iter().try_fold(layout, |layout, robot| {
        layout
            .with_robot(robot.cell, robot.direction)
            .context("invalid robot placement")
    })
}

fn place_arrows(world: &mut World, arrows: &[Placement]) {
    let mut events = Vec::new();
    for arrow in arrows {
        world::apply(
            world,
            Command::PlaceArrow {
                cell: arrow.cell,
                direction: arrow.direction,
            },
            &mut events,
        );
    }

    for event in events {
        if let Event::ArrowRejected { cell } = event {
            warn!(
                column = cell.column(),
                row = cell.row(),
                "arrow rejected outside the platforms"
            );
        }
    }
}

fn write_recording(recording: &Recording, output: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string(recording).context("failed to serialize recording")?;
    match output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write recording {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write recording to stdout")
        }
    }
}
