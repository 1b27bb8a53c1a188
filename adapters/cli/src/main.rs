#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Scrap Station experience.

mod config;
mod scene;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use scrap_station_core::TargetSelection;
use scrap_station_rendering::{Color, FrameInput, Presentation, RenderingBackend, Scene};
use scrap_station_rendering_macroquad::MacroquadBackend;
use scrap_station_simulation::{Simulation, StepInput};
use scrap_station_system_builder::BuilderInput;
use scrap_station_world::query;
use tracing_subscriber::filter::EnvFilter;

use self::{
    config::{FileConfig, Overrides},
    scene::ScenePainter,
};

/// Command-line arguments accepted by the Scrap Station binary.
#[derive(Debug, Parser)]
#[command(name = "scrap-station")]
#[command(about = "Defend an asteroid scrap station built tile by tile")]
struct Args {
    /// TOML file with `[simulation]` and `[window]` sections.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for every random stream of the run.
    #[arg(long)]
    seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_filter: String,
    /// How turrets choose among asteroids in range.
    #[arg(long, value_enum)]
    targeting: Option<TargetingArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TargetingArg {
    /// Last asteroid in range, in slot order.
    LastInRange,
    /// Nearest asteroid in range.
    Nearest,
}

impl From<TargetingArg> for TargetSelection {
    fn from(value: TargetingArg) -> Self {
        match value {
            TargetingArg::LastInRange => Self::LastInRange,
            TargetingArg::Nearest => Self::Nearest,
        }
    }
}

/// Entry point for the Scrap Station command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_filter)?;

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = file.resolve(Overrides {
        seed: args.seed,
        targeting: args.targeting.map(TargetSelection::from),
    });

    let mut simulation = Simulation::new(settings.simulation);
    tracing::info!(
        seed = settings.simulation.world.seed,
        targeting = ?settings.simulation.targeting,
        "{}",
        query::welcome_banner(simulation.world())
    );

    let presentation = Presentation::new(
        "Scrap Station",
        Color::BLACK,
        settings.simulation.world.viewport,
        settings.scale,
        Scene::new(),
    )
    .context("invalid window configuration")?;

    let mut painter = ScenePainter::new();
    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |input, scene| {
            let events = simulation.step(step_input(input));
            painter.absorb(events);
            painter.paint(simulation.world(), scene);
        })
}

fn init_tracing(fallback: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(fallback)
            .with_context(|| format!("invalid log filter {fallback:?}"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow!(error))
}

fn step_input(input: FrameInput) -> StepInput {
    StepInput {
        builder: BuilderInput::new(
            [input.up, input.down, input.left, input.right],
            input.build,
            input.start_wave,
        ),
        restart: input.restart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_parse_into_overrides() {
        let args = Args::try_parse_from([
            "scrap-station",
            "--seed",
            "9",
            "--targeting",
            "nearest",
            "--vsync",
        ])
        .expect("valid arguments");

        assert_eq!(args.seed, Some(9));
        assert_eq!(
            args.targeting.map(TargetSelection::from),
            Some(TargetSelection::Nearest)
        );
        assert!(args.vsync);
        assert!(!args.show_fps);
        assert_eq!(args.log_filter, "info");
    }

    #[test]
    fn frame_input_maps_onto_cursor_steps() {
        let input = FrameInput {
            left: true,
            build: [false, true, false, false],
            restart: true,
            ..FrameInput::default()
        };
        let step = step_input(input);

        assert_eq!(step.builder.moves, [false, false, true, false]);
        assert_eq!(step.builder.build, [false, true, false, false]);
        assert!(!step.builder.start_wave);
        assert!(step.restart);
    }
}
