//! Optional TOML configuration layered under the command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
};

use scrap_station_core::{TargetSelection, Viewport, WorldPoint};
use scrap_station_simulation::Config as SimulationConfig;
use serde::Deserialize;
use thiserror::Error;

/// Window pixels per logical unit when nothing else is configured.
pub(crate) const DEFAULT_SCALE: f32 = 2.0;

/// Failures while loading the configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration file {}", .path.display())]
    Read {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid configuration TOML.
    #[error("failed to parse configuration file {}", .path.display())]
    Parse {
        /// Location that was parsed.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of a configuration file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    simulation: SimulationSection,
    window: WindowSection,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SimulationSection {
    seed: Option<u64>,
    origin: Option<WorldPoint>,
    viewport: Option<Viewport>,
    targeting: Option<TargetSelection>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WindowSection {
    scale: Option<f32>,
}

/// Values supplied on the command line; each one overrides the file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) targeting: Option<TargetSelection>,
}

/// Fully resolved launch settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) simulation: SimulationConfig,
    pub(crate) scale: f32,
}

impl FileConfig {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Layers `overrides` over the file and the built-in defaults.
    pub(crate) fn resolve(&self, overrides: Overrides) -> Settings {
        let mut simulation = SimulationConfig::default();
        let section = &self.simulation;

        if let Some(origin) = section.origin {
            simulation.world.origin = origin;
        }
        if let Some(viewport) = section.viewport {
            simulation.world.viewport = viewport;
        }
        if let Some(seed) = overrides.seed.or(section.seed) {
            simulation.world.seed = seed;
        }
        if let Some(targeting) = overrides.targeting.or(section.targeting) {
            simulation.targeting = targeting;
        }

        Settings {
            simulation,
            scale: self.window.scale.unwrap_or(DEFAULT_SCALE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_resolves_to_defaults() {
        let file = FileConfig::parse("").expect("empty file is valid");
        let settings = file.resolve(Overrides::default());

        assert_eq!(settings.simulation, SimulationConfig::default());
        assert_eq!(settings.scale, DEFAULT_SCALE);
    }

    #[test]
    fn sections_override_defaults() {
        let file = FileConfig::parse(
            r#"
            [simulation]
            seed = 42
            targeting = "nearest"
            origin = { x = 100.0, y = 80.0 }
            viewport = { width = 800.0, height = 600.0 }

            [window]
            scale = 1.5
            "#,
        )
        .expect("valid configuration");
        let settings = file.resolve(Overrides::default());

        assert_eq!(settings.simulation.world.seed, 42);
        assert_eq!(settings.simulation.targeting, TargetSelection::Nearest);
        assert_eq!(settings.simulation.world.origin, WorldPoint::new(100.0, 80.0));
        assert_eq!(settings.simulation.world.viewport, Viewport::new(800.0, 600.0));
        assert_eq!(settings.scale, 1.5);
    }

    #[test]
    fn command_line_wins_over_the_file() {
        let file = FileConfig::parse("[simulation]\nseed = 42\ntargeting = \"nearest\"\n")
            .expect("valid configuration");
        let settings = file.resolve(Overrides {
            seed: Some(7),
            targeting: Some(TargetSelection::LastInRange),
        });

        assert_eq!(settings.simulation.world.seed, 7);
        assert_eq!(settings.simulation.targeting, TargetSelection::LastInRange);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = FileConfig::parse("[window]\nzoom = 3\n").expect_err("unknown key");
        assert!(error.to_string().contains("zoom"));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = FileConfig::load(Path::new("/nonexistent/scrap-station.toml"))
            .expect_err("file does not exist");

        assert!(matches!(error, ConfigError::Read { .. }));
        assert!(error.to_string().contains("scrap-station.toml"));
    }
}
