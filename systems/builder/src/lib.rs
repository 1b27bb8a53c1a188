#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure build-mode system responsible for emitting cursor, construction and wave commands.

use scrap_station_core::{Command, CursorStep, GameMode, TileKind};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Cursor moves requested this frame, indexed like [`CursorStep::ALL`].
    pub moves: [bool; 4],
    /// Build hotkeys pressed this frame, indexed like [`TileKind::BUILDABLE`].
    pub build: [bool; 4],
    /// Indicates whether the player asked for the next wave.
    pub start_wave: bool,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(moves: [bool; 4], build: [bool; 4], start_wave: bool) -> Self {
        Self {
            moves,
            build,
            start_wave,
        }
    }

    /// Reports whether the input requests nothing.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Build-mode system that translates player input into station commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Builder;

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits builder commands for the frame.
    ///
    /// Cursor moves are emitted first in up, down, left, right order, then
    /// one build command per pressed hotkey, then the wave start. Nothing is
    /// emitted outside build mode.
    pub fn handle(&mut self, mode: GameMode, input: BuilderInput, out: &mut Vec<Command>) {
        if mode != GameMode::Build || input.is_idle() {
            return;
        }

        for (step, pressed) in CursorStep::ALL.into_iter().zip(input.moves) {
            if pressed {
                out.push(Command::MoveCursor { step });
            }
        }

        for (hotkey, pressed) in input.build.into_iter().enumerate() {
            if let Some(kind) = TileKind::from_hotkey(hotkey).filter(|_| pressed) {
                out.push(Command::BuildTile { kind });
            }
        }

        if input.start_wave {
            out.push(Command::StartWave);
        }
    }
}
