//! Scrap economy, clocks and the wave state machine.

use scrap_station_core::{GameMode, WaveClock, STARTING_SCRAP};

/// Base number of spawning frames in every wave.
const BASE_WAVE_DURATION: i32 = 60;

/// Additional spawning frames granted per completed wave.
const WAVE_DURATION_STEP: i32 = 30;

/// Upper bound of the spawning window.
const MAX_WAVE_DURATION: i32 = 3000;

/// Waves between difficulty increments.
const WAVES_PER_DIFFICULTY: u32 = 10;

/// Scrap the player may hold before the rubber band starts stretching waves.
const RUBBER_BAND_ALLOWANCE: u32 = 100;

/// Wave bookkeeping and the player's scrap balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    scrap: u32,
    mode: GameMode,
    game_timer: u64,
    wave_timer: i32,
    reward_pending: bool,
    wave: u32,
    difficulty: u32,
    rubber_band: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates the state of a fresh game.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scrap: STARTING_SCRAP,
            mode: GameMode::Build,
            game_timer: 0,
            wave_timer: 0,
            reward_pending: false,
            wave: 0,
            difficulty: 1,
            rubber_band: 0,
        }
    }

    /// Scrap owned by the player.
    #[must_use]
    pub const fn scrap(&self) -> u32 {
        self.scrap
    }

    /// Active gameplay mode.
    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    /// Frames elapsed since the game started.
    #[must_use]
    pub const fn game_timer(&self) -> u64 {
        self.game_timer
    }

    /// Frames of spawning left in the current wave.
    #[must_use]
    pub const fn wave_timer(&self) -> i32 {
        self.wave_timer
    }

    /// Reports whether a round-end settlement is waiting to run.
    #[must_use]
    pub const fn reward_pending(&self) -> bool {
        self.reward_pending
    }

    /// Number of waves started so far.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Upper bound of asteroids spawned per spawn tick.
    #[must_use]
    pub const fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Extra spawning frames earned by hoarding scrap.
    #[must_use]
    pub const fn rubber_band(&self) -> u32 {
        self.rubber_band
    }

    /// Timing snapshot consumed by the spawning system.
    #[must_use]
    pub const fn wave_clock(&self) -> WaveClock {
        WaveClock {
            mode: self.mode,
            game_timer: self.game_timer,
            wave_timer: self.wave_timer,
            difficulty: self.difficulty,
        }
    }

    /// Starts the next wave and switches to attack mode.
    pub fn activate_wave(&mut self) {
        let rubber_band = i32::try_from(self.rubber_band).unwrap_or(i32::MAX);
        let progression = i32::try_from(self.wave)
            .unwrap_or(i32::MAX)
            .saturating_mul(WAVE_DURATION_STEP);
        self.wave_timer = BASE_WAVE_DURATION
            .saturating_add(rubber_band)
            .saturating_add(progression)
            .min(MAX_WAVE_DURATION);
        self.difficulty = 1 + self.wave / WAVES_PER_DIFFICULTY;
        self.mode = GameMode::Attack;
        self.wave += 1;
    }

    /// Advances the clocks by one frame.
    ///
    /// Returns `true` when the wave ended this frame: the spawning window has
    /// elapsed and no asteroid is left, so the state returns to build mode
    /// with a settlement pending.
    pub fn advance(&mut self, asteroids_alive: bool) -> bool {
        self.game_timer += 1;
        if self.mode != GameMode::Attack {
            return false;
        }

        self.wave_timer -= 1;
        if self.wave_timer <= 0 && !asteroids_alive {
            self.mode = GameMode::Build;
            self.reward_pending = true;
            return true;
        }
        false
    }

    /// Consumes the pending settlement flag, returning whether it was set.
    pub fn take_reward(&mut self) -> bool {
        std::mem::take(&mut self.reward_pending)
    }

    /// Adds scrap to the player's balance.
    pub fn add_scrap(&mut self, amount: u32) {
        self.scrap = self.scrap.saturating_add(amount);
    }

    /// Deducts `cost` when affordable, returning whether the purchase succeeded.
    pub fn spend_scrap(&mut self, cost: u32) -> bool {
        match self.scrap.checked_sub(cost) {
            Some(remaining) => {
                self.scrap = remaining;
                true
            }
            None => false,
        }
    }

    /// Raises the rubber band to the scrap held beyond the allowance, never lowering it.
    pub fn raise_rubber_band(&mut self) {
        let surplus = self.scrap.saturating_sub(RUBBER_BAND_ALLOWANCE);
        self.rubber_band = self.rubber_band.max(surplus);
    }

    /// Switches to the terminal game-over mode.
    pub fn end_game(&mut self) {
        self.mode = GameMode::GameOver;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_wave_uses_base_duration() {
        let mut state = GameState::new();
        state.activate_wave();

        assert_eq!(state.wave_timer(), 60);
        assert_eq!(state.difficulty(), 1);
        assert_eq!(state.mode(), GameMode::Attack);
        assert_eq!(state.wave(), 1);
        assert_eq!(state.scrap(), 300);
    }

    #[test]
    fn wave_duration_grows_and_caps() {
        let mut state = GameState::new();
        state.wave = 12;
        state.rubber_band = 40;
        state.activate_wave();
        assert_eq!(state.wave_timer(), 60 + 40 + 12 * 30);
        assert_eq!(state.difficulty(), 2);

        state.wave = 200;
        state.activate_wave();
        assert_eq!(state.wave_timer(), 3000);
        assert_eq!(state.difficulty(), 21);
    }

    #[test]
    fn attack_returns_to_build_once_timer_and_field_are_clear() {
        let mut state = GameState::new();
        state.activate_wave();

        for _ in 0..59 {
            assert!(!state.advance(false));
        }
        assert_eq!(state.mode(), GameMode::Attack);

        assert!(!state.advance(true), "asteroids keep the wave alive");
        assert_eq!(state.mode(), GameMode::Attack);

        assert!(state.advance(false));
        assert_eq!(state.mode(), GameMode::Build);
        assert!(state.take_reward());
        assert!(!state.take_reward(), "settlement flag is consumed once");
    }

    #[test]
    fn game_timer_runs_in_every_mode() {
        let mut state = GameState::new();
        assert!(!state.advance(false));
        state.end_game();
        assert!(!state.advance(false));
        assert_eq!(state.game_timer(), 2);
        assert_eq!(state.wave_timer(), 0);
    }

    #[test]
    fn scrap_cannot_go_negative() {
        let mut state = GameState::new();
        assert!(state.spend_scrap(280));
        assert!(!state.spend_scrap(40));
        assert_eq!(state.scrap(), 20);
    }

    #[test]
    fn rubber_band_never_decreases() {
        let mut state = GameState::new();
        state.raise_rubber_band();
        assert_eq!(state.rubber_band(), 200);

        assert!(state.spend_scrap(250));
        state.raise_rubber_band();
        assert_eq!(state.rubber_band(), 200);
    }
}
