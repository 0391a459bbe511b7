//! Game lifecycle and frame scheduling
//!
//! A `Session` owns the simulation state for the life of the process:
//! `Start -> Playing <-> Paused -> GameOver -> Playing`. The host calls
//! [`Session::advance`] once per display refresh with the wall time elapsed
//! since the previous call; the session turns that into simulation steps.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::{GameConfig, Timestep};
use crate::error::ConfigError;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, step};
use crate::snapshot::Snapshot;

pub struct Session {
    config: GameConfig,
    state: GameState,
    /// Unsimulated wall time carried between frames (fixed timestep only)
    accumulator: Duration,
    /// Events raised during the most recent frame
    last_events: Vec<GameEvent>,
    games_started: u64,
}

impl Session {
    /// New session sitting on the start screen. Rejects an invalid config.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(clock_seed);
        Ok(Self {
            state: GameState::new(config.clone(), seed),
            config,
            accumulator: Duration::ZERO,
            last_events: Vec::new(),
            games_started: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for tooling and scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    /// Start a fresh game from the start screen or after a game over.
    ///
    /// Everything resets except the high score. Ignored mid-game.
    pub fn start_game(&mut self) {
        match self.state.phase {
            GamePhase::Start | GamePhase::GameOver => {}
            GamePhase::Playing | GamePhase::Paused => {
                log::debug!("start_game ignored while {:?}", self.state.phase);
                return;
            }
        }

        let seed = match self.config.seed {
            Some(seed) => seed.wrapping_add(self.games_started),
            None => clock_seed(),
        };
        let high_score = self.state.scoreboard.high_score;

        self.state = GameState::new(self.config.clone(), seed);
        self.state.scoreboard.high_score = high_score;
        self.state.phase = GamePhase::Playing;
        self.accumulator = Duration::ZERO;
        self.last_events.clear();
        self.games_started += 1;
        log::info!("Game {} started with seed {}", self.games_started, seed);
    }

    /// Playing <-> Paused; ignored in any other phase
    pub fn toggle_pause(&mut self) {
        self.state.phase = match self.state.phase {
            GamePhase::Playing => {
                log::info!("Paused at tick {}", self.state.time_ticks);
                GamePhase::Paused
            }
            GamePhase::Paused => {
                log::info!("Resumed at tick {}", self.state.time_ticks);
                GamePhase::Playing
            }
            other => other,
        };
        // Any pending partial step is dropped so resuming never replays a backlog
        self.accumulator = Duration::ZERO;
    }

    /// Handle one frame signal. Returns the number of simulation steps run.
    pub fn advance(&mut self, elapsed: Duration, input: &TickInput) -> u32 {
        self.last_events.clear();
        if input.pause {
            self.toggle_pause();
        }
        if self.state.phase != GamePhase::Playing {
            self.accumulator = Duration::ZERO;
            return 0;
        }

        // Deferred effects follow delivered time; only stepping is clamped
        self.state.timer_clock += elapsed;

        let max_frame = self.config.max_frame();
        let elapsed = if elapsed > max_frame {
            log::warn!(
                "Frame took {:?}, clamping to {:?}",
                elapsed,
                max_frame
            );
            max_frame
        } else {
            elapsed
        };

        match self.config.timestep {
            Timestep::PerFrame => {
                self.run_step(input, elapsed);
                1
            }
            Timestep::Fixed => self.run_fixed_steps(elapsed, input),
        }
    }

    /// One simulation step; its events join the frame's list
    fn run_step(&mut self, input: &TickInput, dt: Duration) {
        step(&mut self.state, input, dt);
        self.last_events.append(&mut self.state.events);
    }

    fn run_fixed_steps(&mut self, elapsed: Duration, input: &TickInput) -> u32 {
        let dt = self.config.step_duration();
        self.accumulator += elapsed;

        let mut substeps = 0;
        while self.accumulator >= dt && substeps < self.config.max_substeps {
            self.run_step(input, dt);
            self.accumulator -= dt;
            substeps += 1;

            if self.state.phase != GamePhase::Playing {
                self.accumulator = Duration::ZERO;
                break;
            }
        }
        if self.accumulator >= dt {
            log::debug!("Substep cap hit, dropping {:?} of backlog", self.accumulator);
            self.accumulator = Duration::ZERO;
        }
        substeps
    }

    /// Read-only view of the latest completed frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, &self.last_events)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
