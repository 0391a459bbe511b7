//! Game balance and scheduling configuration
//!
//! Loaded from JSON; every field falls back to the stock arcade tuning.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LIVES, MAX_SUBSTEPS, TICK_RATE_HZ};
use crate::error::ConfigError;

/// How frame signals map onto simulation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Timestep {
    /// Fixed-timestep accumulator: zero or more steps per frame based on elapsed time
    #[default]
    Fixed,
    /// Exactly one step per frame signal (game speed follows the refresh rate)
    PerFrame,
}

impl Timestep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timestep::Fixed => "fixed",
            Timestep::PerFrame => "per_frame",
        }
    }
}

impl std::str::FromStr for Timestep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(Timestep::Fixed),
            "per_frame" | "per-frame" | "frame" => Ok(Timestep::PerFrame),
            other => Err(format!("unknown timestep `{other}` (expected fixed or per_frame)")),
        }
    }
}

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed; `None` picks one from the system clock at game start
    pub seed: Option<u64>,

    // === Scheduling ===
    pub timestep: Timestep,
    /// Fixed step rate in Hz
    pub tick_rate_hz: f32,
    /// Cap on steps run for a single frame signal
    pub max_substeps: u32,
    /// Frame deltas above this are clamped
    pub max_frame_ms: u64,

    // === Powerups & firing ===
    pub powerup_duration_ms: u64,
    pub fire_cooldown_ms: u64,
    pub rapid_fire_cooldown_ms: u64,
    /// Chance a destroyed hostile drops a powerup
    pub powerup_drop_chance: f64,
    /// Delay between the staggered drops of a defeated boss
    pub boss_drop_stagger_ms: u64,

    // === Spawning & progression ===
    pub fast_hostile_chance: f64,
    pub starting_lives: u8,
    /// Points needed to clear an ordinary level; `None` keeps the level fixed until a boss falls
    pub level_up_score: Option<u64>,

    // === Cosmetic ===
    pub explosion_lifetime_ms: u64,
    pub star_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,

            timestep: Timestep::Fixed,
            tick_rate_hz: TICK_RATE_HZ,
            max_substeps: MAX_SUBSTEPS,
            max_frame_ms: 100,

            powerup_duration_ms: 5000,
            fire_cooldown_ms: 200,
            rapid_fire_cooldown_ms: 100,
            powerup_drop_chance: 0.2,
            boss_drop_stagger_ms: 100,

            fast_hostile_chance: 0.3,
            starting_lives: 3,
            level_up_score: Some(1000),

            explosion_lifetime_ms: 300,
            star_count: 50,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TICK_RATE_HZ..=MAX_TICK_RATE_HZ).contains(&self.tick_rate_hz) {
            return Err(invalid("tick_rate_hz", "must be within 1.0..=1000.0"));
        }
        if self.max_substeps == 0 {
            return Err(invalid("max_substeps", "must be at least 1"));
        }
        if self.max_frame_ms == 0 {
            return Err(invalid("max_frame_ms", "must be at least 1"));
        }
        if self.step_duration() * self.max_substeps < self.max_frame() {
            return Err(invalid(
                "max_substeps",
                "too few steps per frame to cover max_frame_ms",
            ));
        }
        for (field, p) in [
            ("powerup_drop_chance", self.powerup_drop_chance),
            ("fast_hostile_chance", self.fast_hostile_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(field, "must be within 0.0..=1.0"));
            }
        }
        if self.starting_lives == 0 || self.starting_lives > MAX_LIVES {
            return Err(invalid("starting_lives", "must be within 1..=5"));
        }
        if self.level_up_score == Some(0) {
            return Err(invalid("level_up_score", "must be positive when set"));
        }
        Ok(())
    }

    /// Duration of one fixed simulation step
    pub fn step_duration(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.tick_rate_hz)
    }

    pub fn max_frame(&self) -> Duration {
        Duration::from_millis(self.max_frame_ms)
    }

    pub fn powerup_duration(&self) -> Duration {
        Duration::from_millis(self.powerup_duration_ms)
    }

    /// Minimum time between shots
    pub fn fire_cooldown(&self, rapid_fire: bool) -> Duration {
        Duration::from_millis(if rapid_fire {
            self.rapid_fire_cooldown_ms
        } else {
            self.fire_cooldown_ms
        })
    }

    pub fn explosion_lifetime(&self) -> Duration {
        Duration::from_millis(self.explosion_lifetime_ms)
    }

    pub fn boss_drop_stagger(&self) -> Duration {
        Duration::from_millis(self.boss_drop_stagger_ms)
    }
}

const MIN_TICK_RATE_HZ: f32 = 1.0;
const MAX_TICK_RATE_HZ: f32 = 1000.0;

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
