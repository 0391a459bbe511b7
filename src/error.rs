//! Error types
//!
//! Gameplay itself never fails; the only runtime errors come from loading a
//! configuration. `InvariantViolation` describes programming defects caught by
//! `GameState::check_invariants`.

use std::fmt;

/// Failure to load or validate a [`crate::GameConfig`]
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid config field `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// A broken simulation invariant. Never reachable through normal play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    LivesOutOfRange { lives: u8 },
    LivesZeroWithoutGameOver,
    LevelZero,
    BossPhaseRegressed { from: u8, to: u8 },
    BossHealthOutOfRange { health: i32, max_health: i32 },
    BossOutsideBossFight,
    HostileDuringBossFight,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LivesOutOfRange { lives } => write!(f, "lives out of range: {lives}"),
            Self::LivesZeroWithoutGameOver => write!(f, "lives reached zero without game over"),
            Self::LevelZero => write!(f, "level must be at least 1"),
            Self::BossPhaseRegressed { from, to } => {
                write!(f, "boss phase regressed from {from} to {to}")
            }
            Self::BossHealthOutOfRange { health, max_health } => {
                write!(f, "boss health {health} outside 0..={max_health}")
            }
            Self::BossOutsideBossFight => write!(f, "boss present outside a boss fight"),
            Self::HostileDuringBossFight => write!(f, "hostile spawned during a boss fight"),
        }
    }
}

impl std::error::Error for InvariantViolation {}
