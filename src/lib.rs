//! Nova Shooter - a fixed-cadence arcade shooter simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, boss AI, collisions)
//! - `session`: Game lifecycle and frame scheduling
//! - `snapshot`: Read-only view handed to rendering collaborators
//! - `config`: Data-driven game balance
//! - `autopilot`: Demo intent source used by the headless runner

pub mod autopilot;
pub mod config;
pub mod error;
pub mod session;
pub mod sim;
pub mod snapshot;

pub use config::{GameConfig, Timestep};
pub use error::{ConfigError, InvariantViolation};
pub use session::Session;
pub use snapshot::Snapshot;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (one step per display refresh)
    pub const TICK_RATE_HZ: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const GAME_WIDTH: f32 = 400.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Player craft
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_Y: f32 = GAME_HEIGHT - 80.0;
    /// Horizontal distance per tick
    pub const PLAYER_SPEED: f32 = 6.0;

    /// Player bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 12.0;
    pub const BULLET_SPEED: f32 = 10.0;
    /// Horizontal drift per tick per radian of bullet angle
    pub const BULLET_DRIFT: f32 = 10.0;
    /// Side bullet angle (radians) under the spread powerup
    pub const SPREAD_ANGLE: f32 = 0.2;

    /// Hostiles
    pub const ENEMY_WIDTH: f32 = 36.0;
    pub const ENEMY_HEIGHT: f32 = 36.0;

    /// Powerups
    pub const POWERUP_WIDTH: f32 = 28.0;
    pub const POWERUP_HEIGHT: f32 = 28.0;
    pub const POWERUP_FALL_SPEED: f32 = 2.0;

    /// Boss
    pub const BOSS_WIDTH: f32 = 80.0;
    pub const BOSS_HEIGHT: f32 = 60.0;
    pub const BOSS_TARGET_Y: f32 = 60.0;
    /// Entry descent per tick
    pub const BOSS_ENTRY_SPEED: f32 = 2.0;
    /// Levels that open with a boss encounter
    pub const BOSS_LEVELS: [u32; 6] = [5, 10, 15, 20, 25, 30];

    /// Boss projectiles are square
    pub const BOSS_PROJECTILE_SIZE: f32 = 8.0;

    /// Scoreboard
    pub const MAX_LIVES: u8 = 5;
    pub const NORMAL_HOSTILE_POINTS: u64 = 10;
    pub const FAST_HOSTILE_POINTS: u64 = 20;
    /// Boss defeat awards max_health * this
    pub const BOSS_POINTS_PER_HEALTH: u64 = 10;
    /// Powerups dropped by a defeated boss
    pub const BOSS_DROP_COUNT: u32 = 3;
}

/// Center of an axis-aligned box given its top-left corner and size
#[inline]
pub fn box_center(pos: glam::Vec2, size: glam::Vec2) -> glam::Vec2 {
    pos + size / 2.0
}

/// True if `level` opens with a boss encounter
#[inline]
pub fn is_boss_level(level: u32) -> bool {
    consts::BOSS_LEVELS.contains(&level)
}
