//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (arena slot order)
//! - Time comes from the game and timer clocks, never the system clock
//! - No rendering or platform dependencies

pub mod arena;
pub mod boss;
pub mod collision;
pub mod powerup;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use arena::{Arena, Handle};
pub use boss::HitOutcome;
pub use rect::{Rect, overlaps};
pub use spawn::SpawnDirector;
pub use state::{
    ActivePowerups, Boss, BossPhase, BossProjectile, Bullet, Explosion, GameEvent, GamePhase,
    GameState, Hostile, HostileKind, Player, Powerup, PowerupKind, ProjectileKind, Scoreboard,
    Star,
};
pub use tick::{TickInput, step, tick};
pub use timers::{Deferred, Timers};
