//! Read-only view of the game handed to rendering collaborators
//!
//! A `Snapshot` is an owned copy taken after a completed frame. Renderers and
//! audio layers read it; nothing they do can reach back into the simulation.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{
    ActivePowerups, BossPhase, GameEvent, GamePhase, GameState, Handle, HostileKind,
    PowerupKind, ProjectileKind, Scoreboard, Star,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BulletView {
    pub id: Handle,
    pub pos: Vec2,
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HostileView {
    pub id: Handle,
    pub pos: Vec2,
    pub kind: HostileKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BossView {
    pub id: u32,
    pub pos: Vec2,
    pub phase: BossPhase,
    pub health: i32,
    pub max_health: i32,
    /// Remaining health in [0, 1], for the health bar
    pub health_fraction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileView {
    pub id: Handle,
    pub pos: Vec2,
    pub kind: ProjectileKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerupView {
    pub id: Handle,
    pub pos: Vec2,
    pub kind: PowerupKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExplosionView {
    pub id: Handle,
    pub pos: Vec2,
    /// 0 at birth, approaching 1 at expiry
    pub progress: f32,
}

/// Everything a frame needs to be drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub lifecycle: GamePhase,
    pub tick: u64,
    pub clock_ms: u64,
    /// Player top-left corner
    pub player: Vec2,
    pub bullets: Vec<BulletView>,
    pub hostiles: Vec<HostileView>,
    pub boss: Option<BossView>,
    pub boss_fight: bool,
    pub boss_projectiles: Vec<ProjectileView>,
    pub powerups: Vec<PowerupView>,
    pub explosions: Vec<ExplosionView>,
    pub stars: Vec<Star>,
    pub scoreboard: Scoreboard,
    pub active_powerups: ActivePowerups,
    /// Events raised during the frame that produced this snapshot
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn capture(state: &GameState, events: &[GameEvent]) -> Self {
        let now = state.clock;
        let lifetime = state.config.explosion_lifetime().as_secs_f32();
        Self {
            lifecycle: state.phase,
            tick: state.time_ticks,
            clock_ms: now.as_millis() as u64,
            player: state.player.pos,
            bullets: state
                .bullets
                .iter()
                .map(|(id, b)| BulletView {
                    id,
                    pos: b.pos,
                    angle: b.angle,
                })
                .collect(),
            hostiles: state
                .hostiles
                .iter()
                .map(|(id, h)| HostileView {
                    id,
                    pos: h.pos,
                    kind: h.kind,
                })
                .collect(),
            boss: state.boss.as_ref().map(|b| BossView {
                id: b.id,
                pos: b.pos,
                phase: b.phase,
                health: b.health,
                max_health: b.max_health,
                health_fraction: b.health_fraction(),
            }),
            boss_fight: state.boss_fight,
            boss_projectiles: state
                .boss_projectiles
                .iter()
                .map(|(id, p)| ProjectileView {
                    id,
                    pos: p.pos,
                    kind: p.kind,
                })
                .collect(),
            powerups: state
                .powerups
                .iter()
                .map(|(id, p)| PowerupView {
                    id,
                    pos: p.pos,
                    kind: p.kind,
                })
                .collect(),
            explosions: state
                .explosions
                .iter()
                .map(|(id, e)| ExplosionView {
                    id,
                    pos: e.pos,
                    progress: if lifetime > 0.0 {
                        (e.age(now).as_secs_f32() / lifetime).min(1.0)
                    } else {
                        1.0
                    },
                })
                .collect(),
            stars: state.stars.clone(),
            scoreboard: state.scoreboard,
            active_powerups: state.active_powerups,
            events: events.to_vec(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
