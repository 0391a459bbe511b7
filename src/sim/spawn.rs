//! Spawn director: hostiles, bosses and the starfield
//!
//! Runs once per step. A boss level opens with a boss encounter that clears
//! the field and suspends hostile spawning until the boss falls.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Boss, BossPhase, GameEvent, GameState, Hostile, HostileKind, Star};
use crate::consts::*;
use crate::is_boss_level;

/// Ticks between hostile spawns at `level`
pub fn hostile_interval(level: u32) -> u32 {
    (60i64 - level as i64 * 5).max(30) as u32
}

/// Hostile descent speed for `level` given a uniform sample `u` in [0, 1)
pub fn hostile_speed(level: u32, u: f32) -> f32 {
    1.5 + level as f32 * 0.3 + u
}

pub fn boss_max_health(level: u32) -> i32 {
    50 + level as i32 * 20
}

pub fn boss_speed(level: u32) -> f32 {
    1.5 + level as f32 * 0.2
}

/// Hostile spawn countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnDirector {
    /// Ticks until the next hostile appears
    pub countdown: u32,
}

impl SpawnDirector {
    pub fn new(level: u32) -> Self {
        Self {
            countdown: hostile_interval(level),
        }
    }

    /// Advance the countdown by one tick; true when a hostile is due
    pub fn tick(&mut self, level: u32) -> bool {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.countdown = hostile_interval(level);
            true
        } else {
            false
        }
    }
}

/// One spawn pass: boss trigger first, then the hostile countdown
pub fn run(state: &mut GameState) {
    let level = state.scoreboard.level;
    if state.boss.is_none() && !state.boss_fight && is_boss_level(level) {
        spawn_boss(state, level);
    }

    if state.boss_fight {
        return;
    }
    if state.spawner.tick(level) {
        spawn_hostile(state);
    }
}

/// Spawn a hostile just above the playfield at a random column
pub fn spawn_hostile(state: &mut GameState) {
    let level = state.scoreboard.level;
    let x = state.roll() * (GAME_WIDTH - ENEMY_WIDTH);
    let speed = hostile_speed(level, state.roll());
    let fast_chance = state.config.fast_hostile_chance;
    let kind = if state.rng.random_bool(fast_chance) {
        HostileKind::Fast
    } else {
        HostileKind::Normal
    };
    state.hostiles.insert(Hostile {
        pos: Vec2::new(x, -ENEMY_HEIGHT),
        speed,
        kind,
    });
}

/// Bring in the boss for `level` and clear the ordinary hostiles
pub fn spawn_boss(state: &mut GameState, level: u32) {
    if state.boss.is_some() {
        return;
    }
    let max_health = boss_max_health(level);
    let id = state.next_boss_id();
    state.boss = Some(Boss {
        id,
        pos: Vec2::new(GAME_WIDTH / 2.0 - BOSS_WIDTH / 2.0, -BOSS_HEIGHT),
        target_y: BOSS_TARGET_Y,
        health: max_health,
        max_health,
        phase: BossPhase::One,
        direction: 1.0,
        speed: boss_speed(level),
        attack_pattern: 0,
        shoot_timer: 0,
    });
    state.boss_fight = true;
    state.hostiles.clear();
    log::info!("Boss incoming at level {} ({} hp)", level, max_health);
    state.events.push(GameEvent::BossSpawned { level, max_health });
}

/// Scatter the background starfield
pub fn make_starfield(rng: &mut Pcg32, count: usize) -> Vec<Star> {
    (0..count)
        .map(|_| Star {
            pos: Vec2::new(
                rng.random::<f32>() * GAME_WIDTH,
                rng.random::<f32>() * GAME_HEIGHT,
            ),
            size: rng.random::<f32>() * 2.0 + 1.0,
            speed: rng.random::<f32>() * 2.0 + 1.0,
            opacity: rng.random::<f32>() * 0.5 + 0.3,
        })
        .collect()
}

/// Scroll stars downward; a star already past the bottom wraps to the top
pub fn advance_stars(stars: &mut [Star], rng: &mut Pcg32) {
    for star in stars.iter_mut() {
        if star.pos.y > GAME_HEIGHT {
            star.pos = Vec2::new(rng.random::<f32>() * GAME_WIDTH, 0.0);
        } else {
            star.pos.y += star.speed;
        }
    }
}
