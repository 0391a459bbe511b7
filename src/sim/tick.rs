//! Simulation step
//!
//! One call advances the game by one tick. Distances are per tick. `tick`
//! treats `dt` as both step length and delivered play time; a frame scheduler
//! that clamps slow frames advances `GameState::timer_clock` itself and calls
//! `step`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};
use super::timers::Deferred;
use super::{boss, collision, powerup, spawn};
use crate::consts::*;
use crate::is_boss_level;

/// Abstract input intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Trigger held
    pub fire: bool,
    /// Pause toggle (edge-triggered; handled by the session)
    pub pause: bool,
}

/// Advance the game state by one tick of `dt`
pub fn tick(state: &mut GameState, input: &TickInput, dt: Duration) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.timer_clock += dt;
    step(state, input, dt);
}

/// Run one step of length `dt` without touching the timer clock
///
/// Events from the previous step are discarded; whoever drives the loop
/// reads `state.events` between steps.
pub fn step(state: &mut GameState, input: &TickInput, dt: Duration) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.events.clear();
    state.time_ticks += 1;
    state.clock += dt;

    run_timers(state);

    // Player
    if input.move_left {
        state.player.shift(-PLAYER_SPEED);
    }
    if input.move_right {
        state.player.shift(PLAYER_SPEED);
    }
    if input.fire {
        powerup::try_fire(state);
    }

    advance_entities(state);

    spawn::run(state);
    boss::update(state);
    collision::resolve(state);

    if state.phase == GamePhase::Playing {
        check_level_up(state);
    }

    if let Err(violation) = state.check_invariants() {
        log::error!("Invariant violated at tick {}: {}", state.time_ticks, violation);
        debug_assert!(false, "invariant violated: {violation}");
    }
    state.record_boss_phase();
}

/// Fire every deferred effect whose time has come
fn run_timers(state: &mut GameState) {
    for effect in state.timers.take_due(state.timer_clock) {
        match effect {
            Deferred::ExpirePowerup(kind) => powerup::expire(state, kind),
            Deferred::DropPowerup { pos } => {
                powerup::spawn_powerup(state, pos);
            }
        }
    }
}

/// Move everything one tick and drop what left the playfield
fn advance_entities(state: &mut GameState) {
    state.bullets.retain(|_, b| {
        b.pos.y -= BULLET_SPEED;
        b.pos.x += b.angle * BULLET_DRIFT;
        b.pos.y > -BULLET_HEIGHT && b.pos.x > 0.0 && b.pos.x < GAME_WIDTH
    });

    state.powerups.retain(|_, p| {
        p.pos.y += p.speed;
        p.pos.y < GAME_HEIGHT
    });

    state.hostiles.retain(|_, h| {
        h.pos.y += h.speed;
        h.pos.y < GAME_HEIGHT
    });

    spawn::advance_stars(&mut state.stars, &mut state.rng);

    state.boss_projectiles.retain(|_, p| {
        p.pos += p.vel;
        p.pos.y < GAME_HEIGHT && p.pos.x > -10.0 && p.pos.x < GAME_WIDTH + 10.0
    });

    let now = state.clock;
    let lifetime = state.config.explosion_lifetime();
    state.explosions.retain(|_, e| e.age(now) < lifetime);
}

/// Score-driven progression on ordinary levels
fn check_level_up(state: &mut GameState) {
    let Some(threshold) = state.config.level_up_score else {
        return;
    };
    let level = state.scoreboard.level;
    if state.boss_fight || is_boss_level(level) {
        return;
    }
    if state.scoreboard.score.saturating_sub(state.level_base_score) >= threshold {
        state.advance_level();
    }
}
