//! Powerup drops, collection, expiry and the firing rules they modify

use glam::Vec2;
use rand::Rng;

use super::arena::Handle;
use super::state::{Bullet, GameEvent, GameState, Powerup, PowerupKind};
use super::timers::Deferred;
use crate::consts::*;

impl PowerupKind {
    /// Uniform pick over all kinds
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Drop a random powerup centered horizontally on `pos`
pub fn spawn_powerup(state: &mut GameState, pos: Vec2) -> Handle {
    let kind = PowerupKind::random(&mut state.rng);
    state.events.push(GameEvent::PowerupDropped { pos, kind });
    state.powerups.insert(Powerup {
        pos: Vec2::new(pos.x - POWERUP_WIDTH / 2.0, pos.y),
        kind,
        speed: POWERUP_FALL_SPEED,
    })
}

/// Apply a collected powerup
///
/// Extra life is instant (capped). Timed kinds set their flag and (re)start a
/// single expiry timer; collecting again restarts it rather than extending it.
pub fn collect(state: &mut GameState, kind: PowerupKind) {
    log::debug!("Collected {:?}", kind);
    state.events.push(GameEvent::PowerupCollected { kind });
    if kind == PowerupKind::ExtraLife {
        let lives = &mut state.scoreboard.lives;
        *lives = (*lives + 1).min(MAX_LIVES);
        return;
    }
    state.active_powerups.set(kind, true);
    let due = state.timer_clock + state.config.powerup_duration();
    state.timers.reschedule(due, Deferred::ExpirePowerup(kind));
}

pub fn expire(state: &mut GameState, kind: PowerupKind) {
    if state.active_powerups.is_active(kind) {
        state.active_powerups.set(kind, false);
        log::debug!("{:?} expired", kind);
        state.events.push(GameEvent::PowerupExpired { kind });
    }
}

/// Bullets for one trigger pull from a player whose top-left is `player_pos`
pub fn fire_pattern(player_pos: Vec2, spread: bool) -> Vec<Bullet> {
    let cx = player_pos.x + PLAYER_WIDTH / 2.0 - BULLET_WIDTH / 2.0;
    let y = player_pos.y - BULLET_HEIGHT;
    let straight = Bullet {
        pos: Vec2::new(cx, y),
        angle: 0.0,
    };
    if !spread {
        return vec![straight];
    }
    vec![
        straight,
        Bullet {
            pos: Vec2::new(cx - 10.0, y + 5.0),
            angle: -SPREAD_ANGLE,
        },
        Bullet {
            pos: Vec2::new(cx + 10.0, y + 5.0),
            angle: SPREAD_ANGLE,
        },
    ]
}

/// Fire if the cooldown allows; returns the number of bullets spawned
pub fn try_fire(state: &mut GameState) -> usize {
    let now = state.clock;
    let cooldown = state
        .config
        .fire_cooldown(state.active_powerups.rapid_fire);
    if let Some(last) = state.last_shot {
        if now.saturating_sub(last) <= cooldown {
            return 0;
        }
    }
    state.last_shot = Some(now);
    let bullets = fire_pattern(state.player.pos, state.active_powerups.spread);
    let count = bullets.len();
    for bullet in bullets {
        state.bullets.insert(bullet);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::GamePhase;
    use std::time::Duration;

    fn state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 5);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_extra_life_caps_at_five() {
        let mut state = state();
        for _ in 0..4 {
            collect(&mut state, PowerupKind::ExtraLife);
        }
        assert_eq!(state.scoreboard.lives, MAX_LIVES);
        assert_eq!(state.active_powerups, Default::default());
        assert!(state.timers.is_empty());
    }

    #[test]
    fn test_timed_powerup_sets_flag_and_expiry() {
        let mut state = state();
        state.timer_clock = Duration::from_millis(1000);
        collect(&mut state, PowerupKind::Shield);
        assert!(state.active_powerups.shield);
        assert_eq!(
            state.timers.due_of(&Deferred::ExpirePowerup(PowerupKind::Shield)),
            Some(Duration::from_millis(6000))
        );
        expire(&mut state, PowerupKind::Shield);
        assert!(!state.active_powerups.shield);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = state();
        assert_eq!(try_fire(&mut state), 1);
        state.clock = Duration::from_millis(200);
        assert_eq!(try_fire(&mut state), 0, "cooldown is strict");
        state.clock = Duration::from_millis(201);
        assert_eq!(try_fire(&mut state), 1);

        state.active_powerups.rapid_fire = true;
        state.clock = Duration::from_millis(302);
        assert_eq!(try_fire(&mut state), 1);
        assert_eq!(state.bullets.len(), 3);
    }

    #[test]
    fn test_spread_fires_three() {
        let bullets = fire_pattern(Vec2::new(180.0, PLAYER_Y), true);
        assert_eq!(bullets.len(), 3);
        assert_eq!(bullets[0].pos, Vec2::new(198.0, PLAYER_Y - 12.0));
        assert_eq!(bullets[1].angle, -0.2);
        assert_eq!(bullets[2].pos, Vec2::new(208.0, PLAYER_Y - 7.0));
    }

    #[test]
    fn test_spawn_powerup_centers_capsule() {
        let mut state = state();
        let h = spawn_powerup(&mut state, Vec2::new(100.0, 50.0));
        let p = state.powerups.get(h).unwrap();
        assert_eq!(p.pos, Vec2::new(86.0, 50.0));
        assert_eq!(p.speed, 2.0);
    }

    #[test]
    fn test_random_kind_covers_all() {
        let mut state = state();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(PowerupKind::random(&mut state.rng));
        }
        assert_eq!(seen.len(), 4);
    }
}
