//! Collision resolution for one step
//!
//! Passes run in a fixed order: bullets vs hostiles, bullets vs boss, player
//! vs powerups, player vs hostiles, player vs boss projectiles. Matches are
//! collected first and removed afterwards, and a bullet is consumed by at most
//! one target per step.

use std::collections::HashSet;

use rand::Rng;

use super::arena::Handle;
use super::state::{GameEvent, GameState};
use super::{boss, powerup};

/// Run every collision pass
pub fn resolve(state: &mut GameState) {
    bullets_vs_hostiles(state);
    bullets_vs_boss(state);
    player_vs_powerups(state);
    player_vs_hostiles(state);
    player_vs_boss_projectiles(state);
}

/// Each bullet destroys at most one hostile and each hostile falls to at most one bullet
pub fn bullets_vs_hostiles(state: &mut GameState) {
    let mut taken: HashSet<Handle> = HashSet::new();
    let mut hits: Vec<(Handle, Handle)> = Vec::new();

    for (bullet_id, bullet) in state.bullets.iter() {
        let rect = bullet.rect();
        let target = state
            .hostiles
            .iter()
            .find(|(id, hostile)| !taken.contains(id) && rect.overlaps(&hostile.rect()))
            .map(|(id, _)| id);
        if let Some(hostile_id) = target {
            taken.insert(hostile_id);
            hits.push((bullet_id, hostile_id));
        }
    }

    for (bullet_id, hostile_id) in hits {
        state.bullets.remove(bullet_id);
        let Some(hostile) = state.hostiles.remove(hostile_id) else {
            continue;
        };
        let center = hostile.rect().center();
        let points = hostile.kind.points();
        state.spawn_explosion(center);
        state.award(points);
        state.events.push(GameEvent::HostileDestroyed {
            pos: center,
            kind: hostile.kind,
            points,
        });
        let drop_chance = state.config.powerup_drop_chance;
        if state.rng.random_bool(drop_chance) {
            powerup::spawn_powerup(state, center);
        }
    }
}

/// Each overlapping bullet deals one point of damage; stops once the boss falls
pub fn bullets_vs_boss(state: &mut GameState) {
    let Some(boss_rect) = state.boss.as_ref().map(|b| b.rect()) else {
        return;
    };
    let hits: Vec<Handle> = state
        .bullets
        .iter()
        .filter(|(_, bullet)| bullet.rect().overlaps(&boss_rect))
        .map(|(id, _)| id)
        .collect();

    for bullet_id in hits {
        if state.boss.is_none() {
            break;
        }
        state.bullets.remove(bullet_id);
        boss::damage(state, 1);
    }
}

pub fn player_vs_powerups(state: &mut GameState) {
    let player = state.player.rect();
    let collected: Vec<Handle> = state
        .powerups
        .iter()
        .filter(|(_, p)| player.overlaps(&p.rect()))
        .map(|(id, _)| id)
        .collect();

    for id in collected {
        if let Some(p) = state.powerups.remove(id) {
            powerup::collect(state, p.kind);
        }
    }
}

/// Every touching hostile is destroyed; the player loses at most one life per pass
pub fn player_vs_hostiles(state: &mut GameState) {
    let player = state.player.rect();
    let touching: Vec<Handle> = state
        .hostiles
        .iter()
        .filter(|(_, h)| player.overlaps(&h.rect()))
        .map(|(id, _)| id)
        .collect();
    if touching.is_empty() {
        return;
    }
    for id in touching {
        if let Some(hostile) = state.hostiles.remove(id) {
            state.spawn_explosion(hostile.rect().center());
        }
    }
    state.hit_player();
}

/// Every touching projectile is absorbed; the player loses at most one life per pass
pub fn player_vs_boss_projectiles(state: &mut GameState) {
    let player = state.player.rect();
    let touching: Vec<Handle> = state
        .boss_projectiles
        .iter()
        .filter(|(_, p)| player.overlaps(&p.rect()))
        .map(|(id, _)| id)
        .collect();
    if touching.is_empty() {
        return;
    }
    for id in touching {
        state.boss_projectiles.remove(id);
    }
    state.hit_player();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::*;
    use crate::sim::spawn::spawn_boss;
    use crate::sim::state::{
        BossProjectile, Bullet, GamePhase, Hostile, HostileKind, Powerup, PowerupKind,
        ProjectileKind,
    };
    use glam::Vec2;

    fn state() -> GameState {
        let config = GameConfig {
            powerup_drop_chance: 0.0,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config, 9);
        state.phase = GamePhase::Playing;
        state
    }

    fn hostile_at(x: f32, y: f32, kind: HostileKind) -> Hostile {
        Hostile {
            pos: Vec2::new(x, y),
            speed: 2.0,
            kind,
        }
    }

    #[test]
    fn test_bullet_destroys_hostile() {
        let mut state = state();
        state.hostiles.insert(hostile_at(100.0, 100.0, HostileKind::Fast));
        state.bullets.insert(Bullet {
            pos: Vec2::new(110.0, 110.0),
            angle: 0.0,
        });
        resolve(&mut state);
        assert!(state.hostiles.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.scoreboard.score, 20);
        let explosion = state.explosions.values().next().unwrap();
        assert_eq!(explosion.pos, Vec2::new(118.0, 118.0));
    }

    #[test]
    fn test_one_bullet_two_hostiles_consumes_one() {
        let mut state = state();
        state.hostiles.insert(hostile_at(100.0, 100.0, HostileKind::Normal));
        state.hostiles.insert(hostile_at(104.0, 104.0, HostileKind::Normal));
        state.bullets.insert(Bullet {
            pos: Vec2::new(120.0, 120.0),
            angle: 0.0,
        });
        bullets_vs_hostiles(&mut state);
        assert_eq!(state.hostiles.len(), 1);
        assert!(state.bullets.is_empty());
        assert_eq!(state.scoreboard.score, 10);
    }

    #[test]
    fn test_two_bullets_one_hostile_consumes_one_bullet() {
        let mut state = state();
        state.hostiles.insert(hostile_at(100.0, 100.0, HostileKind::Normal));
        for x in [105.0, 110.0] {
            state.bullets.insert(Bullet {
                pos: Vec2::new(x, 110.0),
                angle: 0.0,
            });
        }
        bullets_vs_hostiles(&mut state);
        assert!(state.hostiles.is_empty());
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.scoreboard.score, 10);
    }

    #[test]
    fn test_guaranteed_drop() {
        let mut state = state();
        state.config.powerup_drop_chance = 1.0;
        state.hostiles.insert(hostile_at(100.0, 100.0, HostileKind::Normal));
        state.bullets.insert(Bullet {
            pos: Vec2::new(110.0, 110.0),
            angle: 0.0,
        });
        bullets_vs_hostiles(&mut state);
        assert_eq!(state.powerups.len(), 1);
    }

    #[test]
    fn test_bullets_damage_boss() {
        let mut state = state();
        state.scoreboard.level = 5;
        spawn_boss(&mut state, 5);
        let boss_pos = state.boss.as_ref().unwrap().pos;
        for dx in [0.0, 10.0, 20.0] {
            state.bullets.insert(Bullet {
                pos: boss_pos + Vec2::new(dx, 10.0),
                angle: 0.0,
            });
        }
        resolve(&mut state);
        assert!(state.bullets.is_empty());
        assert_eq!(state.boss.as_ref().unwrap().health, 147);
    }

    #[test]
    fn test_surplus_bullets_survive_boss_defeat() {
        let mut state = state();
        state.scoreboard.level = 5;
        spawn_boss(&mut state, 5);
        state.boss.as_mut().unwrap().health = 1;
        let boss_pos = state.boss.as_ref().unwrap().pos;
        for dx in [0.0, 10.0] {
            state.bullets.insert(Bullet {
                pos: boss_pos + Vec2::new(dx, 10.0),
                angle: 0.0,
            });
        }
        bullets_vs_boss(&mut state);
        assert!(state.boss.is_none());
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.scoreboard.level, 6);
    }

    #[test]
    fn test_player_collects_powerup() {
        let mut state = state();
        let player = state.player.pos;
        state.powerups.insert(Powerup {
            pos: player,
            kind: PowerupKind::Spread,
            speed: 2.0,
        });
        resolve(&mut state);
        assert!(state.powerups.is_empty());
        assert!(state.active_powerups.spread);
    }

    #[test]
    fn test_two_hostiles_cost_one_life() {
        let mut state = state();
        let p = state.player.pos;
        state.hostiles.insert(hostile_at(p.x, p.y, HostileKind::Normal));
        state.hostiles.insert(hostile_at(p.x + 10.0, p.y, HostileKind::Fast));
        player_vs_hostiles(&mut state);
        assert!(state.hostiles.is_empty());
        assert_eq!(state.explosions.len(), 2);
        assert_eq!(state.scoreboard.lives, 2);
        assert_eq!(state.scoreboard.score, 0, "rammed hostiles award nothing");
    }

    #[test]
    fn test_projectile_hit_and_shield() {
        let mut state = state();
        let p = state.player.pos;
        let projectile = BossProjectile {
            pos: p + Vec2::new(PLAYER_WIDTH / 2.0, 0.0),
            vel: Vec2::new(0.0, 4.0),
            kind: ProjectileKind::Normal,
        };
        state.boss_projectiles.insert(projectile);
        player_vs_boss_projectiles(&mut state);
        assert_eq!(state.scoreboard.lives, 2);

        state.active_powerups.shield = true;
        state.boss_projectiles.insert(projectile);
        player_vs_boss_projectiles(&mut state);
        assert!(state.boss_projectiles.is_empty());
        assert_eq!(state.scoreboard.lives, 2);
    }

    #[test]
    fn test_game_over_stops_further_life_loss() {
        let mut state = state();
        state.scoreboard.lives = 1;
        let p = state.player.pos;
        state.hostiles.insert(hostile_at(p.x, p.y, HostileKind::Normal));
        state.boss_projectiles.insert(BossProjectile {
            pos: p,
            vel: Vec2::ZERO,
            kind: ProjectileKind::Normal,
        });
        resolve(&mut state);
        assert_eq!(state.scoreboard.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.boss_projectiles.is_empty());
    }
}
