//! Boss controller: entry descent, side-to-side patrol, phase-dependent attacks
//!
//! Phases are driven by remaining health and never step backward. Every
//! operation here is a silent no-op when no boss is present.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use super::rect::Rect;
use super::state::{Boss, BossPhase, BossProjectile, GameEvent, GameState, ProjectileKind};
use super::timers::Deferred;
use crate::consts::*;

impl BossPhase {
    /// Ticks between volleys
    pub fn attack_interval(&self) -> u32 {
        match self {
            BossPhase::One => 40,
            BossPhase::Two => 20,
            BossPhase::Three => 8,
        }
    }

    /// Phase after a hit leaves `fraction` of health, given the current phase
    pub fn after_hit(self, fraction: f32) -> BossPhase {
        if fraction <= 0.33 && self < BossPhase::Three {
            BossPhase::Three
        } else if fraction <= 0.66 && self < BossPhase::Two {
            BossPhase::Two
        } else {
            self
        }
    }
}

/// Result of damaging the boss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Damaged { phase_changed: bool },
    Defeated,
}

impl Boss {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(BOSS_WIDTH, BOSS_HEIGHT))
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health.max(0) as f32 / self.max_health as f32
    }

    /// True once the entry descent has finished
    pub fn in_position(&self) -> bool {
        self.pos.y >= self.target_y
    }

    /// One tick of movement
    pub fn advance(&mut self) {
        if !self.in_position() {
            self.pos.y = (self.pos.y + BOSS_ENTRY_SPEED).min(self.target_y);
            return;
        }
        let max_x = GAME_WIDTH - BOSS_WIDTH;
        self.pos.x += self.speed * self.direction;
        if self.pos.x <= 0.0 || self.pos.x >= max_x {
            self.pos.x = self.pos.x.clamp(0.0, max_x);
            self.direction = -self.direction;
        }
    }

    /// Advance the attack timer; true when a volley is due
    pub fn attack_ready(&mut self) -> bool {
        self.shoot_timer += 1;
        if self.shoot_timer >= self.phase.attack_interval() {
            self.shoot_timer = 0;
            true
        } else {
            false
        }
    }

    /// Projectiles for one volley in the current phase
    pub fn volley(&mut self) -> Vec<BossProjectile> {
        let origin = Vec2::new(
            self.pos.x + BOSS_WIDTH / 2.0 - BOSS_PROJECTILE_SIZE / 2.0,
            self.pos.y + BOSS_HEIGHT,
        );
        match self.phase {
            BossPhase::One => vec![BossProjectile {
                pos: origin,
                vel: Vec2::new(0.0, 4.0),
                kind: ProjectileKind::Normal,
            }],
            BossPhase::Two => (-2..=2)
                .map(|i| BossProjectile {
                    pos: origin,
                    vel: Vec2::new(i as f32 * 1.5, 4.0),
                    kind: ProjectileKind::Spread,
                })
                .collect(),
            BossPhase::Three => {
                let angle = (self.attack_pattern as f32 * 30.0) * PI / 180.0;
                self.attack_pattern += 1;
                vec![BossProjectile {
                    pos: origin + Vec2::new(angle.cos() * 30.0, angle.sin() * 10.0),
                    vel: Vec2::new((angle + FRAC_PI_2).cos() * 2.0, 5.0),
                    kind: ProjectileKind::Spiral,
                }]
            }
        }
    }

    /// Take damage and re-evaluate the phase
    pub fn take_hit(&mut self, damage: i32) -> HitOutcome {
        self.health = (self.health - damage).max(0);
        if self.health == 0 {
            return HitOutcome::Defeated;
        }
        let next = self.phase.after_hit(self.health_fraction());
        let phase_changed = next != self.phase;
        self.phase = next;
        HitOutcome::Damaged { phase_changed }
    }
}

/// Movement and attack timer for the current boss
pub fn update(state: &mut GameState) {
    if !state.boss_fight {
        return;
    }
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    boss.advance();
    if boss.attack_ready() {
        for projectile in boss.volley() {
            state.boss_projectiles.insert(projectile);
        }
    }
}

/// Apply `damage` to the boss, running the defeat sequence if it falls
pub fn damage(state: &mut GameState, damage: i32) -> Option<HitOutcome> {
    let boss = state.boss.as_mut()?;
    let outcome = boss.take_hit(damage);
    match outcome {
        HitOutcome::Damaged { phase_changed } => {
            let (health, phase) = (boss.health, boss.phase);
            state.events.push(GameEvent::BossHit { health });
            if phase_changed {
                log::debug!("Boss entered phase {}", phase as u8);
                state.events.push(GameEvent::BossPhaseChanged { phase });
            }
        }
        HitOutcome::Defeated => defeat(state),
    }
    Some(outcome)
}

/// Remove the boss, pay out, schedule its drops and open the next level
fn defeat(state: &mut GameState) {
    let Some(boss) = state.boss.take() else {
        return;
    };
    let center = boss.center();
    let points = boss.max_health as u64 * BOSS_POINTS_PER_HEALTH;

    state.spawn_explosion(center);
    state.boss_projectiles.clear();
    state.award(points);

    let stagger = state.config.boss_drop_stagger();
    for i in 0..BOSS_DROP_COUNT {
        let pos = center + Vec2::new((i as f32 - 1.0) * 30.0, 0.0);
        state
            .timers
            .schedule(state.timer_clock + stagger * i, Deferred::DropPowerup { pos });
    }

    state.boss_fight = false;
    log::info!("Boss defeated (+{} points)", points);
    state.events.push(GameEvent::BossDefeated { pos: center, points });
    state.advance_level();
}
